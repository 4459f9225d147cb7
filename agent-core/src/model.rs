use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Untrusted invocation payload as delivered by the hosting layer.
///
/// Each field may arrive as a plain scalar, a mapping, or a string-encoded
/// mapping; some hosts also double-wrap the arguments. No invariants hold
/// here — [`crate::params::normalize`] turns this into a [`CanonicalRequest`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawInvocation {
    #[serde(default)]
    pub location: Value,
    #[serde(default)]
    pub days: Value,
    #[serde(default)]
    pub include_alerts: Value,
}

/// Canonical parameter triple. `days` is always clamped into [1, 10];
/// `location` is trimmed and may be empty, which means "ask the user".
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRequest {
    pub location: String,
    pub days: i64,
    pub include_alerts: bool,
}

/// Parsed WeatherAPI.com forecast payload.
///
/// The schema is strict: a 2xx body that does not match it is reported as
/// `MalformedResponse` by the provider. Constructed fresh per invocation and
/// discarded after rendering.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherSnapshot {
    pub location: SnapshotLocation,
    pub current: CurrentConditions,
    pub forecast: Forecast,
    #[serde(default)]
    pub alerts: Option<AlertList>,
}

impl WeatherSnapshot {
    /// Observation time as UTC, when the provider reported an epoch.
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        self.current.last_updated_epoch.and_then(unix_to_utc)
    }

    /// Alert entries, flattened out of the optional wrapper object.
    pub fn alert_entries(&self) -> &[WeatherAlert] {
        self.alerts.as_ref().map(|a| a.alert.as_slice()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotLocation {
    pub name: String,
    pub region: String,
    pub country: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConditionText {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentConditions {
    pub temp_c: f64,
    pub temp_f: f64,
    pub condition: ConditionText,
    pub feelslike_c: f64,
    pub feelslike_f: f64,
    pub humidity: u8,
    pub wind_mph: f64,
    pub wind_dir: String,
    pub last_updated: String,
    pub last_updated_epoch: Option<i64>,
    #[serde(default)]
    pub air_quality: Option<AirQuality>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AirQuality {
    #[serde(rename = "us-epa-index")]
    pub us_epa_index: Option<u8>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Forecast {
    pub forecastday: Vec<ForecastDay>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastDay {
    pub date: String,
    pub day: DayConditions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DayConditions {
    pub condition: ConditionText,
    pub maxtemp_f: f64,
    pub maxtemp_c: f64,
    pub mintemp_f: f64,
    pub mintemp_c: f64,
    pub daily_chance_of_rain: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertList {
    #[serde(default)]
    pub alert: Vec<WeatherAlert>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherAlert {
    pub headline: String,
}

/// Advisory side-channel record of the last observed conditions. The hosting
/// conversation layer may merge this into its own session memory; this crate
/// does not persist it. Temperature is °F, the canonical unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateUpdate {
    #[serde(rename = "last_weather_location")]
    pub location: String,
    #[serde(rename = "last_weather_temp")]
    pub temperature_f: f64,
    #[serde(rename = "last_weather_condition")]
    pub condition: String,
    #[serde(rename = "last_request_time")]
    pub updated_at: String,
}

/// Outcome of one invocation. Failures carry a narrative only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedResult {
    pub narrative: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_update: Option<StateUpdate>,
}

impl RenderedResult {
    pub fn narrative_only(narrative: impl Into<String>) -> Self {
        Self { narrative: narrative.into(), state_update: None }
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_payload() -> Value {
        json!({
            "location": {"name": "Tulsa", "region": "Oklahoma", "country": "United States of America"},
            "current": {
                "temp_c": 22.0, "temp_f": 71.6,
                "condition": {"text": "Sunny"},
                "feelslike_c": 24.0, "feelslike_f": 75.2,
                "humidity": 60, "wind_mph": 5.6, "wind_dir": "NW",
                "last_updated": "2025-07-01 12:00",
                "last_updated_epoch": 1751371200,
                "air_quality": {"us-epa-index": 2, "pm2_5": 8.1}
            },
            "forecast": {"forecastday": [
                {"date": "2025-07-01", "day": {
                    "condition": {"text": "Partly Cloudy"},
                    "maxtemp_f": 75.0, "maxtemp_c": 24.0,
                    "mintemp_f": 60.0, "mintemp_c": 16.0,
                    "daily_chance_of_rain": 20
                }}
            ]},
            "alerts": {"alert": [{"headline": "Heat Advisory", "severity": "Moderate"}]}
        })
    }

    #[test]
    fn full_payload_deserializes() {
        let snapshot: WeatherSnapshot = serde_json::from_value(sample_payload()).unwrap();

        assert_eq!(snapshot.location.name, "Tulsa");
        assert_eq!(snapshot.current.condition.text, "Sunny");
        assert_eq!(snapshot.current.air_quality.unwrap().us_epa_index, Some(2));
        assert_eq!(snapshot.forecast.forecastday.len(), 1);
        assert_eq!(snapshot.alerts.unwrap().alert[0].headline, "Heat Advisory");
    }

    #[test]
    fn air_quality_and_alerts_are_optional() {
        let mut payload = sample_payload();
        payload["current"].as_object_mut().unwrap().remove("air_quality");
        payload.as_object_mut().unwrap().remove("alerts");

        let snapshot: WeatherSnapshot = serde_json::from_value(payload).unwrap();

        assert!(snapshot.current.air_quality.is_none());
        assert!(snapshot.alert_entries().is_empty());
    }

    #[test]
    fn missing_current_block_is_rejected() {
        let mut payload = sample_payload();
        payload.as_object_mut().unwrap().remove("current");

        assert!(serde_json::from_value::<WeatherSnapshot>(payload).is_err());
    }

    #[test]
    fn wrong_type_is_rejected() {
        let mut payload = sample_payload();
        payload["current"]["humidity"] = json!("sixty");

        assert!(serde_json::from_value::<WeatherSnapshot>(payload).is_err());
    }

    #[test]
    fn observed_at_converts_epoch() {
        let snapshot: WeatherSnapshot = serde_json::from_value(sample_payload()).unwrap();

        let observed = snapshot.observed_at().expect("epoch present");
        assert_eq!(observed.timestamp(), 1751371200);
    }
}
