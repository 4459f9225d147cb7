use std::fmt::Write as _;

use crate::model::{RenderedResult, StateUpdate, WeatherSnapshot};

/// Render a snapshot into the conversational narrative plus the compact
/// state update the hosting layer may merge into session memory.
///
/// Pure function with no failure path: a snapshot that deserialized is
/// renderable. Block order is fixed — header, current conditions, optional
/// air quality, optional forecast, optional alerts.
pub fn render(snapshot: &WeatherSnapshot, days: i64, include_alerts: bool) -> RenderedResult {
    let location = &snapshot.location;
    let current = &snapshot.current;

    let mut narrative = format!(
        "🌍 Weather for {}, {}, {}:\n\n",
        location.name, location.region, location.country
    );

    let _ = write!(
        narrative,
        "🌡️ Current: {}°F ({}°C)\n\
         ☁️ Conditions: {}\n\
         🤚 Feels like: {}°F ({}°C)\n\
         💧 Humidity: {}%\n\
         💨 Wind: {} mph {}\n",
        current.temp_f,
        current.temp_c,
        current.condition.text,
        current.feelslike_f,
        current.feelslike_c,
        current.humidity,
        current.wind_mph,
        current.wind_dir,
    );

    if let Some(epa) = current.air_quality.as_ref().and_then(|aq| aq.us_epa_index) {
        let _ = writeln!(narrative, "🌬️ Air Quality Index: {epa}");
    }

    let forecast_days = &snapshot.forecast.forecastday;
    if days > 1 && forecast_days.len() > 1 {
        let _ = write!(narrative, "\n📅 {days}-Day Forecast:\n");
        // The first entry is "today", already covered by the current block.
        for entry in &forecast_days[1..] {
            let day = &entry.day;
            let _ = write!(
                narrative,
                "\n📆 {}: {}\n  \
                 🔺 High: {}°F ({}°C)\n  \
                 🔻 Low: {}°F ({}°C)\n  \
                 🌧️ Rain chance: {}%\n",
                entry.date,
                day.condition.text,
                day.maxtemp_f,
                day.maxtemp_c,
                day.mintemp_f,
                day.mintemp_c,
                day.daily_chance_of_rain,
            );
        }
    }

    let alerts = snapshot.alert_entries();
    if include_alerts && !alerts.is_empty() {
        narrative.push_str("\n⚠️ Weather Alerts:\n");
        for alert in alerts {
            let _ = writeln!(narrative, "• {}", alert.headline);
        }
    }

    RenderedResult {
        narrative,
        state_update: Some(StateUpdate {
            location: location.name.clone(),
            temperature_f: current.temp_f,
            condition: current.condition.text.clone(),
            updated_at: current.last_updated.clone(),
        }),
    }
}
