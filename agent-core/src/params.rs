use serde_json::Value;

use crate::model::{CanonicalRequest, RawInvocation};

pub const MIN_FORECAST_DAYS: i64 = 1;
pub const MAX_FORECAST_DAYS: i64 = 10;

/// Normalize a loosely-typed invocation triple into a [`CanonicalRequest`].
///
/// Hosts deliver tool arguments in several shapes: plain scalars, mappings,
/// string-encoded mappings, and double-wrapped `{"argument": {...}}` objects.
/// The shape-detection rules below run in a fixed order, and every malformed
/// input degrades to a safe default instead of failing.
pub fn normalize(location: Value, days: Value, include_alerts: Value) -> CanonicalRequest {
    let mut days = days;
    let mut include_alerts = include_alerts;

    // Rule 1: a mapping (or string-encoded mapping) in the location slot may
    // carry the whole argument object.
    let location = match location {
        Value::Object(map) => map.get("location").map(scalar_to_string).unwrap_or_default(),
        Value::String(s) if s.starts_with('{') => match serde_json::from_str::<Value>(&s) {
            Ok(Value::Object(map)) => {
                if let Some(d) = map.get("days") {
                    days = d.clone();
                }
                if let Some(a) = map.get("include_alerts") {
                    include_alerts = a.clone();
                }
                map.get("location").map(scalar_to_string).unwrap_or_default()
            }
            // Not parseable as a mapping: keep the original string.
            _ => s,
        },
        other => scalar_to_string(&other),
    };

    // Rule 2: some hosts wrap the arguments once more under "argument" and
    // hand the wrapper to the days slot.
    days = match days {
        Value::Object(map) => match map.get("argument") {
            Some(Value::Object(arg)) => {
                if let Some(a) = arg.get("include_alerts") {
                    include_alerts = a.clone();
                }
                arg.get("days").cloned().unwrap_or_else(|| Value::from(1))
            }
            _ => Value::from(1),
        },
        other => other,
    };
    let days = coerce_days(&days).clamp(MIN_FORECAST_DAYS, MAX_FORECAST_DAYS);

    // Rule 3: alert flags arrive as booleans or as spelled-out strings.
    let include_alerts = coerce_alerts(&include_alerts);

    CanonicalRequest { location: location.trim().to_string(), days, include_alerts }
}

impl RawInvocation {
    pub fn normalize(self) -> CanonicalRequest {
        normalize(self.location, self.days, self.include_alerts)
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Integer coercion with the leniency the hosts rely on: numbers truncate,
/// numeric strings parse, anything else falls back to a single day.
fn coerce_days(value: &Value) -> i64 {
    match value {
        Value::Number(n) => {
            n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)).unwrap_or(MIN_FORECAST_DAYS)
        }
        Value::String(s) => s.trim().parse::<i64>().unwrap_or(MIN_FORECAST_DAYS),
        Value::Bool(b) => i64::from(*b),
        _ => MIN_FORECAST_DAYS,
    }
}

fn coerce_alerts(value: &Value) -> bool {
    match value {
        Value::String(s) => matches!(s.to_lowercase().as_str(), "true" | "1" | "yes" | "on"),
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Null => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_scalars_pass_through() {
        let req = normalize(json!("New York"), json!(3), json!(true));

        assert_eq!(req.location, "New York");
        assert_eq!(req.days, 3);
        assert!(req.include_alerts);
    }

    #[test]
    fn location_mapping_is_unwrapped() {
        let req = normalize(json!({"location": "London"}), json!(1), json!(false));

        assert_eq!(req.location, "London");
        assert_eq!(req.days, 1);
        assert!(!req.include_alerts);
    }

    #[test]
    fn location_mapping_without_key_is_empty() {
        let req = normalize(json!({"city": "London"}), json!(1), json!(false));

        assert_eq!(req.location, "");
    }

    #[test]
    fn serialized_mapping_overwrites_siblings() {
        let encoded = r#"{"location": "Paris", "days": 4, "include_alerts": "yes"}"#;
        let req = normalize(json!(encoded), json!(1), json!(false));

        assert_eq!(req.location, "Paris");
        assert_eq!(req.days, 4);
        assert!(req.include_alerts);
    }

    #[test]
    fn unparseable_brace_string_falls_through() {
        let req = normalize(json!("{not json"), json!(2), json!(false));

        assert_eq!(req.location, "{not json");
        assert_eq!(req.days, 2);
    }

    #[test]
    fn double_wrapped_argument_is_unwrapped() {
        let days = json!({"argument": {"days": 5, "include_alerts": true}});
        let req = normalize(json!("Oslo"), days, json!(false));

        assert_eq!(req.days, 5);
        assert!(req.include_alerts);
    }

    #[test]
    fn mapping_without_argument_defaults_days() {
        let req = normalize(json!("Oslo"), json!({"unexpected": 7}), json!(false));

        assert_eq!(req.days, 1);
    }

    #[test]
    fn days_clamped_to_range() {
        for (given, expected) in [(-3, 1), (0, 1), (1, 1), (7, 7), (10, 10), (11, 10), (99, 10)] {
            let req = normalize(json!("Oslo"), json!(given), json!(false));
            assert_eq!(req.days, expected, "days={given}");
        }
    }

    #[test]
    fn unconvertible_days_default_to_one() {
        for given in [json!(null), json!("soon"), json!("2.5"), json!([3])] {
            let req = normalize(json!("Oslo"), given.clone(), json!(false));
            assert_eq!(req.days, 1, "days={given}");
        }
    }

    #[test]
    fn numeric_string_days_parse() {
        let req = normalize(json!("Oslo"), json!(" 6 "), json!(false));

        assert_eq!(req.days, 6);
    }

    #[test]
    fn fractional_days_truncate() {
        let req = normalize(json!("Oslo"), json!(3.9), json!(false));

        assert_eq!(req.days, 3);
    }

    #[test]
    fn alert_strings_follow_the_allowlist() {
        for truthy in ["TRUE", "1", "yes", "On"] {
            let req = normalize(json!("Oslo"), json!(1), json!(truthy));
            assert!(req.include_alerts, "expected true for {truthy:?}");
        }
        for falsy in ["false", "", "no", "off", "maybe"] {
            let req = normalize(json!("Oslo"), json!(1), json!(falsy));
            assert!(!req.include_alerts, "expected false for {falsy:?}");
        }
    }

    #[test]
    fn non_string_alerts_use_truthiness() {
        assert!(normalize(json!("Oslo"), json!(1), json!(true)).include_alerts);
        assert!(normalize(json!("Oslo"), json!(1), json!(1)).include_alerts);
        assert!(!normalize(json!("Oslo"), json!(1), json!(0)).include_alerts);
        assert!(!normalize(json!("Oslo"), json!(1), json!(null)).include_alerts);
        assert!(!normalize(json!("Oslo"), json!(1), json!({})).include_alerts);
    }

    #[test]
    fn location_is_trimmed_and_may_end_up_empty() {
        let req = normalize(json!("   "), json!(1), json!(false));

        assert_eq!(req.location, "");
    }

    #[test]
    fn missing_fields_normalize_to_defaults() {
        let req = RawInvocation::default().normalize();

        assert_eq!(req.location, "");
        assert_eq!(req.days, 1);
        assert!(!req.include_alerts);
    }
}
