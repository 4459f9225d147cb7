use serde_json::{Value, json};
use tracing::{error, info, warn};

use crate::{
    error::FetchError,
    model::{CanonicalRequest, RawInvocation, RenderedResult},
    provider::ForecastProvider,
    render,
};

pub const TOOL_NAME: &str = "get_weather";

/// Invocation orchestrator: the single entry point the hosting layer calls.
///
/// Owns an explicitly-constructed component graph (normalizer → provider →
/// renderer). Every failure is converted into a fixed, user-safe narrative;
/// no error ever escapes to the caller.
#[derive(Debug)]
pub struct WeatherAgent {
    provider: Box<dyn ForecastProvider>,
}

impl WeatherAgent {
    pub fn new(provider: Box<dyn ForecastProvider>) -> Self {
        Self { provider }
    }

    /// JSON schema describing the tool to the conversational host.
    pub fn definition() -> Value {
        json!({
            "name": TOOL_NAME,
            "description": "Get comprehensive weather information including current conditions and forecasts for any location worldwide",
            "parameters": {
                "type": "object",
                "properties": {
                    "location": {
                        "type": "string",
                        "description": "Location name, address, or coordinates (e.g., 'Tulsa, Oklahoma', 'New York, NY', '40.7128,-74.0060')"
                    },
                    "days": {
                        "type": "integer",
                        "description": "Number of forecast days to include (1-10)",
                        "minimum": 1,
                        "maximum": 10,
                        "default": 1
                    },
                    "include_alerts": {
                        "type": "boolean",
                        "description": "Whether to include weather alerts and warnings",
                        "default": false
                    }
                },
                "required": ["location"]
            }
        })
    }

    /// Handle a hosting-layer argument object as delivered on the wire.
    pub async fn handle_args(&self, args: Value) -> RenderedResult {
        let invocation: RawInvocation = match serde_json::from_value(args) {
            Ok(invocation) => invocation,
            Err(e) => {
                warn!("invocation arguments were not an argument object: {e}");
                RawInvocation::default()
            }
        };
        self.handle_invocation(invocation).await
    }

    pub async fn handle_invocation(&self, invocation: RawInvocation) -> RenderedResult {
        self.handle_request(invocation.normalize()).await
    }

    async fn handle_request(&self, request: CanonicalRequest) -> RenderedResult {
        info!(
            location = %request.location,
            days = request.days,
            include_alerts = request.include_alerts,
            "weather request"
        );

        if request.location.is_empty() {
            return RenderedResult::narrative_only(
                "Please specify a location to get weather information.",
            );
        }

        let snapshot = match self.provider.fetch(&request).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                // Raw detail goes to the logs; the caller gets a fixed sentence.
                error!(location = %request.location, "weather fetch failed: {err}");
                return RenderedResult::narrative_only(failure_narrative(&err, &request.location));
            }
        };

        info!(
            location = %request.location,
            observed_at = ?snapshot.observed_at(),
            "weather data retrieved"
        );
        render::render(&snapshot, request.days, request.include_alerts)
    }
}

/// One fixed, user-safe sentence per failure kind. Never echoes provider
/// error text or credentials.
fn failure_narrative(err: &FetchError, location: &str) -> String {
    match err {
        FetchError::Unconfigured => {
            "Weather service is not configured. Please contact support.".to_string()
        }
        FetchError::Timeout => {
            "Weather service is taking too long to respond. Please try again.".to_string()
        }
        FetchError::LocationNotFound => format!(
            "Could not find weather data for '{location}'. \
             Please check the location name and try again."
        ),
        FetchError::AuthFailed => {
            "Weather service authentication failed. Please contact support.".to_string()
        }
        FetchError::ServiceUnavailable { .. } => {
            "Weather service is currently unavailable. Please try again later.".to_string()
        }
        FetchError::ConnectionFailed(_) => {
            "Unable to connect to weather service. Please try again later.".to_string()
        }
        FetchError::MalformedResponse(_) => {
            "Weather service returned data that could not be understood. Please try again."
                .to_string()
        }
        FetchError::Unexpected(_) => {
            "An unexpected error occurred while getting weather data. Please try again.".to_string()
        }
    }
}
