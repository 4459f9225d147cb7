use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::{
    error::FetchError,
    model::{CanonicalRequest, WeatherSnapshot},
    provider::ForecastProvider,
};

const FORECAST_URL: &str = "http://api.weatherapi.com/v1/forecast.json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Forecast client for WeatherAPI.com.
///
/// One GET per invocation, bounded by [`REQUEST_TIMEOUT`]. Every outcome is
/// mapped to a [`FetchError`] variant; nothing is retried.
#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: String) -> Self {
        Self { api_key, http: Client::new() }
    }
}

#[async_trait]
impl ForecastProvider for WeatherApiProvider {
    async fn fetch(&self, request: &CanonicalRequest) -> Result<WeatherSnapshot, FetchError> {
        // Credential gate: checked before any network I/O.
        if self.api_key.is_empty() {
            return Err(FetchError::Unconfigured);
        }

        debug!(location = %request.location, days = request.days, "requesting forecast");

        let days = request.days.to_string();
        let alerts = if request.include_alerts { "yes" } else { "no" };

        let res = self
            .http
            .get(FORECAST_URL)
            .timeout(REQUEST_TIMEOUT)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", request.location.as_str()),
                ("days", days.as_str()),
                ("aqi", "yes"),
                ("alerts", alerts),
            ])
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = res.status();
        let body = res.text().await.map_err(classify_transport_error)?;

        if !status.is_success() {
            return Err(classify_status(status, &body));
        }

        serde_json::from_str::<WeatherSnapshot>(&body)
            .map_err(|e| FetchError::MalformedResponse(e.to_string()))
    }
}

fn classify_transport_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else if err.is_connect() {
        FetchError::ConnectionFailed(err.to_string())
    } else {
        FetchError::Unexpected(err.to_string())
    }
}

fn classify_status(status: StatusCode, body: &str) -> FetchError {
    match status {
        // WeatherAPI answers 400 for ambiguous or unknown location strings.
        StatusCode::BAD_REQUEST => FetchError::LocationNotFound,
        StatusCode::UNAUTHORIZED => FetchError::AuthFailed,
        _ => FetchError::ServiceUnavailable { status: status.as_u16(), body: truncate_body(body) },
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
