use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    config::Config,
    error::FetchError,
    model::{CanonicalRequest, WeatherSnapshot},
    provider::weatherapi::WeatherApiProvider,
};

pub mod weatherapi;

/// Abstraction over the remote forecast source.
///
/// The orchestrator owns a boxed provider, so tests can substitute a scripted
/// implementation without network access.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn fetch(&self, request: &CanonicalRequest) -> Result<WeatherSnapshot, FetchError>;
}

/// Construct the production provider from config.
///
/// A missing credential is not an error here: the provider reports
/// `FetchError::Unconfigured` at fetch time, which the orchestrator turns
/// into a user-safe narrative.
pub fn provider_from_config(config: &Config) -> Box<dyn ForecastProvider> {
    Box::new(WeatherApiProvider::new(config.api_key().unwrap_or_default().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn provider_without_key_reports_unconfigured() {
        let cfg = Config::default();
        let provider = provider_from_config(&cfg);

        let request =
            CanonicalRequest { location: "Oslo".into(), days: 1, include_alerts: false };
        let err = provider.fetch(&request).await.unwrap_err();
        assert!(matches!(err, FetchError::Unconfigured));
    }
}
