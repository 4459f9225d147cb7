use thiserror::Error;

/// Failure taxonomy for the outbound forecast call.
///
/// Every variant is terminal for the current invocation — no retries. The
/// payload strings are raw detail for the logs; user-facing wording lives in
/// the orchestrator.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("weather API key is not configured")]
    Unconfigured,

    #[error("weather API request timed out")]
    Timeout,

    #[error("weather API did not recognize the requested location")]
    LocationNotFound,

    #[error("weather API rejected the configured credentials")]
    AuthFailed,

    #[error("weather API returned status {status}: {body}")]
    ServiceUnavailable { status: u16, body: String },

    #[error("failed to reach the weather API: {0}")]
    ConnectionFailed(String),

    #[error("weather API response did not match the expected shape: {0}")]
    MalformedResponse(String),

    #[error("unexpected failure during weather fetch: {0}")]
    Unexpected(String),
}
