use thiserror::Error;

/// Errors returned by marketplace agent operations.
///
/// A 402 response is not an error: it is reported through
/// `PremiumOutcome::PaymentRequired` by the client.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("http error: {0}")]
    HttpError(String),

    #[error("api error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}
