use thiserror::Error;

/// Errors a payment driver can surface to the caller
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Required request parameters are missing; raised before any network call
    #[error("validation error: {0}")]
    Validation(String),

    /// The gateway answered but reported failure; the message is the
    /// gateway's own and may be empty
    #[error("gateway error: {0}")]
    Gateway(String),

    /// Network-level failure (connect, TLS, timeout)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Payload (de)serialization failure on our side of the wire
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for payment operations
pub type Result<T> = std::result::Result<T, PaymentError>;
