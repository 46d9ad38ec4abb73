use thiserror::Error;

/// Error type for calls to the prescription service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The service answered with a structured `{"error": ...}` payload
    #[error("{0}")]
    Server(String),

    /// The request never produced a response (connection refused, timeout, DNS)
    #[error("No response from server: {0}")]
    NoResponse(String),

    /// A response arrived but could not be used
    #[error("Unexpected response: {0}")]
    Unexpected(String),

    /// The client configuration cannot produce a usable endpoint
    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl From<url::ParseError> for ClientError {
    fn from(error: url::ParseError) -> Self {
        ClientError::Config(error.to_string())
    }
}
