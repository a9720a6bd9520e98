use thiserror::Error;

/// Result alias for embedding operations.
pub type EmbeddingResult<T> = Result<T, EmbeddingError>;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// The HTTP request could not be sent or timed out.
    #[error("embedding request to '{url}' failed: {source}")]
    RequestFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with a non-success status.
    #[error("embedding provider returned status {status}: {message}")]
    Provider { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("malformed embedding response: {reason}")]
    MalformedResponse { reason: String },

    /// The returned vector had the wrong dimension.
    #[error("invalid embedding dimension: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Client construction rejected its configuration.
    #[error("invalid embedding client configuration: {reason}")]
    InvalidConfig { reason: String },
}
