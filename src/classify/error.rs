use thiserror::Error;

/// Result alias for classification operations.
pub type ClassifyResult<T> = Result<T, ClassifyError>;

#[derive(Debug, Error)]
pub enum ClassifyError {
    /// Transport or provider failure.
    #[error("classification provider error: {reason}")]
    Provider { reason: String },

    /// The provider answered without any text content.
    #[error("classification response contained no text")]
    EmptyResponse,
}
