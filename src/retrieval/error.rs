use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::model::Domain;

/// Result alias for retrieval-phase operations.
pub type RetrievalResult<T> = Result<T, RetrievalError>;

/// Errors that abort the retrieval phase (and with it the whole run).
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// Embedding a category query failed.
    #[error("failed to embed query for category '{category}' ({domain}): {source}")]
    QueryEmbedFailed {
        domain: Domain,
        category: String,
        #[source]
        source: EmbeddingError,
    },

    /// Embedding a file failed.
    #[error("failed to embed file '{path}': {source}")]
    FileEmbedFailed {
        path: String,
        #[source]
        source: EmbeddingError,
    },
}
