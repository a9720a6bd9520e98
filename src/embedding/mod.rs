//! Embedding capability: the async seam to the vector-embedding service.
//!
//! - [`http`] speaks an OpenAI-compatible `/embeddings` endpoint.
//! - [`mock`] provides a deterministic in-memory embedder for tests.

pub mod error;
pub mod http;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use error::{EmbeddingError, EmbeddingResult};
pub use http::{
    DEFAULT_EMBEDDING_MODEL, DEFAULT_EMBEDDING_URL, HttpEmbedderConfig, HttpEmbeddingClient,
};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbeddingClient;

/// Minimal async interface used by the retrieval phase.
///
/// Implementations must be deterministic enough for cosine comparison:
/// embedding the same text twice within a run yields interchangeable vectors.
pub trait EmbeddingClient: Send + Sync {
    /// Embeds one text into a fixed-dimension vector.
    fn embed(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = EmbeddingResult<Vec<f32>>> + Send;
}
