//! Hybrid relevance mapping engine.
//!
//! Maps a repository's files against normalized requirements in three
//! phases: embedding retrieval with adaptive thresholding, LLM tier
//! assessment with strict validation and an embedding-score fallback,
//! and multiplicative fusion into per-domain hybrid scores.
//!
//! # Public API Surface
//!
//! ## Pipeline
//! - [`RelevanceMapper`] - Three-phase orchestrator and main entry point
//! - [`MapperConfig`], [`ConfigError`] - Tuning knobs with env overrides
//! - [`RelevanceMappingResult`], [`MappingMetadata`] - Run output
//!
//! ## Model Types
//! - [`Domain`], [`DomainMap`] - The three requirement groupings
//! - [`FileSummary`], [`FileCandidate`], [`HybridScoredFile`] - Per-file
//!   records moving through the phases
//! - [`RelevanceTier`], [`AssessmentSource`] - Tier labels and provenance
//!
//! ## Capability Clients
//! - [`EmbeddingClient`] / [`HttpEmbeddingClient`] - Embedding seam and
//!   its OpenAI-compatible HTTP implementation
//! - [`RelevanceClassifier`] / [`GenaiClassifier`] - Chat-model seam and
//!   its `genai` implementation
//!
//! ## Phases (advanced use)
//! The phase modules [`retrieval`], [`assessment`], and [`fusion`] are
//! public for callers composing the phases themselves.
//!
//! ## Test/Mock Support
//! [`MockEmbeddingClient`] and [`MockClassifier`] are available behind
//! `#[cfg(any(test, feature = "mock"))]`.

pub mod assessment;
pub mod classify;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod fusion;
pub mod model;
pub mod pipeline;
pub mod retrieval;
pub mod similarity;

pub use assessment::{
    AssessmentError, AssessmentOutput, AssessmentResult, ValidationFailure, assess,
};
pub use classify::{
    ClassifyError, ClassifyResult, DEFAULT_CLASSIFIER_MODEL, GenaiClassifier,
    GenaiClassifierConfig, RelevanceClassifier,
};
#[cfg(any(test, feature = "mock"))]
pub use classify::MockClassifier;

pub use config::{ConfigError, MapperConfig};
pub use embedding::{
    DEFAULT_EMBEDDING_MODEL, DEFAULT_EMBEDDING_URL, EmbeddingClient, EmbeddingError,
    EmbeddingResult, HttpEmbedderConfig, HttpEmbeddingClient,
};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbeddingClient;

pub use fusion::fuse;
pub use model::{
    AssessmentSource, Domain, DomainMap, FileCandidate, FileKind, FileSummary, HybridScoredFile,
    MappingMetadata, NormalizedRequirements, RelevanceMappingResult, RelevanceTier,
    RequirementCategory,
};
pub use pipeline::{MappingError, MappingResult, RelevanceMapper};
pub use retrieval::{DomainRetrieval, RetrievalError, RetrievalOutput, RetrievalResult, retrieve};
pub use similarity::cosine_similarity;
