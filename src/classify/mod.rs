//! Classification capability: the async seam to the language-model service.
//!
//! [`GenaiClassifier`] is the production implementation over the `genai`
//! multi-provider chat client; [`MockClassifier`] scripts responses in tests.

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use client::{
    DEFAULT_CLASSIFIER_MODEL, GenaiClassifier, GenaiClassifierConfig, RelevanceClassifier,
};
pub use error::{ClassifyError, ClassifyResult};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockClassifier;
