//! Configuration error types.

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An integer-valued variable could not be parsed.
    #[error("failed to parse {name}='{value}' as an integer: {source}")]
    IntParseError {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// A float-valued variable (or list entry) could not be parsed.
    #[error("failed to parse {name}='{value}' as a float: {source}")]
    FloatParseError {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    /// A similarity threshold is outside the cosine range.
    #[error("invalid {name}: {value} is outside [-1, 1]")]
    ThresholdOutOfRange { name: &'static str, value: f32 },

    /// The hybrid-score cutoff is outside its meaningful range.
    #[error("invalid hybrid_score_threshold: {value} is outside [0, 1]")]
    HybridThresholdOutOfRange { value: f32 },

    /// A count-valued setting that must be positive was zero.
    #[error("{name} must be greater than zero")]
    ZeroValue { name: &'static str },

    /// The retry ladder is not strictly descending below the primary threshold.
    #[error(
        "embedding_retry_thresholds must descend strictly below embedding_threshold {primary}, got {ladder:?}"
    )]
    RetryLadderNotDescending { primary: f32, ladder: Vec<f32> },
}
