//! Environment-backed pipeline configuration.
//!
//! Every setting has a default. Override with `RELMAP_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;

use crate::constants::{
    DEFAULT_EMBEDDING_THRESHOLD, DEFAULT_EMBEDDING_TOP_K, DEFAULT_HYBRID_SCORE_THRESHOLD,
    DEFAULT_MAX_TOKENS_PER_FILE, DEFAULT_MIN_CANDIDATES_FOR_PHASE2, DEFAULT_PARALLEL_BATCH_SIZE,
    DEFAULT_RETRY_THRESHOLDS,
};

/// Tuning knobs for one mapping run.
///
/// Use [`MapperConfig::from_env`] to read `RELMAP_*` overrides on top of
/// defaults. The struct is read-only once handed to the mapper; there is no
/// process-wide mutable configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MapperConfig {
    /// Max candidates kept per domain after threshold filtering. Default: `20`.
    pub embedding_top_k: usize,

    /// Primary cosine-similarity cutoff. Default: `0.55`.
    pub embedding_threshold: f32,

    /// Descending ladder of fallback cutoffs tried when too few candidates
    /// survive the primary cutoff. Default: `[0.45, 0.35, 0.25, 0.15]`.
    pub embedding_retry_thresholds: Vec<f32>,

    /// Candidate-pool size below which the ladder kicks in. Default: `10`.
    pub min_candidates_for_phase2: usize,

    /// Per-file token budget before embedding (4 chars/token). Default: `6000`.
    pub max_tokens_per_file: usize,

    /// File-embedding calls kept in flight at once. Default: `10`.
    pub parallel_batch_size: usize,

    /// Minimum hybrid score for final inclusion. Default: `0.20`.
    pub hybrid_score_threshold: f32,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            embedding_top_k: DEFAULT_EMBEDDING_TOP_K,
            embedding_threshold: DEFAULT_EMBEDDING_THRESHOLD,
            embedding_retry_thresholds: DEFAULT_RETRY_THRESHOLDS.to_vec(),
            min_candidates_for_phase2: DEFAULT_MIN_CANDIDATES_FOR_PHASE2,
            max_tokens_per_file: DEFAULT_MAX_TOKENS_PER_FILE,
            parallel_batch_size: DEFAULT_PARALLEL_BATCH_SIZE,
            hybrid_score_threshold: DEFAULT_HYBRID_SCORE_THRESHOLD,
        }
    }
}

impl MapperConfig {
    const ENV_TOP_K: &'static str = "RELMAP_EMBEDDING_TOP_K";
    const ENV_THRESHOLD: &'static str = "RELMAP_EMBEDDING_THRESHOLD";
    const ENV_RETRY_THRESHOLDS: &'static str = "RELMAP_EMBEDDING_RETRY_THRESHOLDS";
    const ENV_MIN_CANDIDATES: &'static str = "RELMAP_MIN_CANDIDATES_FOR_PHASE2";
    const ENV_MAX_TOKENS: &'static str = "RELMAP_MAX_TOKENS_PER_FILE";
    const ENV_BATCH_SIZE: &'static str = "RELMAP_PARALLEL_BATCH_SIZE";
    const ENV_HYBRID_THRESHOLD: &'static str = "RELMAP_HYBRID_SCORE_THRESHOLD";

    /// Loads configuration from environment variables (falling back to defaults).
    ///
    /// Selection-semantics knobs (thresholds, top-k, minimum pool size) fail
    /// hard on unparsable values; throughput knobs (token budget, batch size)
    /// fall back to their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let embedding_top_k = Self::parse_usize_from_env(Self::ENV_TOP_K, defaults.embedding_top_k)?;
        let embedding_threshold =
            Self::parse_f32_from_env(Self::ENV_THRESHOLD, defaults.embedding_threshold)?;
        let embedding_retry_thresholds = Self::parse_threshold_list_from_env(
            Self::ENV_RETRY_THRESHOLDS,
            defaults.embedding_retry_thresholds,
        )?;
        let min_candidates_for_phase2 =
            Self::parse_usize_from_env(Self::ENV_MIN_CANDIDATES, defaults.min_candidates_for_phase2)?;
        let max_tokens_per_file =
            Self::parse_lenient_usize_from_env(Self::ENV_MAX_TOKENS, defaults.max_tokens_per_file);
        let parallel_batch_size =
            Self::parse_lenient_usize_from_env(Self::ENV_BATCH_SIZE, defaults.parallel_batch_size);
        let hybrid_score_threshold =
            Self::parse_f32_from_env(Self::ENV_HYBRID_THRESHOLD, defaults.hybrid_score_threshold)?;

        Ok(Self {
            embedding_top_k,
            embedding_threshold,
            embedding_retry_thresholds,
            min_candidates_for_phase2,
            max_tokens_per_file,
            parallel_batch_size,
            hybrid_score_threshold,
        })
    }

    /// Validates range invariants.
    ///
    /// An empty retry ladder is legal and means the primary threshold is
    /// never relaxed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(-1.0..=1.0).contains(&self.embedding_threshold) {
            return Err(ConfigError::ThresholdOutOfRange {
                name: "embedding_threshold",
                value: self.embedding_threshold,
            });
        }

        if !(0.0..=1.0).contains(&self.hybrid_score_threshold) {
            return Err(ConfigError::HybridThresholdOutOfRange {
                value: self.hybrid_score_threshold,
            });
        }

        for &threshold in &self.embedding_retry_thresholds {
            if !(-1.0..=1.0).contains(&threshold) {
                return Err(ConfigError::ThresholdOutOfRange {
                    name: "embedding_retry_thresholds",
                    value: threshold,
                });
            }
        }

        let mut previous = self.embedding_threshold;
        for &threshold in &self.embedding_retry_thresholds {
            if threshold >= previous {
                return Err(ConfigError::RetryLadderNotDescending {
                    primary: self.embedding_threshold,
                    ladder: self.embedding_retry_thresholds.clone(),
                });
            }
            previous = threshold;
        }

        if self.embedding_top_k == 0 {
            return Err(ConfigError::ZeroValue {
                name: "embedding_top_k",
            });
        }
        if self.max_tokens_per_file == 0 {
            return Err(ConfigError::ZeroValue {
                name: "max_tokens_per_file",
            });
        }
        if self.parallel_batch_size == 0 {
            return Err(ConfigError::ZeroValue {
                name: "parallel_batch_size",
            });
        }

        Ok(())
    }

    fn parse_usize_from_env(name: &'static str, default: usize) -> Result<usize, ConfigError> {
        match env::var(name) {
            Ok(value) => value.parse().map_err(|e| ConfigError::IntParseError {
                name,
                value,
                source: e,
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_lenient_usize_from_env(name: &str, default: usize) -> usize {
        env::var(name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn parse_f32_from_env(name: &'static str, default: f32) -> Result<f32, ConfigError> {
        match env::var(name) {
            Ok(value) => value.parse().map_err(|e| ConfigError::FloatParseError {
                name,
                value,
                source: e,
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parses a comma-separated float list; an empty or whitespace-only
    /// variable counts as unset.
    fn parse_threshold_list_from_env(
        name: &'static str,
        default: Vec<f32>,
    ) -> Result<Vec<f32>, ConfigError> {
        let raw = match env::var(name) {
            Ok(value) if !value.trim().is_empty() => value,
            _ => return Ok(default),
        };

        raw.split(',')
            .map(|entry| {
                let entry = entry.trim();
                entry.parse().map_err(|e| ConfigError::FloatParseError {
                    name,
                    value: entry.to_string(),
                    source: e,
                })
            })
            .collect()
    }
}
