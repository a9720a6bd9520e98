//! Cross-cutting, shared constants.
//!
//! Prefer deriving secondary constants (e.g. character budgets) from primary ones to avoid drift.
//!
//! All tunable pipeline defaults live here; [`crate::config::MapperConfig`] references these so
//! that configuration, code, and tests agree on a single source of truth.

use std::time::Duration;

/// Embedding dimension assumed when none is configured (matches
/// OpenAI-compatible `text-embedding-3-small` providers).
pub const DEFAULT_EMBEDDING_DIM: usize = 1536;

/// Rough token-to-character conversion applied to every truncation budget.
pub const CHARS_PER_TOKEN: usize = 4;

/// Per-file token budget before a file's text is embedded.
pub const DEFAULT_MAX_TOKENS_PER_FILE: usize = 6000;

/// Character budget derived from [`DEFAULT_MAX_TOKENS_PER_FILE`].
pub const DEFAULT_MAX_CHARS_PER_FILE: usize = DEFAULT_MAX_TOKENS_PER_FILE * CHARS_PER_TOKEN;

/// Token budget for a category query string.
pub const QUERY_MAX_TOKENS: usize = 512;

/// Character budget derived from [`QUERY_MAX_TOKENS`].
pub const QUERY_MAX_CHARS: usize = QUERY_MAX_TOKENS * CHARS_PER_TOKEN;

/// How many requirement statements a category query includes at most.
pub const QUERY_REQUIREMENT_LIMIT: usize = 5;

/// Similarity cutoff applied first during candidate selection.
pub const DEFAULT_EMBEDDING_THRESHOLD: f32 = 0.55;

/// Cap on candidates kept per domain after threshold filtering.
pub const DEFAULT_EMBEDDING_TOP_K: usize = 20;

/// Ladder of progressively lower thresholds tried when the primary cutoff
/// yields too few candidates. Must stay strictly descending and below
/// [`DEFAULT_EMBEDDING_THRESHOLD`].
pub const DEFAULT_RETRY_THRESHOLDS: [f32; 4] = [0.45, 0.35, 0.25, 0.15];

/// Minimum candidate-pool size the assessment phase should receive per domain.
pub const DEFAULT_MIN_CANDIDATES_FOR_PHASE2: usize = 10;

/// Number of concurrent file-embedding requests kept in flight.
pub const DEFAULT_PARALLEL_BATCH_SIZE: usize = 10;

/// Minimum hybrid score for a file to make the final relevance set.
pub const DEFAULT_HYBRID_SCORE_THRESHOLD: f32 = 0.20;

/// Classification attempts before the deterministic fallback takes over.
pub const MAX_CLASSIFY_ATTEMPTS: u32 = 3;

/// Pause between consecutive classification attempts.
pub const CLASSIFY_ATTEMPT_DELAY: Duration = Duration::from_secs(1);

/// Embedding score above which the fallback assigns the primary tier.
pub const FALLBACK_PRIMARY_ABOVE: f32 = 0.6;

/// Embedding score at or above which the fallback assigns the secondary tier;
/// anything lower becomes supporting.
pub const FALLBACK_SECONDARY_FROM: f32 = 0.4;
