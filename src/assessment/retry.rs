//! Pure attempt-progression strategy for the assessment phase.
//!
//! Decoupled from the transport so the escalation ladder is testable
//! without a classifier.

use std::time::Duration;

use crate::constants::{CLASSIFY_ATTEMPT_DELAY, MAX_CLASSIFY_ATTEMPTS};

/// Which system prompt a classification attempt uses.
///
/// Attempts escalate from the full instructional prompt towards terser,
/// format-focused ones as earlier attempts fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptVariant {
    /// Full instructional prompt (attempt 1).
    Full,
    /// Full prompt plus a strict JSON-only directive (attempt 2).
    JsonOnly,
    /// Minimal terse prompt (attempt 3).
    Minimal,
}

impl PromptVariant {
    /// Variant used by the given 1-based attempt number.
    pub fn for_attempt(attempt: u32) -> Self {
        match attempt {
            0 | 1 => PromptVariant::Full,
            2 => PromptVariant::JsonOnly,
            _ => PromptVariant::Minimal,
        }
    }
}

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryStep {
    /// Wait `delay`, then retry with `variant`.
    Retry {
        variant: PromptVariant,
        delay: Duration,
    },
    /// Attempts exhausted; derive tiers from embedding scores.
    Fallback,
}

/// Progression after `failed_attempt` (1-based) has failed.
pub fn next_step(failed_attempt: u32) -> RetryStep {
    if failed_attempt >= MAX_CLASSIFY_ATTEMPTS {
        RetryStep::Fallback
    } else {
        RetryStep::Retry {
            variant: PromptVariant::for_attempt(failed_attempt + 1),
            delay: CLASSIFY_ATTEMPT_DELAY,
        }
    }
}
