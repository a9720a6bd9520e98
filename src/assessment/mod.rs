//! Tier assessment of retrieval candidates through a language model.
//!
//! One structured request covers every candidate of every domain. The
//! response must echo the exact candidate set back with a tier per path;
//! anything else (provider failure, unparsable text, missing or surplus
//! paths) fails the attempt. Attempts escalate through prompt variants
//! with a fixed delay in between, and after the last attempt tiers are
//! derived from embedding scores instead. This phase never fails the run.

pub mod error;
pub mod prompt;
pub mod retry;


pub use error::{AssessmentError, AssessmentResult, ValidationFailure};
pub use retry::{PromptVariant, RetryStep, next_step};

use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::classify::RelevanceClassifier;
use crate::constants::{FALLBACK_PRIMARY_ABOVE, FALLBACK_SECONDARY_FROM};
use crate::model::{
    AssessmentSource, Domain, DomainMap, FileCandidate, FileSummary, NormalizedRequirements,
    RelevanceTier,
};
use crate::retrieval::RetrievalOutput;

/// Tier assignments covering exactly the candidate set sent to the
/// classifier, tagged with their provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentOutput {
    pub tiers: DomainMap<HashMap<String, RelevanceTier>>,
    pub source: AssessmentSource,
}

impl AssessmentOutput {
    /// Tier assigned to `path` within `domain`, if the file was assessed.
    pub fn tier_for(&self, domain: Domain, path: &str) -> Option<RelevanceTier> {
        self.tiers.get(domain).get(path).copied()
    }

    /// Total number of (domain, file) tier assignments.
    pub fn assessed_files(&self) -> usize {
        self.tiers.iter().map(|(_, tiers)| tiers.len()).sum()
    }
}

/// Expected response shape: one tier entry per sent candidate, grouped
/// by domain. Absent domain keys read as empty.
#[derive(Debug, Deserialize)]
struct AssessmentResponse {
    #[serde(default)]
    best_practices: Vec<TierEntry>,
    #[serde(default)]
    functional: Vec<TierEntry>,
    #[serde(default)]
    non_functional: Vec<TierEntry>,
}

#[derive(Debug, Deserialize)]
struct TierEntry {
    path: String,
    tier: RelevanceTier,
}

impl AssessmentResponse {
    fn entries(&self, domain: Domain) -> &[TierEntry] {
        match domain {
            Domain::BestPractices => &self.best_practices,
            Domain::Functional => &self.functional,
            Domain::NonFunctional => &self.non_functional,
        }
    }
}

/// Assigns a relevance tier to every summarized retrieval candidate.
///
/// Candidates without an entry in `summaries` are excluded from the
/// request (the model would have no content to judge) and logged; fusion
/// later treats them as irrelevant.
#[instrument(skip_all)]
pub async fn assess<C: RelevanceClassifier>(
    classifier: &C,
    retrieval: &RetrievalOutput,
    summaries: &HashMap<String, FileSummary>,
    requirements: &NormalizedRequirements,
) -> AssessmentOutput {
    let sent = sendable_candidates(retrieval, summaries);
    let sent_total: usize = sent.iter().map(|(_, candidates)| candidates.len()).sum();

    if sent_total == 0 {
        debug!("no summarized candidates to assess, skipping classifier");
        return AssessmentOutput {
            tiers: DomainMap::default(),
            source: AssessmentSource::Model,
        };
    }

    let user_prompt = prompt::user_prompt(&sent, summaries, requirements);
    debug!(
        candidates = sent_total,
        prompt_chars = user_prompt.len(),
        "requesting tier assessment"
    );

    let mut attempt = 1u32;
    let mut variant = PromptVariant::Full;
    loop {
        match attempt_classification(classifier, variant, &user_prompt, &sent).await {
            Ok(tiers) => {
                debug!(attempt, "classifier response validated");
                return AssessmentOutput {
                    tiers,
                    source: AssessmentSource::Model,
                };
            }
            Err(error) => {
                warn!(attempt, %error, "classification attempt failed");
                match retry::next_step(attempt) {
                    RetryStep::Retry {
                        variant: next_variant,
                        delay,
                    } => {
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        variant = next_variant;
                    }
                    RetryStep::Fallback => {
                        warn!(
                            attempts = attempt,
                            "classification exhausted, deriving tiers from embedding scores"
                        );
                        return AssessmentOutput {
                            tiers: fallback_tiers(&sent),
                            source: AssessmentSource::Heuristic,
                        };
                    }
                }
            }
        }
    }
}

/// Restricts retrieval candidates to those present in the summary set.
fn sendable_candidates(
    retrieval: &RetrievalOutput,
    summaries: &HashMap<String, FileSummary>,
) -> DomainMap<Vec<FileCandidate>> {
    DomainMap::from_fn(|domain| {
        let mut sendable = Vec::new();
        for candidate in &retrieval.get(domain).candidates {
            if summaries.contains_key(&candidate.path) {
                sendable.push(candidate.clone());
            } else {
                warn!(
                    domain = domain.as_str(),
                    path = %candidate.path,
                    "candidate has no summary, excluded from assessment"
                );
            }
        }
        sendable
    })
}

async fn attempt_classification<C: RelevanceClassifier>(
    classifier: &C,
    variant: PromptVariant,
    user_prompt: &str,
    sent: &DomainMap<Vec<FileCandidate>>,
) -> AssessmentResult<DomainMap<HashMap<String, RelevanceTier>>> {
    let system_prompt = prompt::system_prompt(variant);
    let raw = classifier.classify(&system_prompt, user_prompt).await?;
    let response = parse_response(&raw)?;
    validate_response(&response, sent)?;

    Ok(DomainMap::from_fn(|domain| {
        response
            .entries(domain)
            .iter()
            .map(|entry| (entry.path.clone(), entry.tier))
            .collect()
    }))
}

fn parse_response(raw: &str) -> AssessmentResult<AssessmentResponse> {
    serde_json::from_str(clean_response_text(raw)).map_err(|source| AssessmentError::Malformed {
        reason: source.to_string(),
    })
}

/// Strips Markdown fences and surrounding prose chat models wrap JSON
/// in, keeping the outermost brace-delimited span.
pub fn clean_response_text(raw: &str) -> &str {
    match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start <= end => &raw[start..=end],
        _ => raw.trim(),
    }
}

/// Checks that the response covers the sent candidate set exactly:
/// every path once, nothing extra.
fn validate_response(
    response: &AssessmentResponse,
    sent: &DomainMap<Vec<FileCandidate>>,
) -> AssessmentResult<()> {
    let mut failure = ValidationFailure::default();

    for (domain, candidates) in sent.iter() {
        let expected: HashSet<&str> = candidates.iter().map(|c| c.path.as_str()).collect();
        let mut seen: HashSet<&str> = HashSet::with_capacity(expected.len());

        for entry in response.entries(domain) {
            if !expected.contains(entry.path.as_str()) {
                failure.unexpected.push((domain, entry.path.clone()));
            } else if !seen.insert(entry.path.as_str()) {
                failure.duplicated.push((domain, entry.path.clone()));
            }
        }

        for candidate in candidates {
            if !seen.contains(candidate.path.as_str()) {
                failure.missing.push((domain, candidate.path.clone()));
            }
        }
    }

    if failure.is_empty() {
        Ok(())
    } else {
        Err(AssessmentError::Incomplete(failure))
    }
}

/// Deterministic tier from an embedding score, used when every
/// classification attempt has failed.
pub fn fallback_tier(embedding_score: f32) -> RelevanceTier {
    if embedding_score > FALLBACK_PRIMARY_ABOVE {
        RelevanceTier::Primary
    } else if embedding_score >= FALLBACK_SECONDARY_FROM {
        RelevanceTier::Secondary
    } else {
        RelevanceTier::Supporting
    }
}

fn fallback_tiers(
    sent: &DomainMap<Vec<FileCandidate>>,
) -> DomainMap<HashMap<String, RelevanceTier>> {
    DomainMap::from_fn(|domain| {
        sent.get(domain)
            .iter()
            .map(|candidate| {
                (
                    candidate.path.clone(),
                    fallback_tier(candidate.embedding_score),
                )
            })
            .collect()
    })
}
