//! Multiplicative fusion of embedding scores and assessed tiers.
//!
//! `hybrid_score = embedding_score * tier.weight()`. An Irrelevant tier
//! zeroes out even a high embedding score; a Primary tier preserves the
//! embedding ordering among top files. Entries at or above the hybrid
//! threshold are flagged `included`; the rest stay in the list for
//! inspection.


use std::cmp::Ordering;

use tracing::{debug, warn};

use crate::assessment::AssessmentOutput;
use crate::model::{DomainMap, HybridScoredFile, RelevanceTier};
use crate::retrieval::RetrievalOutput;

/// Fuses per-domain candidates with their assessed tiers.
///
/// Candidates the assessment never covered (unsummarized files) count as
/// `Irrelevant`. Output lists are descending by `hybrid_score`, ties
/// broken by path.
pub fn fuse(
    retrieval: &RetrievalOutput,
    assessment: &AssessmentOutput,
    hybrid_score_threshold: f32,
) -> DomainMap<Vec<HybridScoredFile>> {
    DomainMap::from_fn(|domain| {
        let tiers = assessment.tiers.get(domain);

        let mut scored: Vec<HybridScoredFile> = retrieval
            .get(domain)
            .candidates
            .iter()
            .map(|candidate| {
                let tier = match tiers.get(&candidate.path) {
                    Some(tier) => *tier,
                    None => {
                        warn!(
                            domain = domain.as_str(),
                            path = %candidate.path,
                            "candidate missing from assessment, treated as irrelevant"
                        );
                        RelevanceTier::Irrelevant
                    }
                };
                let hybrid_score = candidate.embedding_score * tier.weight();

                HybridScoredFile {
                    path: candidate.path.clone(),
                    embedding_score: candidate.embedding_score,
                    tier,
                    source: assessment.source,
                    hybrid_score,
                    included: hybrid_score >= hybrid_score_threshold,
                }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.hybrid_score
                .partial_cmp(&a.hybrid_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.path.cmp(&b.path))
        });

        debug!(
            domain = domain.as_str(),
            total = scored.len(),
            included = scored.iter().filter(|f| f.included).count(),
            "domain fused"
        );

        scored
    })
}
