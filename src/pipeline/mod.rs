//! Three-phase orchestration: retrieval, assessment, fusion.
//!
//! [`RelevanceMapper`] owns both capability clients and an immutable
//! [`MapperConfig`]. One [`execute`](RelevanceMapper::execute) call maps a
//! repository's files against normalized requirements and returns the
//! per-domain scored lists with run metadata. Retrieval failure is fatal
//! to the call; assessment failure degrades to the embedding-score
//! fallback inside phase 2 and never surfaces here.

pub mod error;


pub use error::{MappingError, MappingResult};

use std::collections::HashMap;
use std::time::Instant;

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::assessment::{self, AssessmentOutput};
use crate::classify::RelevanceClassifier;
use crate::config::{ConfigError, MapperConfig};
use crate::embedding::EmbeddingClient;
use crate::fusion;
use crate::model::{
    AssessmentSource, Domain, FileSummary, MappingMetadata, NormalizedRequirements,
    RelevanceMappingResult,
};
use crate::retrieval;

/// Hybrid relevance mapper over an embedding client and a tier
/// classifier.
pub struct RelevanceMapper<E, C> {
    embedder: E,
    classifier: C,
    config: MapperConfig,
}

impl<E: EmbeddingClient, C: RelevanceClassifier> RelevanceMapper<E, C> {
    /// Validates `config` and builds a mapper owning both clients.
    pub fn new(embedder: E, classifier: C, config: MapperConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            embedder,
            classifier,
            config,
        })
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Maps `files` against `requirements` through all three phases.
    ///
    /// `files` holds raw contents keyed by path; `summaries` the static
    /// analyzer digests used as classifier context. Files without a
    /// summary can still be retrieved but are never sent to the
    /// classifier and end up excluded by fusion.
    #[instrument(skip_all, fields(files = files.len(), summaries = summaries.len()))]
    pub async fn execute(
        &self,
        files: &HashMap<String, String>,
        summaries: &HashMap<String, FileSummary>,
        requirements: &NormalizedRequirements,
    ) -> MappingResult<RelevanceMappingResult> {
        let run_id = Uuid::new_v4();
        let started = Instant::now();

        let phase1_started = Instant::now();
        let retrieval =
            retrieval::retrieve(&self.embedder, files, requirements, &self.config).await?;
        let phase1_ms = phase1_started.elapsed().as_millis() as u64;
        let phase1_total_candidates: usize =
            retrieval.iter().map(|(_, r)| r.candidates.len()).sum();
        info!(
            %run_id,
            candidates = phase1_total_candidates,
            elapsed_ms = phase1_ms,
            "retrieval phase complete"
        );

        let phase2_started = Instant::now();
        let assessment =
            assessment::assess(&self.classifier, &retrieval, summaries, requirements).await;
        let phase2_ms = phase2_started.elapsed().as_millis() as u64;
        let phase2_assessed_files = assessment.assessed_files();
        info!(
            %run_id,
            assessed = phase2_assessed_files,
            source = ?assessment.source,
            elapsed_ms = phase2_ms,
            "assessment phase complete"
        );

        let phase3_started = Instant::now();
        let files_by_domain =
            fusion::fuse(&retrieval, &assessment, self.config.hybrid_score_threshold);
        let phase3_ms = phase3_started.elapsed().as_millis() as u64;

        let final_included_files: usize = files_by_domain
            .iter()
            .map(|(_, scored)| scored.iter().filter(|f| f.included).count())
            .sum();
        let degraded_domains = degraded_domains(&assessment);
        let processing_time_ms = started.elapsed().as_millis() as u64;

        info!(
            %run_id,
            included = final_included_files,
            degraded = degraded_domains.len(),
            elapsed_ms = processing_time_ms,
            "mapping complete"
        );

        Ok(RelevanceMappingResult {
            files: files_by_domain,
            metadata: MappingMetadata {
                run_id,
                phase1_total_candidates,
                phase2_assessed_files,
                final_included_files,
                degraded_domains,
                phase1_ms,
                phase2_ms,
                phase3_ms,
                processing_time_ms,
                completed_at: Utc::now(),
            },
        })
    }
}

/// Domains whose tiers came from the embedding-score fallback.
fn degraded_domains(assessment: &AssessmentOutput) -> Vec<Domain> {
    if assessment.source != AssessmentSource::Heuristic {
        return Vec::new();
    }
    assessment
        .tiers
        .iter()
        .filter(|(_, tiers)| !tiers.is_empty())
        .map(|(domain, _)| domain)
        .collect()
}
