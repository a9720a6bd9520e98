//! Core data model shared by every pipeline phase.
//!
//! These types are deliberately plain: immutable inputs coming from the
//! upstream analyzers, and the scored outputs handed to downstream
//! evaluators. All wire-facing enums pin their serialized form via serde
//! renames so the classifier contract stays stable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One of the three requirement groupings processed independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    BestPractices,
    Functional,
    NonFunctional,
}

impl Domain {
    /// All domains, in their fixed processing order.
    pub const ALL: [Domain; 3] = [
        Domain::BestPractices,
        Domain::Functional,
        Domain::NonFunctional,
    ];

    /// Stable snake_case name used in logs and wire payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::BestPractices => "best_practices",
            Domain::Functional => "functional",
            Domain::NonFunctional => "non_functional",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed three-slot container keyed by [`Domain`].
///
/// Cheaper and more explicit than a `HashMap<Domain, T>`: every domain always
/// has a value, and iteration order is the fixed [`Domain::ALL`] order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainMap<T> {
    pub best_practices: T,
    pub functional: T,
    pub non_functional: T,
}

impl<T> DomainMap<T> {
    /// Builds a map by invoking `f` once per domain.
    pub fn from_fn(mut f: impl FnMut(Domain) -> T) -> Self {
        Self {
            best_practices: f(Domain::BestPractices),
            functional: f(Domain::Functional),
            non_functional: f(Domain::NonFunctional),
        }
    }

    pub fn get(&self, domain: Domain) -> &T {
        match domain {
            Domain::BestPractices => &self.best_practices,
            Domain::Functional => &self.functional,
            Domain::NonFunctional => &self.non_functional,
        }
    }

    pub fn get_mut(&mut self, domain: Domain) -> &mut T {
        match domain {
            Domain::BestPractices => &mut self.best_practices,
            Domain::Functional => &mut self.functional,
            Domain::NonFunctional => &mut self.non_functional,
        }
    }

    /// Iterates `(domain, value)` pairs in [`Domain::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Domain, &T)> {
        Domain::ALL.into_iter().map(move |d| (d, self.get(d)))
    }

    /// Builds a new map by transforming each slot.
    pub fn map<U>(&self, mut f: impl FnMut(Domain, &T) -> U) -> DomainMap<U> {
        DomainMap {
            best_practices: f(Domain::BestPractices, &self.best_practices),
            functional: f(Domain::Functional, &self.functional),
            non_functional: f(Domain::NonFunctional, &self.non_functional),
        }
    }
}

/// Per-domain requirement categories as produced by the upstream normalizer.
pub type NormalizedRequirements = DomainMap<Vec<RequirementCategory>>;

/// A named group of requirement statements within one domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementCategory {
    pub title: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
}

/// Coarse file classification carried by the static analyzer's summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Source,
    Test,
    Config,
    Infra,
    Schema,
}

impl FileKind {
    /// Lowercase label matching the wire form.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Source => "source",
            FileKind::Test => "test",
            FileKind::Config => "config",
            FileKind::Infra => "infra",
            FileKind::Schema => "schema",
        }
    }
}

/// Compact structural digest of one file, fed to the classifier as context.
///
/// The embedding phase never reads summaries; it works on raw content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSummary {
    pub path: String,
    pub size: usize,
    pub kind: FileKind,
    /// First lines of the file.
    pub head: String,
    #[serde(default)]
    pub imports: Vec<String>,
    /// Representative slice of the file body.
    #[serde(default)]
    pub body_sample: String,
}

/// A file that survived embedding retrieval for one domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileCandidate {
    pub path: String,
    /// Maximum cosine similarity across the domain's categories.
    pub embedding_score: f32,
}

/// Four-level relevance label assigned by the classifier.
///
/// The weight mapping is fixed and non-configurable; fusion multiplies it
/// into the embedding score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RelevanceTier {
    Primary,
    Secondary,
    Supporting,
    Irrelevant,
}

impl RelevanceTier {
    /// Fixed fusion weight for this tier.
    pub fn weight(&self) -> f32 {
        match self {
            RelevanceTier::Primary => 1.0,
            RelevanceTier::Secondary => 0.75,
            RelevanceTier::Supporting => 0.5,
            RelevanceTier::Irrelevant => 0.0,
        }
    }

    /// Wire form of the tier name.
    pub fn as_str(&self) -> &'static str {
        match self {
            RelevanceTier::Primary => "PRIMARY",
            RelevanceTier::Secondary => "SECONDARY",
            RelevanceTier::Supporting => "SUPPORTING",
            RelevanceTier::Irrelevant => "IRRELEVANT",
        }
    }
}

impl std::fmt::Display for RelevanceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a tier assignment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentSource {
    /// Genuine language-model assessment.
    Model,
    /// Deterministic embedding-score fallback after exhausted retries.
    Heuristic,
}

/// Final fused relevance record for one file within one domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridScoredFile {
    pub path: String,
    pub embedding_score: f32,
    pub tier: RelevanceTier,
    pub source: AssessmentSource,
    /// `embedding_score * tier.weight()`.
    pub hybrid_score: f32,
    /// Whether the file cleared the hybrid-score threshold.
    pub included: bool,
}

/// Run-level bookkeeping attached to every mapping result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingMetadata {
    pub run_id: Uuid,
    /// Candidates produced by retrieval, counted per (domain, file) pair.
    pub phase1_total_candidates: usize,
    /// Files actually sent to (or fallback-covered by) the assessment phase.
    pub phase2_assessed_files: usize,
    /// Files flagged `included` across all domains.
    pub final_included_files: usize,
    /// Domains whose tiers came from the heuristic fallback.
    pub degraded_domains: Vec<Domain>,
    pub phase1_ms: u64,
    pub phase2_ms: u64,
    pub phase3_ms: u64,
    pub processing_time_ms: u64,
    pub completed_at: DateTime<Utc>,
}

/// Complete outcome of one mapping run: per-domain scored lists plus
/// metadata. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevanceMappingResult {
    pub files: DomainMap<Vec<HybridScoredFile>>,
    pub metadata: MappingMetadata,
}

impl RelevanceMappingResult {
    /// Full scored list for a domain, sorted descending by hybrid score.
    pub fn for_domain(&self, domain: Domain) -> &[HybridScoredFile] {
        self.files.get(domain)
    }

    /// Only the entries that cleared the hybrid-score threshold.
    pub fn included_files(&self, domain: Domain) -> impl Iterator<Item = &HybridScoredFile> {
        self.files.get(domain).iter().filter(|f| f.included)
    }

    /// Included-entry count across all domains.
    pub fn total_included(&self) -> usize {
        Domain::ALL
            .iter()
            .map(|&d| self.included_files(d).count())
            .sum()
    }
}

#[cfg(test)]
mod tests;
