use std::fmt;

use thiserror::Error;

use crate::classify::ClassifyError;
use crate::model::Domain;

pub type AssessmentResult<T> = Result<T, AssessmentError>;

/// A single classification attempt failing.
///
/// Every variant is retryable; after the last attempt the caller derives
/// tiers from embedding scores instead of surfacing these.
#[derive(Error, Debug)]
pub enum AssessmentError {
    /// The classifier transport or provider failed.
    #[error("classifier call failed")]
    Provider(#[from] ClassifyError),

    /// The response text does not parse as the expected JSON shape.
    #[error("malformed classifier response: {reason}")]
    Malformed { reason: String },

    /// The response parses but does not cover the sent candidate set.
    #[error("incomplete classifier response: {0}")]
    Incomplete(ValidationFailure),
}

/// Mismatch between the candidate set sent to the classifier and the
/// paths it returned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationFailure {
    /// Sent candidates absent from the response.
    pub missing: Vec<(Domain, String)>,
    /// Returned paths that were never sent.
    pub unexpected: Vec<(Domain, String)>,
    /// Returned paths appearing more than once within a domain.
    pub duplicated: Vec<(Domain, String)>,
}

impl ValidationFailure {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.unexpected.is_empty() && self.duplicated.is_empty()
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} missing, {} unexpected, {} duplicated",
            self.missing.len(),
            self.unexpected.len(),
            self.duplicated.len()
        )?;
        if let Some((domain, path)) = self.missing.first() {
            write!(f, "; first missing: {path} ({domain})")?;
        }
        if let Some((domain, path)) = self.unexpected.first() {
            write!(f, "; first unexpected: {path} ({domain})")?;
        }
        Ok(())
    }
}
