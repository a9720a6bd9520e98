use thiserror::Error;

use crate::retrieval::RetrievalError;

pub type MappingResult<T> = Result<T, MappingError>;

/// Failure of a whole mapping run.
///
/// Only the retrieval phase can fail a run; assessment degrades to the
/// embedding-score fallback and fusion is pure.
#[derive(Error, Debug)]
pub enum MappingError {
    #[error("retrieval phase failed")]
    Retrieval(#[from] RetrievalError),
}
