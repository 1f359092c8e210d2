use crate::core::io::ts::TsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no resources matched '{pattern}'")]
    ResourceNotFound { pattern: String },

    #[error("identifier '{identifier}' is ambiguous, matched handles: {candidates:?}")]
    AmbiguousHandle {
        identifier: String,
        candidates: Vec<String>,
    },

    #[error("no registered handle matched '{identifier}' (available: {available:?})")]
    HandleNotFound {
        identifier: String,
        available: Vec<String>,
    },

    #[error(transparent)]
    Parse(#[from] TsError),
}
