use thiserror::Error;

use crate::scope::Scope;

pub type Result<T> = std::result::Result<T, AllocError>;

#[derive(Debug, Error)]
pub enum AllocError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Deserialization error: {0}")]
    DeserializationError(String),
    #[error("An allocation run is already in progress for {0}")]
    ScopeBusy(Scope),
    #[error("Error: {0}")]
    GenericError(String),
}

/// Only the writing side converts implicitly; reads map to
/// `DeserializationError` at the call site.
impl From<bincode::Error> for AllocError {
    fn from(e: bincode::Error) -> Self {
        Self::SerializationError(e.to_string())
    }
}

impl From<serde_json::Error> for AllocError {
    fn from(e: serde_json::Error) -> Self {
        Self::DeserializationError(e.to_string())
    }
}

impl From<String> for AllocError {
    fn from(e: String) -> Self {
        Self::GenericError(e)
    }
}

/// Failure to persist a single allocation. Never aborts a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("student {student_id} is already allocated in {scope}")]
    AlreadyAllocated { student_id: String, scope: Scope },
    #[error("supervisor {supervisor_id} has no remaining capacity in {scope}")]
    CapacityExceeded { supervisor_id: String, scope: Scope },
    #[error("unknown supervisor {0}")]
    UnknownSupervisor(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
