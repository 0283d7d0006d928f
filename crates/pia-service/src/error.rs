use std::fmt;

use thiserror::Error;

use pia_storage::error::StorageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Assessment,
    Revision,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assessment => f.write_str("assessment"),
            Self::Revision => f.write_str("revision"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{kind} {id} not found")]
    NotFound { kind: RecordKind, id: u64 },

    #[error("measure {measure_id} not found in assessment {pia_id}")]
    MeasureNotFound { pia_id: u64, measure_id: u32 },

    /// A write targeted a path that the assessment's structure does not
    /// contain, or at the wrong level for the item's evaluation mode.
    #[error("reference {reference} is not writable in assessment {pia_id}: {reason}")]
    UnknownReference {
        pia_id: u64,
        reference: String,
        reason: String,
    },

    #[error("assessment {pia_id} has no measure ids left")]
    MeasureIdsExhausted { pia_id: u64 },

    /// Another writer replaced the record after it was read.
    #[error("{kind} {id} was modified concurrently")]
    Conflict { kind: RecordKind, id: u64 },

    #[error("revision {revision_id} has a corrupt payload: {reason}")]
    CorruptPayload { revision_id: u64, reason: String },

    #[error("invalid export payload: {0}")]
    InvalidExport(String),

    /// The persistence layer failed. Not retried here.
    #[error("storage failure: {0}")]
    TransientIo(String),
}

impl ServiceError {
    /// Map a storage error for a lookup of `kind` `id`, keeping a missing
    /// object distinct from an I/O failure.
    pub fn from_storage(kind: RecordKind, id: u64) -> impl FnOnce(StorageError) -> Self {
        move |e| match e {
            StorageError::NotFound { .. } => Self::NotFound { kind, id },
            StorageError::PreconditionFailed { .. } => Self::Conflict { kind, id },
            other => Self::TransientIo(other.to_string()),
        }
    }
}
