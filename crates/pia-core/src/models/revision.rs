use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// An immutable point-in-time snapshot of an assessment. Never mutated after
/// creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Revision {
    pub id: u64,
    pub pia_id: u64,
    /// Serialized export payload.
    pub export: String,
    pub created_at: jiff::Timestamp,
}
