use serde::{Deserialize, Serialize};
use ts_rs::TS;

use pia_structure::Reference;

/// A free-form mitigation entry attached to a measure item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Measure {
    /// Unique within its assessment; also the leaf id of the measure's
    /// evaluation reference.
    pub id: u32,
    pub pia_id: u64,
    /// Item-level reference of the owning measure item.
    #[ts(type = "string")]
    pub item: Reference,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

impl Measure {
    pub fn is_complete(&self) -> bool {
        !self.title.is_empty() && !self.content.is_empty()
    }

    /// Where this measure's own evaluation is stored.
    pub fn reference(&self) -> Reference {
        Reference::leaf(self.item.section_id, self.item.item_id, self.id)
    }
}
