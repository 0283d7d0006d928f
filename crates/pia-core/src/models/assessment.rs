use serde::{Deserialize, Serialize};
use ts_rs::TS;

use pia_structure::{default_catalog, StructureCatalog};

/// Workflow status of an assessment. Declaration order is the natural sort
/// order used by the listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AssessmentStatus {
    #[default]
    Doing,
    Refused,
    SimpleValidation,
    SignedValidation,
    Archived,
}

impl AssessmentStatus {
    pub fn code(self) -> u8 {
        match self {
            Self::Doing => 0,
            Self::Refused => 1,
            Self::SimpleValidation => 2,
            Self::SignedValidation => 3,
            Self::Archived => 4,
        }
    }

    pub fn label_key(self) -> String {
        format!("pia.statuses.{}", self.code())
    }
}

/// Outcome of a DPO or data-subject consultation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum OpinionStatus {
    Unfavorable,
    Favorable,
}

impl OpinionStatus {
    pub fn label_key(self) -> &'static str {
        match self {
            Self::Unfavorable => "summary.content_choice.unfavorable",
            Self::Favorable => "summary.content_choice.favorable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Assessment {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub evaluator_name: String,
    #[serde(default)]
    pub validator_name: String,
    #[serde(default)]
    pub status: AssessmentStatus,
    #[serde(default)]
    pub is_archive: bool,

    // DPO opinion
    #[serde(default)]
    pub dpos_names: String,
    #[serde(default)]
    pub dpo_status: Option<OpinionStatus>,
    #[serde(default)]
    pub dpo_opinion: String,

    // Concerned people. `None` means the question was never answered, which
    // the summary treats differently from an explicit `false`.
    #[serde(default)]
    pub concerned_people_searched_opinion: Option<bool>,
    #[serde(default)]
    pub people_names: String,
    #[serde(default)]
    pub concerned_people_status: Option<OpinionStatus>,
    #[serde(default)]
    pub concerned_people_opinion: String,
    #[serde(default)]
    pub concerned_people_searched_content: String,

    #[serde(default)]
    pub applied_adjustments: String,
    #[serde(default)]
    pub rejection_reason: String,

    /// Frozen copy of the questionnaire. `None` means the assessment follows
    /// the built-in default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure_data: Option<StructureCatalog>,

    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

impl Assessment {
    /// A blank assessment. The id is assigned by the store on create.
    pub fn new(name: impl Into<String>, now: jiff::Timestamp) -> Self {
        Self {
            id: 0,
            name: name.into(),
            author_name: String::new(),
            evaluator_name: String::new(),
            validator_name: String::new(),
            status: AssessmentStatus::default(),
            is_archive: false,
            dpos_names: String::new(),
            dpo_status: None,
            dpo_opinion: String::new(),
            concerned_people_searched_opinion: None,
            people_names: String::new(),
            concerned_people_status: None,
            concerned_people_opinion: String::new(),
            concerned_people_searched_content: String::new(),
            applied_adjustments: String::new(),
            rejection_reason: String::new(),
            structure_data: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The structure this assessment is filled against: its own copy when it
    /// has one, else the built-in default.
    pub fn structure(&self) -> &StructureCatalog {
        self.structure_data.as_ref().unwrap_or_else(|| default_catalog())
    }
}
