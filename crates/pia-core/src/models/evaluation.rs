use serde::{Deserialize, Serialize};
use ts_rs::TS;

use pia_structure::Reference;

/// Risk evaluation outcome. Declaration order is display order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum EvaluationStatus {
    #[default]
    Pending,
    ToCorrect,
    Improvable,
    Acceptable,
}

impl EvaluationStatus {
    pub fn code(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::ToCorrect => 1,
            Self::Improvable => 2,
            Self::Acceptable => 3,
        }
    }

    pub fn label_key(self) -> String {
        format!("evaluations.statuses.{}", self.code())
    }
}

/// Residual risk position: x is seriousness, y is likelihood.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Gauges {
    #[serde(default)]
    pub seriousness: Option<u8>,
    #[serde(default)]
    pub likelihood: Option<u8>,
}

/// At most one evaluation per (assessment, reference).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Evaluation {
    pub pia_id: u64,
    #[ts(type = "string")]
    pub reference: Reference,
    #[serde(default)]
    pub status: EvaluationStatus,
    #[serde(default)]
    pub action_plan_comment: String,
    #[serde(default)]
    pub evaluation_comment: String,
    #[serde(default)]
    pub gauges: Gauges,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}
