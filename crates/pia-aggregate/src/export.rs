use serde::{Deserialize, Serialize};
use ts_rs::TS;

use pia_core::models::answer::Answer;
use pia_core::models::assessment::Assessment;
use pia_core::models::evaluation::Evaluation;
use pia_core::models::measure::Measure;
use pia_core::models::records::AssessmentRecords;

use crate::action_plan::ActionPlanEntry;
use crate::error::ExportError;
use crate::preview::{build_preview, PreviewSection};
use crate::summary::SummaryBlock;
use crate::translate::Translator;

/// Bump when the payload shape changes. Older payloads must stay readable.
pub const EXPORT_FORMAT_VERSION: u32 = 1;

/// A self-contained snapshot of an assessment: the raw records needed to
/// restore it plus the rendered tree. This is what a revision stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExportPayload {
    pub format_version: u32,
    /// Version of the structure the tree was built against.
    pub structure_version: u32,
    /// Completion percentage at export time.
    pub progress: u8,
    pub pia: Assessment,
    pub answers: Vec<Answer>,
    pub measures: Vec<Measure>,
    pub evaluations: Vec<Evaluation>,
    pub summary: SummaryBlock,
    pub sections: Vec<PreviewSection>,
    #[serde(default)]
    pub action_plan: Vec<ActionPlanEntry>,
    /// Measure id high-water mark of the exported bundle.
    #[serde(default)]
    pub last_measure_id: u32,
}

pub fn build_export(records: &AssessmentRecords, t: &dyn Translator) -> ExportPayload {
    let preview = build_preview(records, t);
    ExportPayload {
        format_version: EXPORT_FORMAT_VERSION,
        structure_version: records.assessment.structure().version,
        progress: preview.progress,
        pia: records.assessment.clone(),
        answers: records.answers.clone(),
        measures: records.measures.clone(),
        evaluations: records.evaluations.clone(),
        summary: preview.summary,
        sections: preview.sections,
        action_plan: preview.action_plan,
        last_measure_id: records.last_measure_id,
    }
}

impl ExportPayload {
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a stored payload, rejecting formats newer than this build.
    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        let payload: Self = serde_json::from_str(json)?;
        if payload.format_version > EXPORT_FORMAT_VERSION {
            return Err(ExportError::UnsupportedFormat {
                found: payload.format_version,
                supported: EXPORT_FORMAT_VERSION,
            });
        }
        Ok(payload)
    }

    /// The raw records, ready to be written back as a live bundle.
    pub fn into_records(self) -> AssessmentRecords {
        let highest = self.measures.iter().map(|m| m.id).max().unwrap_or(0);
        AssessmentRecords {
            assessment: self.pia,
            answers: self.answers,
            measures: self.measures,
            evaluations: self.evaluations,
            last_measure_id: self.last_measure_id.max(highest),
            etag: None,
        }
    }
}
