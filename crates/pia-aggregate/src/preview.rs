//! Denormalized, read-only view of an assessment.
//!
//! The tree always mirrors the structure: every section, item and question
//! appears exactly once, in structure order, whether or not it holds data.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use pia_core::models::answer::AnswerData;
use pia_core::models::evaluation::Evaluation;
use pia_core::models::records::AssessmentRecords;
use pia_structure::{EvaluationMode, Item, Reference, Section, StructureCatalog};

use crate::action_plan::{build_action_plan, ActionPlanEntry};
use crate::progress;
use crate::summary::{build_summary, SummaryBlock};
use crate::translate::Translator;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EvaluationSummary {
    /// Translated status label.
    pub title: String,
    pub risk_name: String,
    pub action_plan_comment: String,
    pub evaluation_comment: String,
    pub seriousness: Option<u8>,
    pub likelihood: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PreviewQuestion {
    pub id: u32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<EvaluationSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PreviewMeasure {
    pub id: u32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<EvaluationSummary>,
}

/// A question item carries `questions`, a measure item carries `measures`;
/// never both. `evaluation` is only set for items in `item` evaluation mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PreviewItem {
    pub id: u32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<EvaluationSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<PreviewQuestion>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measures: Option<Vec<PreviewMeasure>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PreviewSection {
    pub id: u32,
    pub title: String,
    pub items: Vec<PreviewItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PreviewTree {
    pub pia_id: u64,
    pub progress: u8,
    pub summary: SummaryBlock,
    pub sections: Vec<PreviewSection>,
    pub action_plan: Vec<ActionPlanEntry>,
}

/// Build the preview of one bundle against its effective structure.
///
/// Every lookup is resolved before the tree is returned; a record whose
/// reference is not in the structure is skipped, never reported.
pub fn build_preview(records: &AssessmentRecords, t: &dyn Translator) -> PreviewTree {
    let structure = records.assessment.structure();
    log_stale_records(structure, records);

    PreviewTree {
        pia_id: records.pia_id(),
        progress: progress::calculate(structure, records),
        summary: build_summary(&records.assessment, t),
        sections: build_sections(structure, records, t),
        action_plan: build_action_plan(records, t),
    }
}

pub fn build_sections(
    structure: &StructureCatalog,
    records: &AssessmentRecords,
    t: &dyn Translator,
) -> Vec<PreviewSection> {
    structure
        .sections
        .iter()
        .map(|section| PreviewSection {
            id: section.id,
            title: t.instant(&section.title),
            items: section
                .items
                .iter()
                .map(|item| build_item(section, item, records, t))
                .collect(),
        })
        .collect()
}

fn build_item(
    section: &Section,
    item: &Item,
    records: &AssessmentRecords,
    t: &dyn Translator,
) -> PreviewItem {
    let item_ref = Reference::item(section.id, item.id);
    let leaf_mode = item.evaluation_mode == EvaluationMode::Question;
    let leaf_evaluation = |reference: Reference| {
        leaf_mode
            .then(|| records.evaluation(&reference))
            .flatten()
            .map(|e| summarize_evaluation(e, item, t))
    };

    let evaluation = (item.evaluation_mode == EvaluationMode::Item)
        .then(|| records.evaluation(&item_ref))
        .flatten()
        .map(|e| summarize_evaluation(e, item, t));

    let (questions, measures) = if item.is_measure {
        let measures = records
            .measures_for(item_ref)
            .filter(|m| m.is_complete())
            .map(|m| PreviewMeasure {
                id: m.id,
                title: m.title.clone(),
                content: Some(m.content.clone()),
                evaluation: leaf_evaluation(m.reference()),
            })
            .collect();
        (None, Some(measures))
    } else {
        let questions = item
            .questions
            .iter()
            .map(|q| {
                let content = records.answer(q.id).and_then(|a| render_answer(&a.data, t));
                // An unanswered question shows no evaluation.
                let evaluation = content
                    .as_ref()
                    .and_then(|_| leaf_evaluation(Reference::leaf(section.id, item.id, q.id)));
                PreviewQuestion {
                    id: q.id,
                    title: t.instant(&q.title),
                    content,
                    evaluation,
                }
            })
            .collect();
        (Some(questions), None)
    };

    PreviewItem {
        id: item.id,
        title: t.instant(&item.title),
        evaluation,
        questions,
        measures,
    }
}

/// Gauge label, then free text, then the joined list, comma-separated,
/// skipping empty parts. `None` when nothing is left.
pub fn render_answer(data: &AnswerData, t: &dyn Translator) -> Option<String> {
    let mut parts = Vec::with_capacity(3);
    if let Some(gauge) = data.gauge() {
        parts.push(t.instant(&format!("summary.gauges.{gauge}")));
    }
    if let Some(text) = data.text() {
        parts.push(text.to_string());
    }
    if let Some(list) = data.list() {
        parts.push(list.join(", "));
    }
    (!parts.is_empty()).then(|| parts.join(", "))
}

fn summarize_evaluation(evaluation: &Evaluation, item: &Item, t: &dyn Translator) -> EvaluationSummary {
    EvaluationSummary {
        title: t.instant(&evaluation.status.label_key()),
        risk_name: t.instant(&item.title),
        action_plan_comment: evaluation.action_plan_comment.clone(),
        evaluation_comment: evaluation.evaluation_comment.clone(),
        seriousness: evaluation.gauges.seriousness,
        likelihood: evaluation.gauges.likelihood,
    }
}

fn log_stale_records(structure: &StructureCatalog, records: &AssessmentRecords) {
    let pia_id = records.pia_id();
    for answer in &records.answers {
        if structure.locate_question(answer.question_id).is_none() {
            tracing::debug!(pia_id, question_id = answer.question_id, "answer outside structure skipped");
        }
    }
    for measure in &records.measures {
        if !structure
            .item(measure.item.section_id, measure.item.item_id)
            .is_some_and(|i| i.is_measure)
        {
            tracing::debug!(pia_id, reference = %measure.item, "measure outside structure skipped");
        }
    }
    for evaluation in &records.evaluations {
        if let Err(e) = structure.resolve(&evaluation.reference) {
            tracing::debug!(pia_id, error = %e, "evaluation outside structure skipped");
        }
    }
}
