use serde::{Deserialize, Serialize};
use ts_rs::TS;

use pia_core::models::records::AssessmentRecords;
use pia_structure::{EvaluationMode, Reference};

use crate::translate::Translator;

/// One evaluation that carries an action-plan comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ActionPlanEntry {
    #[ts(type = "string")]
    pub reference: Reference,
    pub risk_name: String,
    pub status: String,
    pub action_plan_comment: String,
}

/// Evaluations with a non-empty action-plan comment, in structure order.
pub fn build_action_plan(records: &AssessmentRecords, t: &dyn Translator) -> Vec<ActionPlanEntry> {
    let structure = records.assessment.structure();
    let mut plan = Vec::new();

    for (section, item) in structure.items() {
        let references: Vec<Reference> = match item.evaluation_mode {
            EvaluationMode::None => continue,
            EvaluationMode::Item => vec![Reference::item(section.id, item.id)],
            EvaluationMode::Question if item.is_measure => records
                .measures_for(Reference::item(section.id, item.id))
                .map(|m| m.reference())
                .collect(),
            EvaluationMode::Question => item
                .questions
                .iter()
                .map(|q| Reference::leaf(section.id, item.id, q.id))
                .collect(),
        };

        for reference in references {
            let Some(evaluation) = records.evaluation(&reference) else {
                continue;
            };
            if evaluation.action_plan_comment.is_empty() {
                continue;
            }
            plan.push(ActionPlanEntry {
                reference,
                risk_name: t.instant(&item.title),
                status: t.instant(&evaluation.status.label_key()),
                action_plan_comment: evaluation.action_plan_comment.clone(),
            });
        }
    }

    plan
}
