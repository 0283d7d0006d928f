use serde::{Deserialize, Serialize};
use ts_rs::TS;

use pia_core::models::assessment::Assessment;

use crate::translate::Translator;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SummaryEntry {
    pub title: String,
    pub content: String,
}

/// The opinion fields of an assessment. An entry that is absent means the
/// condition for showing it did not hold, which is not the same as an entry
/// with empty content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SummaryBlock {
    pub title: String,
    pub entries: Vec<SummaryEntry>,
}

fn searched_opinion_key(searched: bool) -> &'static str {
    if searched {
        "summary.content_choice.searched_opinion"
    } else {
        "summary.content_choice.unsearched_opinion"
    }
}

pub fn build_summary(assessment: &Assessment, t: &dyn Translator) -> SummaryBlock {
    let mut entries = Vec::new();
    let mut push = |title: &str, content: String| {
        entries.push(SummaryEntry {
            title: t.instant(title),
            content,
        });
    };

    if !assessment.dpos_names.is_empty() {
        push("summary.dpo_name", assessment.dpos_names.clone());
    }
    if let Some(status) = assessment.dpo_status {
        push("summary.dpo_status", t.instant(status.label_key()));
    }
    if !assessment.dpo_opinion.is_empty() {
        push("summary.dpo_opinion", assessment.dpo_opinion.clone());
    }

    match assessment.concerned_people_searched_opinion {
        Some(true) => {
            push(
                "summary.concerned_people_searched_opinion",
                t.instant(searched_opinion_key(true)),
            );
            if !assessment.people_names.is_empty() {
                push("summary.concerned_people_name", assessment.people_names.clone());
            }
            if let Some(status) = assessment.concerned_people_status {
                push("summary.concerned_people_status", t.instant(status.label_key()));
            }
            if !assessment.concerned_people_opinion.is_empty() {
                push(
                    "summary.concerned_people_opinion",
                    assessment.concerned_people_opinion.clone(),
                );
            }
        }
        Some(false) => {
            push(
                "summary.concerned_people_searched_opinion",
                t.instant(searched_opinion_key(false)),
            );
            if !assessment.concerned_people_searched_content.is_empty() {
                push(
                    "summary.concerned_people_unsearched_opinion_comment",
                    assessment.concerned_people_searched_content.clone(),
                );
            }
        }
        None => {}
    }

    if !assessment.applied_adjustments.is_empty() {
        push("summary.modification_made", assessment.applied_adjustments.clone());
    }
    if !assessment.rejection_reason.is_empty() {
        push("summary.rejection_reason", assessment.rejection_reason.clone());
    }

    SummaryBlock {
        title: t.instant("summary.title"),
        entries,
    }
}
