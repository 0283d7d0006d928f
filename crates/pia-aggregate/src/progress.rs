//! Completion percentage of an assessment.
//!
//! The structure is the only source of expected work units; records that
//! point outside it are never counted.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use pia_core::models::records::AssessmentRecords;
use pia_structure::{EvaluationMode, Item, Reference, StructureCatalog};

/// Completed and expected work units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Progress {
    pub completed: u32,
    pub expected: u32,
}

impl Progress {
    fn add(&mut self, done: bool) {
        self.expected += 1;
        if done {
            self.completed += 1;
        }
    }

    /// `round(100 × completed / expected)`; zero when nothing is expected.
    pub fn percentage(&self) -> u8 {
        if self.expected == 0 {
            return 0;
        }
        (100.0 * f64::from(self.completed) / f64::from(self.expected)).round() as u8
    }
}

/// Count work units of `records` against `structure`.
///
/// Per item:
/// - a measure item expects one unit per complete measure (title and
///   content), and at least one; drafts are neither expected nor counted;
/// - a question item expects one unit per question, completed by a
///   non-empty answer;
/// - `item` evaluation mode adds one unit for the item-level evaluation;
/// - `question` evaluation mode adds one unit per question (or per complete
///   measure) for its leaf-level evaluation.
pub fn count(structure: &StructureCatalog, records: &AssessmentRecords) -> Progress {
    let mut progress = Progress::default();

    for (section, item) in structure.items() {
        let item_ref = Reference::item(section.id, item.id);
        if item.is_measure {
            count_measure_item(&mut progress, item, item_ref, records);
        } else {
            for question in &item.questions {
                let answered = records
                    .answer(question.id)
                    .is_some_and(|a| a.data.is_complete());
                progress.add(answered);

                if item.evaluation_mode == EvaluationMode::Question {
                    let leaf = Reference::leaf(section.id, item.id, question.id);
                    progress.add(records.evaluation(&leaf).is_some());
                }
            }
        }

        if item.evaluation_mode == EvaluationMode::Item {
            progress.add(records.evaluation(&item_ref).is_some());
        }
    }

    progress
}

fn count_measure_item(
    progress: &mut Progress,
    item: &Item,
    item_ref: Reference,
    records: &AssessmentRecords,
) {
    let mut complete = 0;
    for measure in records.measures_for(item_ref).filter(|m| m.is_complete()) {
        complete += 1;
        progress.add(true);
        if item.evaluation_mode == EvaluationMode::Question {
            progress.add(records.evaluation(&measure.reference()).is_some());
        }
    }
    if complete == 0 {
        progress.add(false);
    }
}

/// Completion percentage (0..=100) against an explicit structure.
pub fn calculate(structure: &StructureCatalog, records: &AssessmentRecords) -> u8 {
    count(structure, records).percentage()
}

/// Completion percentage against the assessment's effective structure.
pub fn calculate_progress(records: &AssessmentRecords) -> u8 {
    calculate(records.assessment.structure(), records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_rounds_half_up() {
        let p = Progress {
            completed: 1,
            expected: 8,
        };
        assert_eq!(p.percentage(), 13);
        let p = Progress {
            completed: 2,
            expected: 3,
        };
        assert_eq!(p.percentage(), 67);
    }

    #[test]
    fn nothing_expected_is_zero_percent() {
        assert_eq!(Progress::default().percentage(), 0);
    }
}
