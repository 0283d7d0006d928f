use serde::{Deserialize, Serialize};
use ts_rs::TS;

use pia_structure::Reference;

use super::answer::{Answer, AnswerData};
use super::assessment::Assessment;
use super::evaluation::Evaluation;
use super::measure::Measure;

/// An assessment together with every child record that belongs to it.
///
/// This is the unit of consistency: progress, preview and export read one
/// bundle, and restore replaces one bundle as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AssessmentRecords {
    pub assessment: Assessment,
    #[serde(default)]
    pub answers: Vec<Answer>,
    #[serde(default)]
    pub measures: Vec<Measure>,
    #[serde(default)]
    pub evaluations: Vec<Evaluation>,
    /// Highest measure id ever handed out, so removed ids are not reused.
    #[serde(default)]
    pub last_measure_id: u32,
    /// Storage version this bundle was loaded at. A save made with it
    /// fails if another writer has replaced the bundle since.
    #[serde(skip)]
    pub etag: Option<String>,
}

impl AssessmentRecords {
    pub fn new(assessment: Assessment) -> Self {
        Self {
            assessment,
            answers: Vec::new(),
            measures: Vec::new(),
            evaluations: Vec::new(),
            last_measure_id: 0,
            etag: None,
        }
    }

    pub fn pia_id(&self) -> u64 {
        self.assessment.id
    }

    pub fn answer(&self, question_id: u32) -> Option<&Answer> {
        self.answers.iter().find(|a| a.question_id == question_id)
    }

    /// Insert or replace the answer to `question_id`, keeping the original
    /// creation time.
    pub fn set_answer(&mut self, question_id: u32, data: AnswerData, now: jiff::Timestamp) -> &Answer {
        let pia_id = self.pia_id();
        let index = match self.answers.iter().position(|a| a.question_id == question_id) {
            Some(index) => {
                let answer = &mut self.answers[index];
                answer.data = data;
                answer.updated_at = now;
                index
            }
            None => {
                self.answers.push(Answer {
                    pia_id,
                    question_id,
                    data,
                    created_at: now,
                    updated_at: now,
                });
                self.answers.len() - 1
            }
        };
        &self.answers[index]
    }

    /// Measures attached to an item, in creation order.
    pub fn measures_for(&self, item: Reference) -> impl Iterator<Item = &Measure> {
        let item = item.item_ref();
        self.measures.iter().filter(move |m| m.item == item)
    }

    pub fn measure(&self, measure_id: u32) -> Option<&Measure> {
        self.measures.iter().find(|m| m.id == measure_id)
    }

    /// Append a measure under a fresh id. Returns `None` once the id space
    /// is exhausted.
    pub fn add_measure(
        &mut self,
        item: Reference,
        title: String,
        content: String,
        now: jiff::Timestamp,
    ) -> Option<&Measure> {
        let highest = self.measures.iter().map(|m| m.id).max().unwrap_or(0);
        let id = highest.max(self.last_measure_id).checked_add(1)?;
        self.last_measure_id = id;
        self.measures.push(Measure {
            id,
            pia_id: self.assessment.id,
            item: item.item_ref(),
            title,
            content,
            created_at: now,
            updated_at: now,
        });
        self.measures.last()
    }

    pub fn update_measure(
        &mut self,
        measure_id: u32,
        title: String,
        content: String,
        now: jiff::Timestamp,
    ) -> Option<&Measure> {
        let measure = self.measures.iter_mut().find(|m| m.id == measure_id)?;
        measure.title = title;
        measure.content = content;
        measure.updated_at = now;
        Some(measure)
    }

    /// Remove a measure and the evaluation recorded against it.
    pub fn remove_measure(&mut self, measure_id: u32) -> Option<Measure> {
        let index = self.measures.iter().position(|m| m.id == measure_id)?;
        let measure = self.measures.remove(index);
        let reference = measure.reference();
        self.evaluations.retain(|e| e.reference != reference);
        Some(measure)
    }

    /// Exact-match lookup: an item-level reference never returns a
    /// question-level evaluation, and vice versa.
    pub fn evaluation(&self, reference: &Reference) -> Option<&Evaluation> {
        self.evaluations.iter().find(|e| e.reference == *reference)
    }

    /// Insert or replace the evaluation at `evaluation.reference`, keeping
    /// the original creation time.
    pub fn set_evaluation(&mut self, mut evaluation: Evaluation) -> &Evaluation {
        evaluation.pia_id = self.pia_id();
        let index = match self
            .evaluations
            .iter()
            .position(|e| e.reference == evaluation.reference)
        {
            Some(index) => {
                evaluation.created_at = self.evaluations[index].created_at;
                self.evaluations[index] = evaluation;
                index
            }
            None => {
                self.evaluations.push(evaluation);
                self.evaluations.len() - 1
            }
        };
        &self.evaluations[index]
    }

    /// Re-key the bundle to another assessment id, children included.
    pub fn rebind(&mut self, pia_id: u64) {
        self.assessment.id = pia_id;
        for answer in &mut self.answers {
            answer.pia_id = pia_id;
        }
        for measure in &mut self.measures {
            measure.pia_id = pia_id;
        }
        for evaluation in &mut self.evaluations {
            evaluation.pia_id = pia_id;
        }
    }
}
