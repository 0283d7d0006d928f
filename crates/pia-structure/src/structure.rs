use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::StructureError;
use crate::reference::Reference;

/// Where an item's risk evaluation is recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum EvaluationMode {
    /// The item is not evaluated.
    #[default]
    None,
    /// One evaluation for the whole item, at `section.item`.
    Item,
    /// One evaluation per question (or per measure), at `section.item.leaf`.
    Question,
}

/// The kind of input a question expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum QuestionType {
    Text,
    /// A 1..=4 severity/likelihood gauge, usually with a justification text.
    Gauge,
    /// A multi-select list of option labels.
    List,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Question {
    pub id: u32,
    /// Translation key of the question title.
    pub title: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Item {
    pub id: u32,
    /// Translation key of the item title. Also used as the risk name of the
    /// item's evaluations.
    pub title: String,
    #[serde(default)]
    pub is_measure: bool,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub evaluation_mode: EvaluationMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Section {
    pub id: u32,
    pub title: String,
    pub items: Vec<Item>,
}

/// An ordered questionnaire. Read-only once loaded; an assessment may carry
/// its own copy to freeze the structure it was filled against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StructureCatalog {
    /// Version marker embedded in exports built against this structure.
    pub version: u32,
    pub sections: Vec<Section>,
}

/// What a [`Reference`] points at once resolved against a structure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target<'a> {
    Item,
    Question(&'a Question),
    /// Measure ids are assigned per assessment, so the structure can only
    /// confirm the item is a measure item.
    Measure(u32),
}

#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    pub section: &'a Section,
    pub item: &'a Item,
    pub target: Target<'a>,
}

impl StructureCatalog {
    /// Parse and validate a structure from JSON.
    pub fn from_json(json: &str) -> Result<Self, StructureError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Question ids key answers, so they must be unique across the whole
    /// structure, and measure items hold measures instead of questions.
    pub fn validate(&self) -> Result<(), StructureError> {
        let mut seen = HashSet::new();
        for section in &self.sections {
            for item in &section.items {
                if item.is_measure && !item.questions.is_empty() {
                    return Err(StructureError::MeasureWithQuestions {
                        section_id: section.id,
                        item_id: item.id,
                    });
                }
                for question in &item.questions {
                    if !seen.insert(question.id) {
                        return Err(StructureError::DuplicateQuestion {
                            question_id: question.id,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    pub fn section(&self, section_id: u32) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    pub fn item(&self, section_id: u32, item_id: u32) -> Option<&Item> {
        self.section(section_id)?
            .items
            .iter()
            .find(|i| i.id == item_id)
    }

    /// Resolve a reference path, failing with [`StructureError::Mismatch`]
    /// when any segment is absent.
    pub fn resolve(&self, reference: &Reference) -> Result<Resolved<'_>, StructureError> {
        let mismatch = || StructureError::Mismatch(reference.to_string());

        let section = self.section(reference.section_id).ok_or_else(mismatch)?;
        let item = section
            .items
            .iter()
            .find(|i| i.id == reference.item_id)
            .ok_or_else(mismatch)?;

        let target = match reference.leaf_id {
            None => Target::Item,
            Some(measure_id) if item.is_measure => Target::Measure(measure_id),
            Some(question_id) => Target::Question(
                item.questions
                    .iter()
                    .find(|q| q.id == question_id)
                    .ok_or_else(mismatch)?,
            ),
        };

        Ok(Resolved {
            section,
            item,
            target,
        })
    }

    /// Find the full path of a question by its id.
    pub fn locate_question(&self, question_id: u32) -> Option<Reference> {
        self.sections.iter().find_map(|section| {
            section.items.iter().find_map(|item| {
                item.questions
                    .iter()
                    .any(|q| q.id == question_id)
                    .then(|| Reference::leaf(section.id, item.id, question_id))
            })
        })
    }

    /// Iterate every item with its owning section, in structure order.
    pub fn items(&self) -> impl Iterator<Item = (&Section, &Item)> {
        self.sections
            .iter()
            .flat_map(|section| section.items.iter().map(move |item| (section, item)))
    }
}
