//! pia-structure
//!
//! Questionnaire definitions. Pure data, no AWS dependency.
//! Defines the sections, items, and questions an assessment is filled
//! against, the dotted reference paths that address them, and the built-in
//! default questionnaire.

pub mod default;
pub mod error;
pub mod reference;
pub mod structure;

pub use reference::Reference;
pub use structure::{EvaluationMode, Item, Question, QuestionType, Section, StructureCatalog};

/// The built-in questionnaire used by every assessment that does not carry
/// its own copy.
pub fn default_catalog() -> &'static StructureCatalog {
    default::catalog()
}
