use thiserror::Error;

#[derive(Debug, Error)]
pub enum StructureError {
    #[error("invalid reference '{0}': expected section.item[.leaf]")]
    InvalidReference(String),

    #[error("reference {0} does not exist in the structure")]
    Mismatch(String),

    #[error("question {question_id} is declared more than once")]
    DuplicateQuestion { question_id: u32 },

    #[error("item {section_id}.{item_id} is a measure item and cannot declare questions")]
    MeasureWithQuestions { section_id: u32, item_id: u32 },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
