#![allow(dead_code)]

use std::sync::Arc;

use pia_aggregate::translate::KeyTranslator;
use pia_core::models::answer::AnswerData;
use pia_core::models::assessment::Assessment;
use pia_service::AssessmentManager;
use pia_storage::memory::MemoryStore;
use pia_structure::StructureCatalog;

/// 1.1 holds questions 1 and 2 evaluated as an item, 1.2 holds question 3
/// evaluated per question, 2.1 holds measures evaluated per measure.
pub const STRUCTURE: &str = r#"{
    "version": 2,
    "sections": [
        { "id": 1, "title": "sections.1.title", "items": [
            { "id": 1, "title": "sections.1.items.1.title", "evaluation_mode": "item", "questions": [
                { "id": 1, "title": "q1", "type": "text" },
                { "id": 2, "title": "q2", "type": "gauge" }
            ] },
            { "id": 2, "title": "sections.1.items.2.title", "evaluation_mode": "question", "questions": [
                { "id": 3, "title": "q3", "type": "list" }
            ] }
        ] },
        { "id": 2, "title": "sections.2.title", "items": [
            { "id": 1, "title": "sections.2.items.1.title", "is_measure": true, "evaluation_mode": "question" }
        ] }
    ]
}"#;

pub fn manager() -> Arc<AssessmentManager<MemoryStore>> {
    Arc::new(AssessmentManager::new(
        Arc::new(MemoryStore::new()),
        Arc::new(KeyTranslator),
    ))
}

pub fn ts(secs: i64) -> jiff::Timestamp {
    jiff::Timestamp::from_second(secs).unwrap()
}

pub fn structure() -> StructureCatalog {
    StructureCatalog::from_json(STRUCTURE).unwrap()
}

pub fn draft(name: &str) -> Assessment {
    let mut assessment = Assessment::new(name, ts(100));
    assessment.structure_data = Some(structure());
    assessment
}

pub fn text(value: &str) -> AnswerData {
    AnswerData {
        text: Some(value.to_string()),
        ..Default::default()
    }
}
