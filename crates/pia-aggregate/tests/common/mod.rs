#![allow(dead_code)]

use pia_core::models::answer::AnswerData;
use pia_core::models::assessment::Assessment;
use pia_core::models::evaluation::{Evaluation, EvaluationStatus, Gauges};
use pia_core::models::records::AssessmentRecords;
use pia_structure::{Reference, StructureCatalog};

/// Two sections: 1.1 (questions 1, 2; item evaluation), 1.2 (question 3;
/// question evaluation), and 2.1 (measures; question evaluation).
pub const STRUCTURE: &str = r#"{
    "version": 3,
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

pub fn ts(secs: i64) -> jiff::Timestamp {
    jiff::Timestamp::from_second(secs).unwrap()
}

pub fn structure() -> StructureCatalog {
    StructureCatalog::from_json(STRUCTURE).unwrap()
}

pub fn empty_records() -> AssessmentRecords {
    let mut assessment = Assessment::new("fixture", ts(0));
    assessment.id = 1;
    assessment.structure_data = Some(structure());
    AssessmentRecords::new(assessment)
}

pub fn text(value: &str) -> AnswerData {
    AnswerData {
        text: Some(value.to_string()),
        ..Default::default()
    }
}

pub fn evaluation(reference: Reference) -> Evaluation {
    Evaluation {
        pia_id: 1,
        reference,
        status: EvaluationStatus::Acceptable,
        action_plan_comment: String::new(),
        evaluation_comment: String::new(),
        gauges: Gauges::default(),
        created_at: ts(1),
        updated_at: ts(1),
    }
}

/// Every unit of [`STRUCTURE`] filled in.
pub fn complete_records() -> AssessmentRecords {
    let mut records = empty_records();
    records.set_answer(1, text("purpose"), ts(1));
    records.set_answer(
        2,
        AnswerData {
            gauge: Some(2),
            ..Default::default()
        },
        ts(1),
    );
    records.set_answer(
        3,
        AnswerData {
            list: Some(vec!["a".into()]),
            ..Default::default()
        },
        ts(1),
    );
    records.set_evaluation(evaluation(Reference::item(1, 1)));
    records.set_evaluation(evaluation(Reference::leaf(1, 2, 3)));
    let measure_id = records
        .add_measure(Reference::item(2, 1), "Encryption".into(), "AES at rest".into(), ts(1))
        .unwrap()
        .id;
    records.set_evaluation(evaluation(Reference::leaf(2, 1, measure_id)));
    records
}
