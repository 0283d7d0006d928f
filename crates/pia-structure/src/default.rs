use std::sync::LazyLock;

use crate::structure::{EvaluationMode, Item, Question, QuestionType, Section, StructureCatalog};

/// Bump when the built-in questionnaire changes shape.
pub const DEFAULT_VERSION: u32 = 1;

/// The standard four-part assessment: context, fundamental principles,
/// risks, validation.
pub fn catalog() -> &'static StructureCatalog {
    static CATALOG: LazyLock<StructureCatalog> = LazyLock::new(|| StructureCatalog {
        version: DEFAULT_VERSION,
        sections: vec![
            section(
                1,
                vec![
                    item(1, 1, EvaluationMode::Item, &[(1, text()), (2, text()), (3, text())]),
                    item(1, 2, EvaluationMode::Item, &[(4, text()), (5, text()), (6, text())]),
                ],
            ),
            section(
                2,
                vec![
                    item(
                        2,
                        1,
                        EvaluationMode::Question,
                        &[(7, text()), (8, text()), (9, text()), (10, text()), (11, text())],
                    ),
                    item(
                        2,
                        2,
                        EvaluationMode::Question,
                        &[
                            (12, text()),
                            (13, text()),
                            (14, text()),
                            (15, text()),
                            (16, text()),
                            (17, text()),
                            (18, text()),
                        ],
                    ),
                ],
            ),
            section(
                3,
                vec![
                    measure_item(3, 1),
                    risk_item(3, 2, 19),
                    risk_item(3, 3, 25),
                    risk_item(3, 4, 31),
                    item(3, 5, EvaluationMode::None, &[]),
                ],
            ),
            section(
                4,
                vec![
                    item(4, 1, EvaluationMode::None, &[]),
                    item(4, 2, EvaluationMode::None, &[]),
                    item(4, 3, EvaluationMode::None, &[]),
                    item(4, 4, EvaluationMode::None, &[]),
                ],
            ),
        ],
    });
    &CATALOG
}

fn text() -> QuestionType {
    QuestionType::Text
}

fn section(id: u32, items: Vec<Item>) -> Section {
    Section {
        id,
        title: format!("sections.{id}.title"),
        items,
    }
}

fn item(section_id: u32, id: u32, mode: EvaluationMode, questions: &[(u32, QuestionType)]) -> Item {
    Item {
        id,
        title: format!("sections.{section_id}.items.{id}.title"),
        is_measure: false,
        questions: questions
            .iter()
            .map(|(qid, kind)| question(section_id, id, *qid, *kind))
            .collect(),
        evaluation_mode: mode,
    }
}

fn measure_item(section_id: u32, id: u32) -> Item {
    Item {
        id,
        title: format!("sections.{section_id}.items.{id}.title"),
        is_measure: true,
        questions: Vec::new(),
        evaluation_mode: EvaluationMode::Question,
    }
}

/// Risk items share one shape: impacts, threats, sources, controls, then
/// the seriousness and likelihood gauges.
fn risk_item(section_id: u32, id: u32, first_question: u32) -> Item {
    let kinds = [
        QuestionType::List,
        QuestionType::List,
        QuestionType::List,
        QuestionType::List,
        QuestionType::Gauge,
        QuestionType::Gauge,
    ];
    let questions: Vec<_> = (first_question..).zip(kinds).collect();
    item(section_id, id, EvaluationMode::Item, &questions)
}

fn question(section_id: u32, item_id: u32, id: u32, kind: QuestionType) -> Question {
    Question {
        id,
        title: format!("sections.{section_id}.items.{item_id}.questions.{id}.title"),
        kind,
    }
}
