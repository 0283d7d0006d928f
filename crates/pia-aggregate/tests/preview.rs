mod common;

use common::*;
use pia_aggregate::preview::{build_preview, render_answer, PreviewTree};
use pia_aggregate::translate::{JsonTranslator, KeyTranslator};
use pia_core::models::answer::AnswerData;
use pia_core::models::assessment::OpinionStatus;
use pia_structure::Reference;

fn shape(tree: &PreviewTree) -> Vec<(u32, Vec<(u32, Option<Vec<u32>>, bool)>)> {
    tree.sections
        .iter()
        .map(|s| {
            (
                s.id,
                s.items
                    .iter()
                    .map(|i| {
                        (
                            i.id,
                            i.questions
                                .as_ref()
                                .map(|qs| qs.iter().map(|q| q.id).collect()),
                            i.measures.is_some(),
                        )
                    })
                    .collect(),
            )
        })
        .collect()
}

#[test]
fn tree_shape_mirrors_structure_regardless_of_data() {
    let empty = build_preview(&empty_records(), &KeyTranslator);
    let full = build_preview(&complete_records(), &KeyTranslator);

    let expected = vec![
        (1, vec![(1, Some(vec![1, 2]), false), (2, Some(vec![3]), false)]),
        (2, vec![(1, None, true)]),
    ];
    assert_eq!(shape(&empty), expected);
    assert_eq!(shape(&full), expected);
}

#[test]
fn missing_answers_are_empty_leaves() {
    let tree = build_preview(&empty_records(), &KeyTranslator);
    let question = &tree.sections[0].items[0].questions.as_ref().unwrap()[0];
    assert_eq!(question.content, None);
    assert_eq!(question.evaluation, None);
    assert_eq!(tree.sections[1].items[0].measures.as_deref(), Some(&[][..]));
}

#[test]
fn answer_parts_join_in_fixed_order() {
    let data = AnswerData {
        gauge: Some(3),
        text: Some("ok".into()),
        list: Some(vec!["x".into(), "y".into()]),
    };
    assert_eq!(
        render_answer(&data, &KeyTranslator).as_deref(),
        Some("summary.gauges.3, ok, x, y")
    );

    let t = JsonTranslator::from_json(r#"{"summary": {"gauges": {"3": "Important"}}}"#).unwrap();
    assert_eq!(render_answer(&data, &t).as_deref(), Some("Important, ok, x, y"));
}

#[test]
fn empty_parts_are_skipped() {
    let data = AnswerData {
        gauge: Some(0),
        text: Some(String::new()),
        list: Some(vec!["only".into()]),
    };
    assert_eq!(render_answer(&data, &KeyTranslator).as_deref(), Some("only"));
    assert_eq!(render_answer(&AnswerData::default(), &KeyTranslator), None);
}

#[test]
fn evaluations_attach_at_their_own_level_only() {
    let mut records = empty_records();
    records.set_answer(1, text("answered"), ts(1));
    records.set_answer(3, text("answered"), ts(1));
    records.set_evaluation(evaluation(Reference::leaf(1, 2, 3)));
    records.set_evaluation(evaluation(Reference::item(1, 1)));
    // Wrong levels for each item's mode; both must stay invisible.
    records.set_evaluation(evaluation(Reference::item(1, 2)));
    records.set_evaluation(evaluation(Reference::leaf(1, 1, 1)));

    let tree = build_preview(&records, &KeyTranslator);
    let item_mode = &tree.sections[0].items[0];
    let question_mode = &tree.sections[0].items[1];

    assert!(item_mode.evaluation.is_some());
    assert!(item_mode
        .questions
        .as_ref()
        .unwrap()
        .iter()
        .all(|q| q.evaluation.is_none()));

    assert!(question_mode.evaluation.is_none());
    let summary = question_mode.questions.as_ref().unwrap()[0]
        .evaluation
        .as_ref()
        .unwrap();
    assert_eq!(summary.title, "evaluations.statuses.3");
    assert_eq!(summary.risk_name, "sections.1.items.2.title");
}

#[test]
fn leaf_evaluation_is_not_found_at_item_reference() {
    let mut records = empty_records();
    records.set_evaluation(evaluation(Reference::leaf(1, 2, 3)));
    assert!(records.evaluation(&Reference::item(1, 2)).is_none());

    let mut records = empty_records();
    records.set_evaluation(evaluation(Reference::item(1, 2)));
    assert!(records.evaluation(&Reference::leaf(1, 2, 3)).is_none());
}

#[test]
fn unanswered_question_hides_its_evaluation() {
    let mut records = empty_records();
    records.set_evaluation(evaluation(Reference::leaf(1, 2, 3)));

    let tree = build_preview(&records, &KeyTranslator);
    let question = &tree.sections[0].items[1].questions.as_ref().unwrap()[0];
    assert!(question.content.is_none());
    assert!(question.evaluation.is_none());

    records.set_answer(3, text("answered"), ts(2));
    let tree = build_preview(&records, &KeyTranslator);
    let question = &tree.sections[0].items[1].questions.as_ref().unwrap()[0];
    assert!(question.evaluation.is_some());
}

#[test]
fn only_complete_measures_are_shown_with_their_evaluation() {
    let mut records = complete_records();
    records.add_measure(Reference::item(2, 1), "draft".into(), String::new(), ts(2));

    let tree = build_preview(&records, &KeyTranslator);
    let measures = tree.sections[1].items[0].measures.as_ref().unwrap();
    assert_eq!(measures.len(), 1);
    assert_eq!(measures[0].title, "Encryption");
    assert_eq!(measures[0].content.as_deref(), Some("AES at rest"));
    assert!(measures[0].evaluation.is_some());
}

#[test]
fn stale_records_are_skipped_silently() {
    let mut records = complete_records();
    records.set_answer(99, text("orphan"), ts(1));
    records.set_evaluation(evaluation(Reference::leaf(9, 9, 9)));

    let tree = build_preview(&records, &KeyTranslator);
    let baseline = build_preview(&complete_records(), &KeyTranslator);
    assert_eq!(tree.sections, baseline.sections);
}

#[test]
fn preview_carries_progress_and_action_plan() {
    let mut records = complete_records();
    let mut planned = evaluation(Reference::leaf(1, 2, 3));
    planned.action_plan_comment = "restrict access".into();
    records.set_evaluation(planned);

    let tree = build_preview(&records, &KeyTranslator);
    assert_eq!(tree.progress, 100);
    assert_eq!(tree.action_plan.len(), 1);
    assert_eq!(tree.action_plan[0].reference, Reference::leaf(1, 2, 3));
    assert_eq!(tree.action_plan[0].action_plan_comment, "restrict access");
}

fn summary_titles(records: &pia_core::models::records::AssessmentRecords) -> Vec<String> {
    build_preview(records, &KeyTranslator)
        .summary
        .entries
        .into_iter()
        .map(|e| e.title)
        .collect()
}

#[test]
fn summary_includes_only_filled_fields() {
    let mut records = empty_records();
    assert!(summary_titles(&records).is_empty());

    records.assessment.dpos_names = "Jo Doe".into();
    records.assessment.dpo_status = Some(OpinionStatus::Favorable);
    records.assessment.rejection_reason = "incomplete".into();
    assert_eq!(
        summary_titles(&records),
        ["summary.dpo_name", "summary.dpo_status", "summary.rejection_reason"]
    );
}

#[test]
fn searched_opinion_shows_only_searched_sub_fields() {
    let mut records = empty_records();
    records.assessment.concerned_people_searched_opinion = Some(true);
    records.assessment.people_names = "Users panel".into();
    records.assessment.concerned_people_status = Some(OpinionStatus::Unfavorable);
    records.assessment.concerned_people_searched_content = "not shown".into();

    assert_eq!(
        summary_titles(&records),
        [
            "summary.concerned_people_searched_opinion",
            "summary.concerned_people_name",
            "summary.concerned_people_status",
        ]
    );
    let entries = build_preview(&records, &KeyTranslator).summary.entries;
    assert_eq!(entries[0].content, "summary.content_choice.searched_opinion");
    assert_eq!(entries[2].content, "summary.content_choice.unfavorable");
}

#[test]
fn unsearched_opinion_shows_only_the_comment() {
    let mut records = empty_records();
    records.assessment.concerned_people_searched_opinion = Some(false);
    records.assessment.people_names = "not shown".into();
    records.assessment.concerned_people_searched_content = "no panel available".into();

    assert_eq!(
        summary_titles(&records),
        [
            "summary.concerned_people_searched_opinion",
            "summary.concerned_people_unsearched_opinion_comment",
        ]
    );
}

#[test]
fn unanswered_search_question_hides_the_whole_block() {
    let mut records = empty_records();
    records.assessment.people_names = "not shown".into();
    records.assessment.concerned_people_searched_content = "not shown".into();
    assert!(summary_titles(&records).is_empty());
}
