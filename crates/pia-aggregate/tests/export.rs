mod common;

use common::*;
use pia_aggregate::error::ExportError;
use pia_aggregate::export::{build_export, ExportPayload, EXPORT_FORMAT_VERSION};
use pia_aggregate::translate::KeyTranslator;
use pia_structure::Reference;

#[test]
fn export_round_trips_losslessly() {
    let payload = build_export(&complete_records(), &KeyTranslator);
    let json = payload.to_json().unwrap();
    let back = ExportPayload::from_json(&json).unwrap();

    assert_eq!(back, payload);
    assert_eq!(back.to_json().unwrap(), json);
}

#[test]
fn empty_assessment_round_trips_too() {
    let payload = build_export(&empty_records(), &KeyTranslator);
    let back = ExportPayload::from_json(&payload.to_json().unwrap()).unwrap();
    assert_eq!(back, payload);
}

#[test]
fn export_embeds_versions_and_progress() {
    let payload = build_export(&complete_records(), &KeyTranslator);
    assert_eq!(payload.format_version, EXPORT_FORMAT_VERSION);
    assert_eq!(payload.structure_version, 3);
    assert_eq!(payload.progress, 100);
    assert_eq!(payload.answers.len(), 3);
    assert_eq!(payload.measures.len(), 1);
    assert_eq!(payload.evaluations.len(), 3);
}

#[test]
fn export_json_nests_sections_items_and_leaves() {
    let payload = build_export(&complete_records(), &KeyTranslator);
    let value: serde_json::Value = serde_json::from_str(&payload.to_json().unwrap()).unwrap();

    let first_item = &value["sections"][0]["items"][0];
    assert_eq!(first_item["questions"][0]["content"], "purpose");
    assert!(first_item.get("measures").is_none());
    assert!(first_item["evaluation"].is_object());

    let measure_item = &value["sections"][1]["items"][0];
    assert_eq!(measure_item["measures"][0]["content"], "AES at rest");
    assert!(measure_item.get("questions").is_none());
}

#[test]
fn records_survive_the_payload() {
    let records = complete_records();
    let restored = build_export(&records, &KeyTranslator).into_records();
    assert_eq!(restored, records);
}

#[test]
fn payload_without_measure_counter_restores_it_from_measures() {
    let payload = build_export(&complete_records(), &KeyTranslator);
    let mut value = serde_json::to_value(&payload).unwrap();
    value.as_object_mut().unwrap().remove("last_measure_id");

    let parsed = ExportPayload::from_json(&value.to_string()).unwrap();
    let mut restored = parsed.into_records();
    assert_eq!(restored.last_measure_id, 1);
    let next = restored
        .add_measure(Reference::item(2, 1), "Backups".into(), "nightly".into(), ts(2))
        .unwrap()
        .id;
    assert_eq!(next, 2);
}

#[test]
fn newer_format_is_rejected() {
    let mut payload = build_export(&empty_records(), &KeyTranslator);
    payload.format_version = EXPORT_FORMAT_VERSION + 1;
    let json = serde_json::to_string(&payload).unwrap();

    let err = ExportPayload::from_json(&json).unwrap_err();
    assert!(matches!(err, ExportError::UnsupportedFormat { .. }));
}

#[test]
fn malformed_payload_is_a_serialization_error() {
    let err = ExportPayload::from_json(r#"{"format_version": 1, "pia": 12}"#).unwrap_err();
    assert!(matches!(err, ExportError::Serialization(_)));
}
