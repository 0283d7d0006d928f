mod common;

use std::sync::Arc;

use common::{draft, manager, structure, text};
use pia_service::{EvaluationInput, RevisionService, ServiceError};
use pia_storage::PiaStore;
use pia_structure::Reference;

#[tokio::test]
async fn restore_brings_back_the_snapshot_state() {
    let manager = manager();
    let revisions = RevisionService::new(Arc::clone(&manager));
    let pia = manager.create(draft("A")).await.unwrap();

    manager.save_answer(pia.id, 1, text("before")).await.unwrap();
    manager
        .save_evaluation(pia.id, Reference::item(1, 1), EvaluationInput::default())
        .await
        .unwrap();
    let progress_at_snapshot = manager.calculate_progress(pia.id).await.unwrap();
    let revision = revisions.create_revision(pia.id).await.unwrap();
    assert_eq!(revision.pia_id, pia.id);

    manager.save_answer(pia.id, 1, text("after")).await.unwrap();
    manager.save_answer(pia.id, 3, text("extra")).await.unwrap();
    assert_ne!(manager.calculate_progress(pia.id).await.unwrap(), progress_at_snapshot);

    let restored = revisions.restore_revision(revision.id).await.unwrap();
    assert_eq!(restored.pia_id(), pia.id);
    assert_eq!(restored.assessment.updated_at, revision.created_at);

    let live = manager.records(pia.id).await.unwrap();
    assert_eq!(live.answer(1).and_then(|a| a.data.text()), Some("before"));
    assert!(live.answer(3).is_none());
    assert_eq!(
        manager.calculate_progress(pia.id).await.unwrap(),
        progress_at_snapshot
    );
}

#[tokio::test]
async fn stored_payload_records_progress_at_snapshot_time() {
    let manager = manager();
    let revisions = RevisionService::new(Arc::clone(&manager));
    let pia = manager.create(draft("A")).await.unwrap();
    manager.save_answer(pia.id, 1, text("x")).await.unwrap();

    let expected = manager.calculate_progress(pia.id).await.unwrap();
    let revision = revisions.create_revision(pia.id).await.unwrap();
    let payload = revisions.load_revision_export(revision.id).await.unwrap();

    assert_eq!(payload.progress, expected);
    assert_eq!(payload.pia.id, pia.id);
    assert_eq!(payload.structure_version, structure().version);
}

#[tokio::test]
async fn restore_keeps_the_recorded_structure() {
    let manager = manager();
    let revisions = RevisionService::new(Arc::clone(&manager));
    let pia = manager.create(draft("A")).await.unwrap();
    let revision = revisions.create_revision(pia.id).await.unwrap();

    // Swap the live structure for the built-in default behind the manager's back.
    let mut records = manager.records(pia.id).await.unwrap();
    records.assessment.structure_data = None;
    manager.store().save_records(&records).await.unwrap();

    let restored = revisions.restore_revision(revision.id).await.unwrap();
    assert_eq!(restored.assessment.structure_data, Some(structure()));
}

#[tokio::test]
async fn revisions_list_in_creation_order() {
    let manager = manager();
    let revisions = RevisionService::new(Arc::clone(&manager));
    let a = manager.create(draft("A")).await.unwrap();
    let b = manager.create(draft("B")).await.unwrap();

    let first = revisions.create_revision(a.id).await.unwrap();
    revisions.create_revision(b.id).await.unwrap();
    let second = revisions.create_revision(a.id).await.unwrap();

    let ids: Vec<u64> = revisions
        .list_revisions(a.id)
        .await
        .unwrap()
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec![first.id, second.id]);
}

#[tokio::test]
async fn missing_revision_and_assessment_are_not_found() {
    let manager = manager();
    let revisions = RevisionService::new(Arc::clone(&manager));

    assert!(matches!(
        revisions.restore_revision(7).await.unwrap_err(),
        ServiceError::NotFound { id: 7, .. }
    ));
    assert!(matches!(
        revisions.create_revision(3).await.unwrap_err(),
        ServiceError::NotFound { id: 3, .. }
    ));
    assert!(matches!(
        revisions.list_revisions(3).await.unwrap_err(),
        ServiceError::NotFound { .. }
    ));
}

#[tokio::test]
async fn corrupt_payload_leaves_live_state_untouched() {
    let manager = manager();
    let revisions = RevisionService::new(Arc::clone(&manager));
    let pia = manager.create(draft("A")).await.unwrap();
    manager.save_answer(pia.id, 1, text("live")).await.unwrap();
    let before = manager.records(pia.id).await.unwrap();

    let good = revisions.create_revision(pia.id).await.unwrap();
    let bad = manager
        .store()
        .create_revision(pia.id, "{\"format_version\":".into(), jiff::Timestamp::now())
        .await
        .unwrap();

    let err = revisions.restore_revision(bad.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::CorruptPayload { revision_id, .. } if revision_id == bad.id));
    assert_eq!(manager.records(pia.id).await.unwrap(), before);

    // Other revisions are unaffected.
    revisions.restore_revision(good.id).await.unwrap();
}

#[tokio::test]
async fn deleting_an_assessment_drops_its_revisions() {
    let manager = manager();
    let revisions = RevisionService::new(Arc::clone(&manager));
    let pia = manager.create(draft("A")).await.unwrap();
    let revision = revisions.create_revision(pia.id).await.unwrap();

    manager.delete(pia.id).await.unwrap();
    assert!(matches!(
        revisions.find_revision(revision.id).await.unwrap_err(),
        ServiceError::NotFound { .. }
    ));
}

#[tokio::test]
async fn restore_does_not_reissue_measure_ids_added_after_the_snapshot() {
    let manager = manager();
    let revisions = RevisionService::new(Arc::clone(&manager));
    let pia = manager.create(draft("A")).await.unwrap();
    let item = Reference::item(2, 1);
    manager.add_measure(pia.id, item, "Logging".into(), "audit".into()).await.unwrap();
    let revision = revisions.create_revision(pia.id).await.unwrap();

    let later = manager
        .add_measure(pia.id, item, "Backups".into(), "nightly".into())
        .await
        .unwrap();
    revisions.restore_revision(revision.id).await.unwrap();

    let next = manager
        .add_measure(pia.id, item, "Retention".into(), "90 days".into())
        .await
        .unwrap();
    assert!(next.id > later.id);
}
