use std::sync::Arc;

use pia_aggregate::export::{self, ExportPayload};
use pia_core::models::records::AssessmentRecords;
use pia_core::models::revision::Revision;
use pia_storage::PiaStore;

use crate::error::{RecordKind, ServiceError};
use crate::lifecycle::{AssessmentManager, ReplaceOptions};

/// Immutable snapshots of an assessment and restoring from them.
pub struct RevisionService<S: ?Sized> {
    manager: Arc<AssessmentManager<S>>,
}

impl<S: PiaStore + ?Sized> RevisionService<S> {
    pub fn new(manager: Arc<AssessmentManager<S>>) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &AssessmentManager<S> {
        &self.manager
    }

    /// Snapshot the current state of an assessment.
    ///
    /// The bundle is read once, so progress and the export payload come from
    /// the same consistent view.
    pub async fn create_revision(&self, pia_id: u64) -> Result<Revision, ServiceError> {
        let records = self.manager.records(pia_id).await?;
        let payload = export::build_export(&records, self.manager.translator());
        let json = payload
            .to_json()
            .map_err(|e| ServiceError::InvalidExport(e.to_string()))?;

        let revision = self
            .manager
            .store()
            .create_revision(pia_id, json, jiff::Timestamp::now())
            .await
            .map_err(ServiceError::from_storage(RecordKind::Assessment, pia_id))?;
        tracing::info!(
            pia_id,
            revision_id = revision.id,
            progress = payload.progress,
            "revision created"
        );
        Ok(revision)
    }

    /// Revisions of an assessment in creation order.
    pub async fn list_revisions(&self, pia_id: u64) -> Result<Vec<Revision>, ServiceError> {
        self.manager.get(pia_id).await?;
        self.manager
            .store()
            .find_revisions(pia_id)
            .await
            .map_err(|e| ServiceError::TransientIo(e.to_string()))
    }

    pub async fn find_revision(&self, revision_id: u64) -> Result<Revision, ServiceError> {
        self.manager
            .store()
            .find_revision(revision_id)
            .await
            .map_err(ServiceError::from_storage(RecordKind::Revision, revision_id))
    }

    /// The parsed payload of a revision.
    pub async fn load_revision_export(&self, revision_id: u64) -> Result<ExportPayload, ServiceError> {
        let revision = self.find_revision(revision_id).await?;
        parse_export(&revision)
    }

    /// Make a revision the live state of its assessment.
    ///
    /// The assessment keeps its id and the structure recorded in the
    /// revision, and its `updated_at` becomes the revision's creation time.
    /// A revision that fails to parse leaves the live state untouched.
    pub async fn restore_revision(&self, revision_id: u64) -> Result<AssessmentRecords, ServiceError> {
        let revision = self.find_revision(revision_id).await?;
        let payload = parse_export(&revision)?;

        let restored = self
            .manager
            .replace_by_export(
                revision.pia_id,
                payload,
                ReplaceOptions {
                    in_place: true,
                    preserve_structure: true,
                },
                revision.created_at,
            )
            .await?;
        tracing::info!(pia_id = revision.pia_id, revision_id, "revision restored");
        Ok(restored)
    }
}

fn parse_export(revision: &Revision) -> Result<ExportPayload, ServiceError> {
    ExportPayload::from_json(&revision.export).map_err(|e| ServiceError::CorruptPayload {
        revision_id: revision.id,
        reason: e.to_string(),
    })
}
