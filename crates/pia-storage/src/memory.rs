use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use pia_core::keys;
use pia_core::models::records::AssessmentRecords;
use pia_core::models::revision::Revision;

use crate::error::StorageError;
use crate::store::{ArchiveFilter, PiaStore};

#[derive(Default)]
struct Tables {
    bundles: BTreeMap<u64, AssessmentRecords>,
    revisions: BTreeMap<u64, Revision>,
    last_assessment_id: u64,
    last_revision_id: u64,
    last_version: u64,
}

impl Tables {
    /// Store `records` under a fresh version tag and return what was stored.
    fn put(&mut self, mut records: AssessmentRecords) -> AssessmentRecords {
        self.last_version += 1;
        records.etag = Some(self.last_version.to_string());
        self.bundles.insert(records.pia_id(), records.clone());
        records
    }
}

/// Process-local store. Every operation holds the table lock for its whole
/// duration, so bundle writes are atomic with respect to readers.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PiaStore for MemoryStore {
    async fn load_records(&self, pia_id: u64) -> Result<AssessmentRecords, StorageError> {
        let tables = self.tables.read().await;
        tables
            .bundles
            .get(&pia_id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                key: keys::assessment(pia_id),
            })
    }

    async fn find_all_records(
        &self,
        filter: ArchiveFilter,
    ) -> Result<Vec<AssessmentRecords>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables
            .bundles
            .values()
            .filter(|r| filter.matches(&r.assessment))
            .cloned()
            .collect())
    }

    async fn create(
        &self,
        mut records: AssessmentRecords,
    ) -> Result<AssessmentRecords, StorageError> {
        let mut tables = self.tables.write().await;
        tables.last_assessment_id += 1;
        let id = tables.last_assessment_id;
        records.rebind(id);
        let records = tables.put(records);
        tracing::debug!(pia_id = id, "assessment bundle created in memory");
        Ok(records)
    }

    async fn save_records(&self, records: &AssessmentRecords) -> Result<(), StorageError> {
        let mut tables = self.tables.write().await;
        let key = keys::assessment(records.pia_id());
        let stored = tables
            .bundles
            .get(&records.pia_id())
            .ok_or_else(|| StorageError::NotFound { key: key.clone() })?;
        // A bundle without a version tag overwrites unconditionally.
        if records.etag.is_some() && records.etag != stored.etag {
            return Err(StorageError::PreconditionFailed { key });
        }
        tables.put(records.clone());
        Ok(())
    }

    async fn delete(&self, pia_id: u64) -> Result<(), StorageError> {
        let mut tables = self.tables.write().await;
        if tables.bundles.remove(&pia_id).is_none() {
            return Err(StorageError::NotFound {
                key: keys::assessment(pia_id),
            });
        }
        tables.revisions.retain(|_, r| r.pia_id != pia_id);
        Ok(())
    }

    async fn create_revision(
        &self,
        pia_id: u64,
        export: String,
        created_at: jiff::Timestamp,
    ) -> Result<Revision, StorageError> {
        let mut tables = self.tables.write().await;
        if !tables.bundles.contains_key(&pia_id) {
            return Err(StorageError::NotFound {
                key: keys::assessment(pia_id),
            });
        }
        tables.last_revision_id += 1;
        let revision = Revision {
            id: tables.last_revision_id,
            pia_id,
            export,
            created_at,
        };
        tables.revisions.insert(revision.id, revision.clone());
        Ok(revision)
    }

    async fn find_revision(&self, revision_id: u64) -> Result<Revision, StorageError> {
        let tables = self.tables.read().await;
        tables
            .revisions
            .get(&revision_id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                key: keys::revision_locator(revision_id),
            })
    }

    async fn find_revisions(&self, pia_id: u64) -> Result<Vec<Revision>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables
            .revisions
            .values()
            .filter(|r| r.pia_id == pia_id)
            .cloned()
            .collect())
    }
}
