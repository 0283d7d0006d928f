use async_trait::async_trait;

use pia_core::models::assessment::Assessment;
use pia_core::models::records::AssessmentRecords;
use pia_core::models::revision::Revision;

use crate::error::StorageError;

/// Which assessments a listing wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFilter {
    Active,
    Archived,
    All,
}

impl ArchiveFilter {
    pub fn matches(self, assessment: &Assessment) -> bool {
        match self {
            Self::Active => !assessment.is_archive,
            Self::Archived => assessment.is_archive,
            Self::All => true,
        }
    }
}

/// Storage operations for assessments and their revisions.
///
/// An assessment and its answers, measures and evaluations are stored as one
/// [`AssessmentRecords`] bundle, so a bundle read is a consistent view and a
/// bundle write lands completely or not at all. Revisions are append-only.
#[async_trait]
pub trait PiaStore: Send + Sync {
    /// Load one assessment with all of its child records.
    async fn load_records(&self, pia_id: u64) -> Result<AssessmentRecords, StorageError>;

    /// Load every bundle whose assessment matches `filter`, in id order.
    async fn find_all_records(
        &self,
        filter: ArchiveFilter,
    ) -> Result<Vec<AssessmentRecords>, StorageError>;

    /// Store a new bundle under a freshly allocated id. The id already on
    /// the bundle is ignored; the returned bundle carries the new one.
    async fn create(&self, records: AssessmentRecords) -> Result<AssessmentRecords, StorageError>;

    /// Replace an existing bundle as a whole.
    async fn save_records(&self, records: &AssessmentRecords) -> Result<(), StorageError>;

    /// Delete an assessment, its child records and its revisions.
    async fn delete(&self, pia_id: u64) -> Result<(), StorageError>;

    /// Append a revision row. Existing revisions are never overwritten.
    async fn create_revision(
        &self,
        pia_id: u64,
        export: String,
        created_at: jiff::Timestamp,
    ) -> Result<Revision, StorageError>;

    async fn find_revision(&self, revision_id: u64) -> Result<Revision, StorageError>;

    /// All revisions of an assessment, in creation order.
    async fn find_revisions(&self, pia_id: u64) -> Result<Vec<Revision>, StorageError>;

    async fn find(&self, pia_id: u64) -> Result<Assessment, StorageError> {
        Ok(self.load_records(pia_id).await?.assessment)
    }

    async fn find_all(&self, filter: ArchiveFilter) -> Result<Vec<Assessment>, StorageError> {
        Ok(self
            .find_all_records(filter)
            .await?
            .into_iter()
            .map(|r| r.assessment)
            .collect())
    }

    /// Replace the assessment record, leaving its children untouched.
    async fn update(&self, assessment: &Assessment) -> Result<Assessment, StorageError> {
        let mut records = self.load_records(assessment.id).await?;
        records.assessment = assessment.clone();
        self.save_records(&records).await?;
        Ok(records.assessment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pia_store_is_object_safe() {
        fn _takes_boxed(_: Box<dyn PiaStore>) {}
    }
}
