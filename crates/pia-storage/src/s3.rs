use async_trait::async_trait;
use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_sdk_s3::Client;
use aws_smithy_types::byte_stream::ByteStream;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use pia_core::keys;
use pia_core::models::records::AssessmentRecords;
use pia_core::models::revision::Revision;

use crate::error::StorageError;
use crate::store::{ArchiveFilter, PiaStore};

const MAX_SEQUENCE_ATTEMPTS: u32 = 5;

/// Conditional write mode for a PUT.
#[derive(Debug, Clone, Copy)]
enum Write<'a> {
    /// Unconditional, for bundles that carry no version from a prior read.
    Overwrite,
    /// Only if the current ETag matches (optimistic locking).
    IfMatch(&'a str),
    /// Only if no object exists at the key yet.
    IfAbsent,
}

#[derive(Debug, Clone, Copy)]
enum Sequence {
    Assessment,
    Revision,
}

/// Body of the object at [`keys::revision_locator`].
#[derive(Debug, Serialize, Deserialize)]
struct RevisionLocator {
    pia_id: u64,
}

/// Last allocated ids, persisted at [`keys::SEQUENCES`].
#[derive(Debug, Default, Serialize, Deserialize)]
struct Sequences {
    #[serde(default)]
    assessment: u64,
    #[serde(default)]
    revision: u64,
}

/// Store backed by JSON objects in one S3 bucket.
///
/// Each assessment bundle is a single object, so a bundle PUT is atomic.
/// A bundle saved with the ETag it was loaded at is written `If-Match`, so a
/// concurrent writer turns into `PreconditionFailed` rather than a lost
/// update. Revisions are grouped under their assessment's prefix, with a
/// small locator object per revision id. Ids come from a shared sequence
/// object updated under ETag locking.
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<(T, Option<String>), StorageError> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let err = e.into_service_error();
                if err.is_no_such_key() {
                    StorageError::NotFound {
                        key: key.to_string(),
                    }
                } else {
                    StorageError::GetObject(err.to_string())
                }
            })?;

        let etag = resp.e_tag().map(|s| s.to_string());
        let body = resp
            .body
            .collect()
            .await
            .map_err(|e| StorageError::GetObject(e.to_string()))?
            .into_bytes();

        Ok((serde_json::from_slice(&body)?, etag))
    }

    async fn put_json<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        write: Write<'_>,
    ) -> Result<String, StorageError> {
        let body = serde_json::to_vec_pretty(value)?;
        let mut req = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type("application/json")
            .body(ByteStream::from(body));

        req = match write {
            Write::Overwrite => req,
            Write::IfMatch(etag) => req.if_match(etag),
            Write::IfAbsent => req.if_none_match("*"),
        };

        let resp = req.send().await.map_err(|e| {
            let err = e.into_service_error();
            // S3 answers 412 when the condition fails, 409 when a concurrent
            // conditional write is in flight.
            let conflicted = matches!(
                err.code(),
                Some("PreconditionFailed") | Some("ConditionalRequestConflict")
            );
            match (conflicted, write) {
                (true, Write::IfAbsent) => StorageError::AlreadyExists {
                    key: key.to_string(),
                },
                (true, _) => StorageError::PreconditionFailed {
                    key: key.to_string(),
                },
                (false, _) => StorageError::PutObject(err.to_string()),
            }
        })?;

        tracing::debug!(bucket = %self.bucket, key, "object written");
        Ok(resp.e_tag().unwrap_or_default().to_string())
    }

    /// ETag of an existing object, or `NotFound`.
    async fn head(&self, key: &str) -> Result<String, StorageError> {
        let resp = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let err = e.into_service_error();
                if err.is_not_found() {
                    StorageError::NotFound {
                        key: key.to_string(),
                    }
                } else {
                    StorageError::GetObject(err.to_string())
                }
            })?;
        Ok(resp.e_tag().unwrap_or_default().to_string())
    }

    async fn delete_key(&self, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::DeleteObject(e.into_service_error().to_string()))?;
        Ok(())
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut req = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix);

            if let Some(token) = &continuation_token {
                req = req.continuation_token(token);
            }

            let resp = req
                .send()
                .await
                .map_err(|e| StorageError::ListObjects(e.into_service_error().to_string()))?;

            keys.extend(resp.contents().iter().filter_map(|o| o.key().map(str::to_string)));

            if resp.is_truncated() == Some(true) {
                continuation_token = resp.next_continuation_token().map(|s| s.to_string());
            } else {
                break;
            }
        }

        Ok(keys)
    }

    async fn next_id(&self, sequence: Sequence) -> Result<u64, StorageError> {
        for attempt in 1..=MAX_SEQUENCE_ATTEMPTS {
            let (mut sequences, etag) =
                match self.get_json::<Sequences>(keys::SEQUENCES).await {
                    Ok(found) => found,
                    Err(StorageError::NotFound { .. }) => (Sequences::default(), None),
                    Err(e) => return Err(e),
                };

            let slot = match sequence {
                Sequence::Assessment => &mut sequences.assessment,
                Sequence::Revision => &mut sequences.revision,
            };
            *slot += 1;
            let id = *slot;

            let write = match etag.as_deref() {
                Some(etag) => Write::IfMatch(etag),
                None => Write::IfAbsent,
            };

            match self.put_json(keys::SEQUENCES, &sequences, write).await {
                Ok(_) => return Ok(id),
                Err(StorageError::PreconditionFailed { .. } | StorageError::AlreadyExists { .. }) => {
                    tracing::warn!(attempt, ?sequence, "sequence write conflicted, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(StorageError::SequenceContention {
            key: keys::SEQUENCES.to_string(),
            attempts: MAX_SEQUENCE_ATTEMPTS,
        })
    }
}

#[async_trait]
impl PiaStore for S3Store {
    async fn load_records(&self, pia_id: u64) -> Result<AssessmentRecords, StorageError> {
        let (mut records, etag): (AssessmentRecords, _) =
            self.get_json(&keys::assessment(pia_id)).await?;
        records.etag = etag;
        Ok(records)
    }

    async fn find_all_records(
        &self,
        filter: ArchiveFilter,
    ) -> Result<Vec<AssessmentRecords>, StorageError> {
        let mut ids: Vec<u64> = self
            .list_keys(keys::ASSESSMENTS_PREFIX)
            .await?
            .iter()
            .filter_map(|k| keys::id_from_key(k))
            .collect();
        ids.sort_unstable();

        let mut bundles = Vec::with_capacity(ids.len());
        for id in ids {
            let records = self.load_records(id).await?;
            if filter.matches(&records.assessment) {
                bundles.push(records);
            }
        }
        Ok(bundles)
    }

    async fn create(
        &self,
        mut records: AssessmentRecords,
    ) -> Result<AssessmentRecords, StorageError> {
        let id = self.next_id(Sequence::Assessment).await?;
        records.rebind(id);
        let etag = self
            .put_json(&keys::assessment(id), &records, Write::IfAbsent)
            .await?;
        records.etag = Some(etag);
        Ok(records)
    }

    async fn save_records(&self, records: &AssessmentRecords) -> Result<(), StorageError> {
        let key = keys::assessment(records.pia_id());
        let write = match records.etag.as_deref() {
            Some(etag) => Write::IfMatch(etag),
            None => {
                self.head(&key).await?;
                Write::Overwrite
            }
        };
        self.put_json(&key, records, write).await?;
        Ok(())
    }

    async fn delete(&self, pia_id: u64) -> Result<(), StorageError> {
        let key = keys::assessment(pia_id);
        self.head(&key).await?;

        for revision_key in self.list_keys(&keys::revisions_prefix(pia_id)).await? {
            if let Some(id) = keys::id_from_key(&revision_key) {
                self.delete_key(&keys::revision_locator(id)).await?;
            }
            self.delete_key(&revision_key).await?;
        }
        self.delete_key(&key).await
    }

    async fn create_revision(
        &self,
        pia_id: u64,
        export: String,
        created_at: jiff::Timestamp,
    ) -> Result<Revision, StorageError> {
        self.head(&keys::assessment(pia_id)).await?;

        let revision = Revision {
            id: self.next_id(Sequence::Revision).await?,
            pia_id,
            export,
            created_at,
        };
        self.put_json(&keys::revision(pia_id, revision.id), &revision, Write::IfAbsent)
            .await?;
        self.put_json(
            &keys::revision_locator(revision.id),
            &RevisionLocator { pia_id },
            Write::IfAbsent,
        )
        .await?;
        Ok(revision)
    }

    async fn find_revision(&self, revision_id: u64) -> Result<Revision, StorageError> {
        let (locator, _etag): (RevisionLocator, _) =
            self.get_json(&keys::revision_locator(revision_id)).await?;
        let (revision, _etag) = self
            .get_json(&keys::revision(locator.pia_id, revision_id))
            .await?;
        Ok(revision)
    }

    async fn find_revisions(&self, pia_id: u64) -> Result<Vec<Revision>, StorageError> {
        // Keys are zero-padded, so listing order is creation order.
        let revision_keys = self.list_keys(&keys::revisions_prefix(pia_id)).await?;
        let mut revisions = Vec::with_capacity(revision_keys.len());
        for key in &revision_keys {
            let (revision, _etag): (Revision, _) = self.get_json(key).await?;
            revisions.push(revision);
        }
        Ok(revisions)
    }
}
