use std::sync::Arc;

use serde::{Deserialize, Serialize};

use pia_aggregate::export::{self, ExportPayload};
use pia_aggregate::preview::{self, PreviewTree};
use pia_aggregate::progress;
use pia_aggregate::translate::Translator;
use pia_core::models::answer::{Answer, AnswerData};
use pia_core::models::assessment::Assessment;
use pia_core::models::evaluation::{Evaluation, EvaluationStatus, Gauges};
use pia_core::models::measure::Measure;
use pia_core::models::records::AssessmentRecords;
use pia_storage::{ArchiveFilter, PiaStore};
use pia_structure::structure::Target;
use pia_structure::{EvaluationMode, Reference};

use crate::error::{RecordKind, ServiceError};

/// How an export payload replaces live state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaceOptions {
    /// Overwrite the target assessment instead of creating a new one.
    pub in_place: bool,
    /// Keep the structure recorded in the payload. When false, an in-place
    /// replace keeps the live assessment's structure.
    pub preserve_structure: bool,
}

/// The user-editable fields of an evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationInput {
    #[serde(default)]
    pub status: EvaluationStatus,
    #[serde(default)]
    pub action_plan_comment: String,
    #[serde(default)]
    pub evaluation_comment: String,
    #[serde(default)]
    pub gauges: Gauges,
}

/// Owns the live state of assessments: the record itself and the answers,
/// measures and evaluations entered against it.
///
/// Every mutation loads one bundle, changes it, and writes it back whole.
/// Concurrent writers to the same assessment are not supported.
pub struct AssessmentManager<S: ?Sized> {
    store: Arc<S>,
    translator: Arc<dyn Translator>,
}

impl<S: PiaStore + ?Sized> AssessmentManager<S> {
    pub fn new(store: Arc<S>, translator: Arc<dyn Translator>) -> Self {
        Self { store, translator }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn translator(&self) -> &dyn Translator {
        self.translator.as_ref()
    }

    pub async fn records(&self, pia_id: u64) -> Result<AssessmentRecords, ServiceError> {
        self.store
            .load_records(pia_id)
            .await
            .map_err(ServiceError::from_storage(RecordKind::Assessment, pia_id))
    }

    async fn save(&self, records: &AssessmentRecords) -> Result<(), ServiceError> {
        self.store
            .save_records(records)
            .await
            .map_err(ServiceError::from_storage(RecordKind::Assessment, records.pia_id()))
    }

    pub async fn get(&self, pia_id: u64) -> Result<Assessment, ServiceError> {
        Ok(self.records(pia_id).await?.assessment)
    }

    pub async fn create(&self, assessment: Assessment) -> Result<Assessment, ServiceError> {
        let records = self
            .store
            .create(AssessmentRecords::new(assessment))
            .await
            .map_err(|e| ServiceError::TransientIo(e.to_string()))?;
        tracing::info!(pia_id = records.pia_id(), "assessment created");
        Ok(records.assessment)
    }

    pub async fn get_all_active(&self) -> Result<Vec<Assessment>, ServiceError> {
        self.find_all(ArchiveFilter::Active).await
    }

    pub async fn get_all_archived(&self) -> Result<Vec<Assessment>, ServiceError> {
        self.find_all(ArchiveFilter::Archived).await
    }

    async fn find_all(&self, filter: ArchiveFilter) -> Result<Vec<Assessment>, ServiceError> {
        self.store
            .find_all(filter)
            .await
            .map_err(|e| ServiceError::TransientIo(e.to_string()))
    }

    pub(crate) async fn find_all_records(
        &self,
        filter: ArchiveFilter,
    ) -> Result<Vec<AssessmentRecords>, ServiceError> {
        self.store
            .find_all_records(filter)
            .await
            .map_err(|e| ServiceError::TransientIo(e.to_string()))
    }

    /// Replace the descriptive fields of an assessment. The archive flag,
    /// creation time and structure stay as stored.
    pub async fn update_details(&self, assessment: Assessment) -> Result<Assessment, ServiceError> {
        let mut records = self.records(assessment.id).await?;
        let structure_data = records.assessment.structure_data.take();
        let (is_archive, created_at) = (
            records.assessment.is_archive,
            records.assessment.created_at,
        );
        records.assessment = Assessment {
            is_archive,
            created_at,
            structure_data,
            updated_at: jiff::Timestamp::now(),
            ..assessment
        };
        self.save(&records).await?;
        Ok(records.assessment)
    }

    pub async fn archive(&self, pia_id: u64) -> Result<Assessment, ServiceError> {
        self.set_archived(pia_id, true).await
    }

    pub async fn unarchive(&self, pia_id: u64) -> Result<Assessment, ServiceError> {
        self.set_archived(pia_id, false).await
    }

    async fn set_archived(&self, pia_id: u64, archived: bool) -> Result<Assessment, ServiceError> {
        let mut records = self.records(pia_id).await?;
        records.assessment.is_archive = archived;
        records.assessment.updated_at = jiff::Timestamp::now();
        self.save(&records).await?;
        tracing::info!(pia_id, archived, "archive flag changed");
        Ok(records.assessment)
    }

    /// Delete an assessment together with its records and revisions.
    pub async fn delete(&self, pia_id: u64) -> Result<(), ServiceError> {
        self.store
            .delete(pia_id)
            .await
            .map_err(ServiceError::from_storage(RecordKind::Assessment, pia_id))?;
        tracing::info!(pia_id, "assessment deleted");
        Ok(())
    }

    pub async fn find_answer(
        &self,
        pia_id: u64,
        question_id: u32,
    ) -> Result<Option<Answer>, ServiceError> {
        Ok(self.records(pia_id).await?.answer(question_id).cloned())
    }

    /// Record the answer to a question of the assessment's structure.
    pub async fn save_answer(
        &self,
        pia_id: u64,
        question_id: u32,
        data: AnswerData,
    ) -> Result<Answer, ServiceError> {
        let mut records = self.records(pia_id).await?;
        if records
            .assessment
            .structure()
            .locate_question(question_id)
            .is_none()
        {
            return Err(ServiceError::UnknownReference {
                pia_id,
                reference: format!("question {question_id}"),
                reason: "no such question".to_string(),
            });
        }

        let now = jiff::Timestamp::now();
        let answer = records.set_answer(question_id, data, now).clone();
        records.assessment.updated_at = now;
        self.save(&records).await?;
        Ok(answer)
    }

    pub async fn add_measure(
        &self,
        pia_id: u64,
        item: Reference,
        title: String,
        content: String,
    ) -> Result<Measure, ServiceError> {
        let mut records = self.records(pia_id).await?;
        let item = item.item_ref();
        let is_measure_item = records
            .assessment
            .structure()
            .item(item.section_id, item.item_id)
            .is_some_and(|i| i.is_measure);
        if !is_measure_item {
            return Err(ServiceError::UnknownReference {
                pia_id,
                reference: item.to_string(),
                reason: "not a measure item".to_string(),
            });
        }

        let now = jiff::Timestamp::now();
        let measure = records
            .add_measure(item, title, content, now)
            .ok_or(ServiceError::MeasureIdsExhausted { pia_id })?
            .clone();
        records.assessment.updated_at = now;
        self.save(&records).await?;
        Ok(measure)
    }

    pub async fn update_measure(
        &self,
        pia_id: u64,
        measure_id: u32,
        title: String,
        content: String,
    ) -> Result<Measure, ServiceError> {
        let mut records = self.records(pia_id).await?;
        let now = jiff::Timestamp::now();
        let measure = records
            .update_measure(measure_id, title, content, now)
            .cloned()
            .ok_or(ServiceError::MeasureNotFound { pia_id, measure_id })?;
        records.assessment.updated_at = now;
        self.save(&records).await?;
        Ok(measure)
    }

    /// Remove a measure and its evaluation.
    pub async fn remove_measure(&self, pia_id: u64, measure_id: u32) -> Result<(), ServiceError> {
        let mut records = self.records(pia_id).await?;
        records
            .remove_measure(measure_id)
            .ok_or(ServiceError::MeasureNotFound { pia_id, measure_id })?;
        records.assessment.updated_at = jiff::Timestamp::now();
        self.save(&records).await
    }

    pub async fn find_evaluation(
        &self,
        pia_id: u64,
        reference: Reference,
    ) -> Result<Option<Evaluation>, ServiceError> {
        Ok(self.records(pia_id).await?.evaluation(&reference).cloned())
    }

    /// Record an evaluation. The reference must exist in the structure and
    /// sit at the level the item's evaluation mode asks for.
    pub async fn save_evaluation(
        &self,
        pia_id: u64,
        reference: Reference,
        input: EvaluationInput,
    ) -> Result<Evaluation, ServiceError> {
        let mut records = self.records(pia_id).await?;
        check_evaluation_slot(&records, reference).map_err(|reason| {
            ServiceError::UnknownReference {
                pia_id,
                reference: reference.to_string(),
                reason,
            }
        })?;

        let now = jiff::Timestamp::now();
        let evaluation = records
            .set_evaluation(Evaluation {
                pia_id,
                reference,
                status: input.status,
                action_plan_comment: input.action_plan_comment,
                evaluation_comment: input.evaluation_comment,
                gauges: input.gauges,
                created_at: now,
                updated_at: now,
            })
            .clone();
        records.assessment.updated_at = now;
        self.save(&records).await?;
        Ok(evaluation)
    }

    pub async fn calculate_progress(&self, pia_id: u64) -> Result<u8, ServiceError> {
        Ok(progress::calculate_progress(&self.records(pia_id).await?))
    }

    pub async fn build_preview(&self, pia_id: u64) -> Result<PreviewTree, ServiceError> {
        let records = self.records(pia_id).await?;
        Ok(preview::build_preview(&records, self.translator()))
    }

    pub async fn build_export(&self, pia_id: u64) -> Result<ExportPayload, ServiceError> {
        let records = self.records(pia_id).await?;
        Ok(export::build_export(&records, self.translator()))
    }

    /// Make an export payload the live state of an assessment.
    ///
    /// The replacement bundle is assembled in full before a single store
    /// write, so the target either reflects the payload entirely or keeps
    /// its previous state.
    pub async fn replace_by_export(
        &self,
        pia_id: u64,
        payload: ExportPayload,
        options: ReplaceOptions,
        updated_at: jiff::Timestamp,
    ) -> Result<AssessmentRecords, ServiceError> {
        let mut records = payload.into_records();
        records.assessment.updated_at = updated_at;

        if !options.in_place {
            let created = self
                .store
                .create(records)
                .await
                .map_err(|e| ServiceError::TransientIo(e.to_string()))?;
            tracing::info!(pia_id = created.pia_id(), "assessment created from export");
            return Ok(created);
        }

        let live = self.records(pia_id).await?;
        if !options.preserve_structure {
            records.assessment.structure_data = live.assessment.structure_data;
        }
        records.rebind(pia_id);
        records.last_measure_id = records.last_measure_id.max(live.last_measure_id);
        records.etag = live.etag;
        self.save(&records).await?;
        tracing::info!(pia_id, "assessment replaced from export");
        Ok(records)
    }

    /// Create a new assessment from an exported payload.
    pub async fn import(&self, payload: ExportPayload) -> Result<AssessmentRecords, ServiceError> {
        self.replace_by_export(
            0,
            payload,
            ReplaceOptions {
                in_place: false,
                preserve_structure: true,
            },
            jiff::Timestamp::now(),
        )
        .await
    }

    /// Parse and import a serialized export.
    pub async fn import_json(&self, json: &str) -> Result<AssessmentRecords, ServiceError> {
        let payload =
            ExportPayload::from_json(json).map_err(|e| ServiceError::InvalidExport(e.to_string()))?;
        self.import(payload).await
    }
}

fn check_evaluation_slot(records: &AssessmentRecords, reference: Reference) -> Result<(), String> {
    let resolved = records
        .assessment
        .structure()
        .resolve(&reference)
        .map_err(|e| e.to_string())?;

    match (resolved.item.evaluation_mode, resolved.target) {
        (EvaluationMode::Item, Target::Item) => Ok(()),
        (EvaluationMode::Question, Target::Question(_)) => Ok(()),
        (EvaluationMode::Question, Target::Measure(measure_id)) => records
            .measures_for(reference)
            .any(|m| m.id == measure_id)
            .then_some(())
            .ok_or_else(|| format!("measure {measure_id} does not exist")),
        (EvaluationMode::None, _) => Err("item is not evaluated".to_string()),
        (EvaluationMode::Item, _) => Err("item is evaluated as a whole".to_string()),
        (EvaluationMode::Question, Target::Item) => {
            Err("item is evaluated per question".to_string())
        }
    }
}
