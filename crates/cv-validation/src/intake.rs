//! # Dataset Intake
//!
//! The full upload path against a [`Repository`]:
//!
//! 1. Submit the form to a fresh session. Input errors stop here and
//!    nothing is written.
//! 2. Create the dataset with status `Pending`.
//! 3. Run transfer and checks.
//! 4. Persist every check result, then apply the outcome to the dataset.
//! 5. Append `UPLOAD` and `VALIDATE` access-log entries.
//!
//! If the run fails or is cancelled, the dataset stays `Pending` and a
//! single unsuccessful `UPLOAD` entry is logged.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::info;

use cv_core::{
    AccessAction, DatasetRecord, NewAccessLog, NewDataset, UserId, ValidationOutcome,
    ValidationRecord,
};
use cv_store::Repository;

use crate::check::CheckSuite;
use crate::error::ValidationError;
use crate::runner::{SessionEvent, ValidationRunner};
use crate::session::{UploadFile, ValidationSession};
use crate::transport::UploadTransport;

/// Who is uploading, as recorded in the access log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uploader {
    pub user_id: UserId,
    pub user_name: String,
    pub user_role: String,
    pub ip_address: String,
}

/// The upload form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeRequest {
    pub dataset_name: String,
    pub file: Option<UploadFile>,
    pub record_count: u64,
    pub uploader: Uploader,
}

/// What a successful intake produced.
#[derive(Debug, Clone)]
pub struct IntakeReceipt {
    /// The dataset after the outcome was applied.
    pub dataset: DatasetRecord,
    pub outcome: ValidationOutcome,
    /// Persisted results, in check order.
    pub records: Vec<ValidationRecord>,
    /// The completed session, with its transition log.
    pub session: ValidationSession,
}

/// Uploads datasets into a repository.
pub struct DatasetIntake<R, T> {
    repository: Arc<R>,
    runner: ValidationRunner<T>,
    suite: CheckSuite,
}

impl<R: Repository, T: UploadTransport> DatasetIntake<R, T> {
    pub fn new(repository: Arc<R>, runner: ValidationRunner<T>, suite: CheckSuite) -> Self {
        Self {
            repository,
            runner,
            suite,
        }
    }

    pub fn suite(&self) -> &CheckSuite {
        &self.suite
    }

    /// Upload and validate one dataset.
    pub async fn upload(
        &self,
        request: IntakeRequest,
        events: &UnboundedSender<SessionEvent>,
        cancel: &CancellationToken,
    ) -> Result<IntakeReceipt, ValidationError> {
        let size_kb = request.file.as_ref().map_or(0, UploadFile::size_kb);
        let mut session = ValidationSession::new();
        session.submit(&request.dataset_name, request.file)?;

        let dataset = self.repository.create_dataset(NewDataset {
            name: request.dataset_name.trim().to_string(),
            owner_id: request.uploader.user_id,
            owner_name: request.uploader.user_name.clone(),
            file_size_kb: size_kb,
            record_count: request.record_count,
        });

        let outcome = match self
            .runner
            .run(&mut session, &self.suite, events, cancel)
            .await
        {
            Ok(outcome) => outcome,
            Err(err) => {
                self.log(&request.uploader, &dataset, AccessAction::Upload, false);
                return Err(err);
            }
        };

        let mut records = Vec::with_capacity(outcome.results.len());
        for (entry, result) in self.suite.entries().iter().zip(&outcome.results) {
            records.push(self.repository.record_validation_result(
                dataset.id,
                entry.policy_id,
                result.clone(),
            )?);
        }
        let dataset = self.repository.apply_outcome(dataset.id, &outcome)?;

        self.log(&request.uploader, &dataset, AccessAction::Upload, true);
        self.log(&request.uploader, &dataset, AccessAction::Validate, true);
        info!(
            dataset = %dataset.id,
            status = %dataset.validation_status,
            checks = records.len(),
            "dataset intake finished"
        );

        Ok(IntakeReceipt {
            dataset,
            outcome,
            records,
            session,
        })
    }

    fn log(&self, uploader: &Uploader, dataset: &DatasetRecord, action: AccessAction, success: bool) {
        self.repository.append_access_log(NewAccessLog {
            user_id: uploader.user_id,
            user_name: uploader.user_name.clone(),
            user_role: uploader.user_role.clone(),
            action,
            dataset_id: dataset.id,
            dataset_name: dataset.name.clone(),
            ip_address: uploader.ip_address.clone(),
            success,
        });
    }
}

impl<R, T> std::fmt::Debug for DatasetIntake<R, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetIntake")
            .field("suite", &self.suite)
            .finish_non_exhaustive()
    }
}
