//! # Repository Trait
//!
//! The data-access seam between CareVault's logic and its storage.

use cv_core::{
    AccessLogEntry, CompliancePolicy, DatasetId, DatasetRecord, NewAccessLog, NewDataset, PolicyId,
    ValidationCheckResult, ValidationOutcome, ValidationRecord,
};

use crate::error::StoreError;

/// Storage for datasets, access logs, policies and validation history.
///
/// Implementations must be shareable across tasks. List operations return
/// owned snapshots so that callers never hold a lock while aggregating.
pub trait Repository: Send + Sync {
    /// All datasets, in creation order.
    fn list_datasets(&self) -> Vec<DatasetRecord>;

    /// The full access log, in insertion order.
    fn list_access_logs(&self) -> Vec<AccessLogEntry>;

    /// All compliance policies, active or not.
    fn list_policies(&self) -> Vec<CompliancePolicy>;

    /// Look up one dataset.
    fn get_dataset(&self, id: DatasetId) -> Option<DatasetRecord>;

    /// Create a dataset with status `Pending` and `pii_masked = false`.
    fn create_dataset(&self, spec: NewDataset) -> DatasetRecord;

    /// Append an entry to the access log.
    fn append_access_log(&self, entry: NewAccessLog) -> AccessLogEntry;

    /// Persist one check result against a dataset.
    ///
    /// # Errors
    ///
    /// [`StoreError::DatasetNotFound`] if the dataset does not exist.
    fn record_validation_result(
        &self,
        dataset_id: DatasetId,
        policy_id: Option<PolicyId>,
        result: ValidationCheckResult,
    ) -> Result<ValidationRecord, StoreError>;

    /// Every persisted check result for a dataset, oldest first.
    fn validation_results(&self, dataset_id: DatasetId) -> Vec<ValidationRecord>;

    /// Apply a finished validation run to a dataset, updating its status,
    /// `pii_masked` and `error_message` together.
    ///
    /// # Errors
    ///
    /// [`StoreError::DatasetNotFound`] if the dataset does not exist.
    fn apply_outcome(
        &self,
        dataset_id: DatasetId,
        outcome: &ValidationOutcome,
    ) -> Result<DatasetRecord, StoreError>;
}
