//! In-memory repository backed by `parking_lot::RwLock`.
//!
//! Identifiers are assigned sequentially per collection, starting after
//! the highest seeded identifier.

use parking_lot::RwLock;

use cv_core::{
    AccessLogEntry, AccessLogId, CompliancePolicy, DatasetId, DatasetRecord, NewAccessLog,
    NewDataset, PolicyId, Timestamp, ValidationCheckResult, ValidationOutcome, ValidationRecord,
    ValidationRecordId, ValidationStatus,
};

use crate::error::StoreError;
use crate::repository::Repository;
use crate::seed;

#[derive(Default)]
struct Inner {
    datasets: Vec<DatasetRecord>,
    access_logs: Vec<AccessLogEntry>,
    policies: Vec<CompliancePolicy>,
    validations: Vec<ValidationRecord>,
}

impl Inner {
    fn next_dataset_id(&self) -> DatasetId {
        DatasetId(self.datasets.iter().map(|d| d.id.get()).max().unwrap_or(0) + 1)
    }

    fn next_access_log_id(&self) -> AccessLogId {
        AccessLogId(self.access_logs.iter().map(|l| l.id.get()).max().unwrap_or(0) + 1)
    }

    fn next_validation_id(&self) -> ValidationRecordId {
        ValidationRecordId(self.validations.iter().map(|v| v.id.get()).max().unwrap_or(0) + 1)
    }

    fn dataset_mut(&mut self, id: DatasetId) -> Result<&mut DatasetRecord, StoreError> {
        self.datasets
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(StoreError::DatasetNotFound(id))
    }
}

/// Volatile repository. All data is lost when the value is dropped.
pub struct InMemoryRepository {
    inner: RwLock<Inner>,
}

impl InMemoryRepository {
    /// An empty repository.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// A repository loaded with the demo datasets, access logs, policies
    /// and validation history, timestamped relative to `now`.
    pub fn seeded(now: Timestamp) -> Self {
        let inner = Inner {
            datasets: seed::datasets(now),
            access_logs: seed::access_logs(now),
            policies: seed::policies(),
            validations: seed::validation_history(now),
        };
        tracing::debug!(
            datasets = inner.datasets.len(),
            access_logs = inner.access_logs.len(),
            "seeded in-memory repository"
        );
        Self {
            inner: RwLock::new(inner),
        }
    }

    /// Replace the policy set.
    pub fn replace_policies(&self, policies: Vec<CompliancePolicy>) {
        self.inner.write().policies = policies;
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("InMemoryRepository")
            .field("datasets", &inner.datasets.len())
            .field("access_logs", &inner.access_logs.len())
            .field("policies", &inner.policies.len())
            .field("validations", &inner.validations.len())
            .finish()
    }
}

impl Repository for InMemoryRepository {
    fn list_datasets(&self) -> Vec<DatasetRecord> {
        self.inner.read().datasets.clone()
    }

    fn list_access_logs(&self) -> Vec<AccessLogEntry> {
        self.inner.read().access_logs.clone()
    }

    fn list_policies(&self) -> Vec<CompliancePolicy> {
        self.inner.read().policies.clone()
    }

    fn get_dataset(&self, id: DatasetId) -> Option<DatasetRecord> {
        self.inner.read().datasets.iter().find(|d| d.id == id).cloned()
    }

    fn create_dataset(&self, spec: NewDataset) -> DatasetRecord {
        let mut inner = self.inner.write();
        let record = DatasetRecord {
            id: inner.next_dataset_id(),
            name: spec.name,
            owner_id: spec.owner_id,
            owner_name: spec.owner_name,
            created_at: Timestamp::now(),
            validation_status: ValidationStatus::Pending,
            pii_masked: false,
            file_size_kb: spec.file_size_kb,
            record_count: spec.record_count,
            error_message: None,
        };
        inner.datasets.push(record.clone());
        tracing::info!(dataset = %record.id, name = %record.name, "dataset created");
        record
    }

    fn append_access_log(&self, entry: NewAccessLog) -> AccessLogEntry {
        let mut inner = self.inner.write();
        let logged = AccessLogEntry {
            id: inner.next_access_log_id(),
            user_id: entry.user_id,
            user_name: entry.user_name,
            user_role: entry.user_role,
            action: entry.action,
            dataset_id: entry.dataset_id,
            dataset_name: entry.dataset_name,
            timestamp: Timestamp::now(),
            ip_address: entry.ip_address,
            success: entry.success,
        };
        inner.access_logs.push(logged.clone());
        tracing::debug!(entry = %logged.id, action = %logged.action, "access logged");
        logged
    }

    fn record_validation_result(
        &self,
        dataset_id: DatasetId,
        policy_id: Option<PolicyId>,
        result: ValidationCheckResult,
    ) -> Result<ValidationRecord, StoreError> {
        let mut inner = self.inner.write();
        inner.dataset_mut(dataset_id)?;
        let record = ValidationRecord {
            id: inner.next_validation_id(),
            dataset_id,
            policy_id,
            result,
            checked_at: Timestamp::now(),
        };
        inner.validations.push(record.clone());
        Ok(record)
    }

    fn validation_results(&self, dataset_id: DatasetId) -> Vec<ValidationRecord> {
        self.inner
            .read()
            .validations
            .iter()
            .filter(|v| v.dataset_id == dataset_id)
            .cloned()
            .collect()
    }

    fn apply_outcome(
        &self,
        dataset_id: DatasetId,
        outcome: &ValidationOutcome,
    ) -> Result<DatasetRecord, StoreError> {
        let mut inner = self.inner.write();
        let dataset = inner.dataset_mut(dataset_id)?;
        dataset.apply_outcome(outcome);
        tracing::info!(
            dataset = %dataset_id,
            status = %dataset.validation_status,
            pii_masked = dataset.pii_masked,
            "validation outcome applied"
        );
        Ok(dataset.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cv_core::{AccessAction, CheckCategory, CheckOutcome, UserId};

    fn now() -> Timestamp {
        Timestamp::parse("2025-03-15T12:00:00Z").unwrap()
    }

    fn new_dataset(name: &str) -> NewDataset {
        NewDataset {
            name: name.into(),
            owner_id: UserId(101),
            owner_name: "Dr. Sarah Chen".into(),
            file_size_kb: 640,
            record_count: 1200,
        }
    }

    #[test]
    fn test_create_dataset_starts_pending_and_unmasked() {
        let repo = InMemoryRepository::seeded(now());
        let record = repo.create_dataset(new_dataset("Discharge Summaries"));
        assert_eq!(record.id, DatasetId(9));
        assert_eq!(record.validation_status, ValidationStatus::Pending);
        assert!(!record.pii_masked);
        assert!(record.error_message.is_none());
        assert_eq!(repo.list_datasets().len(), 9);
    }

    #[test]
    fn test_empty_repository_ids_start_at_one() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.create_dataset(new_dataset("first")).id, DatasetId(1));
        assert_eq!(repo.create_dataset(new_dataset("second")).id, DatasetId(2));
    }

    #[test]
    fn test_access_log_preserves_insertion_order() {
        let repo = InMemoryRepository::seeded(now());
        let appended = repo.append_access_log(NewAccessLog {
            user_id: UserId(201),
            user_name: "Jane Smith".into(),
            user_role: "Data Manager".into(),
            action: AccessAction::Download,
            dataset_id: DatasetId(99),
            dataset_name: "Unknown".into(),
            ip_address: "10.0.0.8".into(),
            success: false,
        });
        let logs = repo.list_access_logs();
        assert_eq!(logs.len(), 6);
        assert_eq!(logs.last(), Some(&appended));
        assert_eq!(appended.id, AccessLogId(6));
    }

    #[test]
    fn test_record_validation_result_requires_dataset() {
        let repo = InMemoryRepository::new();
        let result = ValidationCheckResult::new(
            "Null Value Check",
            CheckCategory::DataQuality,
            CheckOutcome::Warning,
            "3 nulls",
        );
        let err = repo
            .record_validation_result(DatasetId(5), None, result)
            .unwrap_err();
        assert_eq!(err, StoreError::DatasetNotFound(DatasetId(5)));
    }

    #[test]
    fn test_validation_results_filter_by_dataset() {
        let repo = InMemoryRepository::seeded(now());
        let history = repo.validation_results(DatasetId(3));
        let names: Vec<&str> = history.iter().map(|r| r.result.check_name.as_str()).collect();
        assert_eq!(names, ["PHI Identifier Check", "Null Value Check"]);
        assert!(repo.validation_results(DatasetId(8)).is_empty());
    }

    #[test]
    fn test_apply_outcome_updates_dataset() {
        let repo = InMemoryRepository::seeded(now());
        let created = repo.create_dataset(new_dataset("Radiology Notes"));
        let outcome = ValidationOutcome::from_results(vec![ValidationCheckResult::new(
            "PHI Identifier Check",
            CheckCategory::Phi,
            CheckOutcome::Pass,
            "masked",
        )]);
        let updated = repo.apply_outcome(created.id, &outcome).unwrap();
        assert_eq!(updated.validation_status, ValidationStatus::Passed);
        assert!(updated.pii_masked);
        assert_eq!(repo.get_dataset(created.id), Some(updated));
    }

    #[test]
    fn test_apply_outcome_unknown_dataset() {
        let repo = InMemoryRepository::new();
        let outcome = ValidationOutcome::from_results(Vec::new());
        assert!(repo.apply_outcome(DatasetId(1), &outcome).is_err());
    }

    #[test]
    fn test_replace_policies() {
        let repo = InMemoryRepository::seeded(now());
        assert_eq!(repo.list_policies().len(), 3);
        repo.replace_policies(Vec::new());
        assert!(repo.list_policies().is_empty());
    }
}
