//! # Dataset Records
//!
//! A dataset is created on upload with status `Pending` and
//! `pii_masked = false`. Only the outcome of a validation run changes it
//! afterwards (see [`DatasetRecord::apply_outcome`]). Datasets are never
//! deleted.

use serde::{Deserialize, Serialize};

use crate::check::{ValidationOutcome, Verdict};
use crate::identity::{DatasetId, UserId};
use crate::temporal::Timestamp;

/// Validation status of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationStatus {
    /// Every check passed or warned.
    Passed,
    /// At least one check failed.
    Failed,
    /// Not yet validated.
    Pending,
}

impl ValidationStatus {
    /// All statuses, in display order.
    pub const ALL: [ValidationStatus; 3] = [Self::Passed, Self::Failed, Self::Pending];

    /// Return the string value for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "Passed",
            Self::Failed => "Failed",
            Self::Pending => "Pending",
        }
    }
}

impl From<Verdict> for ValidationStatus {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Passed => Self::Passed,
            Verdict::Failed => Self::Failed,
        }
    }
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An uploaded dataset and its compliance state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRecord {
    /// Repository-assigned identifier.
    pub id: DatasetId,
    /// Human-readable dataset name.
    pub name: String,
    /// Owner identity.
    pub owner_id: UserId,
    /// Owner display name.
    pub owner_name: String,
    /// When the dataset was uploaded.
    pub created_at: Timestamp,
    /// Result of the most recent validation run.
    pub validation_status: ValidationStatus,
    /// Whether PHI identifiers are masked.
    pub pii_masked: bool,
    /// File size in KiB.
    pub file_size_kb: u64,
    /// Number of rows in the dataset.
    pub record_count: u64,
    /// Failure summary, present iff `validation_status` is `Failed` once
    /// the record has been through [`DatasetRecord::apply_outcome`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl DatasetRecord {
    /// Overwrite status, masking flag and error message from a finished
    /// validation run.
    ///
    /// The three fields are derived together so they cannot disagree:
    /// `error_message` is set exactly when the verdict is `Failed`, and
    /// `pii_masked` is true only if every PHI check that ran passed.
    pub fn apply_outcome(&mut self, outcome: &ValidationOutcome) {
        self.validation_status = outcome.verdict.into();
        self.pii_masked = outcome.phi_masked();
        self.error_message = outcome.failure_summary();
    }

    /// Case-insensitive substring match on dataset name or owner name.
    pub fn matches_search(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self.owner_name.to_lowercase().contains(&needle)
    }
}

/// Fields supplied by the uploader when a dataset is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDataset {
    /// Dataset name from the upload form.
    pub name: String,
    /// Uploading user.
    pub owner_id: UserId,
    /// Uploading user's display name.
    pub owner_name: String,
    /// File size in KiB.
    pub file_size_kb: u64,
    /// Number of rows.
    pub record_count: u64,
}
