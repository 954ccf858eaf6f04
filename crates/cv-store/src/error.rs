//! Repository errors.

use cv_core::DatasetId;
use thiserror::Error;

/// Errors returned by [`crate::Repository`] operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No dataset with this identifier exists.
    #[error("{0} not found")]
    DatasetNotFound(DatasetId),
}
