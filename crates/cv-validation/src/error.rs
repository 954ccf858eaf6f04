//! # Validation Errors
//!
//! Three layers, each recovered at a different place:
//!
//! - [`SessionError`]: bad input or an out-of-order call on the session.
//!   The session state is unchanged.
//! - [`TransferError`]: the upload round trip failed. Transient failures are
//!   retried by the runner while the session stays in `Uploading`.
//! - [`ValidationError`]: what a full run or intake reports to its caller.

use std::time::Duration;

use thiserror::Error;

use cv_core::{InputError, StateError};
use cv_store::StoreError;

/// Rejected session operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Incomplete upload form.
    #[error(transparent)]
    Input(#[from] InputError),

    /// Operation not allowed in the current state.
    #[error(transparent)]
    InvalidTransition(#[from] StateError),
}

/// Failure of a single upload attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// Connection dropped or timed out.
    #[error("network error: {0}")]
    Network(String),

    /// Storage refused the file for lack of space.
    #[error("storage quota exceeded: {needed_kb} KB needed, {available_kb} KB available")]
    QuotaExceeded { needed_kb: u64, available_kb: u64 },

    /// Storage rejected the file outright.
    #[error("upload rejected: {0}")]
    Rejected(String),
}

impl TransferError {
    /// Whether retrying the same upload can succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Terminal failure of a validation run.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The transfer failed permanently, or transiently too many times.
    #[error("upload failed after {attempts} attempt(s): {last}")]
    TransferFailed { attempts: u32, last: TransferError },

    /// The caller cancelled the run.
    #[error("validation cancelled while {during}")]
    Cancelled { during: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<InputError> for ValidationError {
    fn from(err: InputError) -> Self {
        Self::Session(SessionError::Input(err))
    }
}

impl From<StateError> for ValidationError {
    fn from(err: StateError) -> Self {
        Self::Session(SessionError::InvalidTransition(err))
    }
}

/// Delay before retry number `attempt` (1-based): `base * attempt`.
pub(crate) fn backoff(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(attempt)
}
