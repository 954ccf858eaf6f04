//! # Error Types: Structured Error Hierarchy
//!
//! Defines the error types shared across CareVault. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Input errors name the missing form field so the view layer can
//!   re-prompt for exactly that field.
//! - State machine errors include the current state, attempted
//!   transition, and rejection reason.
//! - A failing compliance check is never an error. It travels as a
//!   [`crate::CheckOutcome::Fail`] value.

use thiserror::Error;

/// Top-level error type for the core data model.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A value failed schema validation (malformed timestamp, bad identifier).
    #[error("schema validation error: {0}")]
    SchemaValidation(String),

    /// Submitted form input was incomplete.
    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// State machine transition rejected.
    #[error("invalid state transition: {0}")]
    InvalidTransition(#[from] StateError),
}

/// Missing or empty input at upload submission time.
///
/// Recovered locally: nothing is submitted and the user is re-prompted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// The dataset name was empty or whitespace.
    #[error("dataset name is required")]
    MissingDatasetName,

    /// No file was selected.
    #[error("a file must be selected")]
    MissingFile,
}

/// Error in state machine transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// Attempted an invalid state transition.
    #[error("invalid transition from {from} to {to}: {reason}")]
    InvalidTransition {
        /// Current state name.
        from: String,
        /// Attempted target state name.
        to: String,
        /// Reason the transition was rejected.
        reason: String,
    },
}

impl StateError {
    /// Build an [`StateError::InvalidTransition`] from displayable states.
    pub fn invalid(
        from: impl std::fmt::Display,
        to: impl std::fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
            reason: reason.into(),
        }
    }
}
