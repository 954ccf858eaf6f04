//! # Upload Session State Machine
//!
//! One session per upload-and-validate attempt.
//!
//! ## States
//!
//! ```text
//! NotStarted ──submit──▶ Uploading ──finish_upload──▶ Uploaded
//!     ▲                    │  ▲                          │
//!     │                    │  └─ record_transfer_failure │ begin_validation
//!     │                    │                             ▼
//!     ├────── abandon ─────┴──────────────────────── Validating
//!     │                                                  │ complete
//!     │                                                  ▼
//!     └──────────────── reset ─────────────── Completed(Passed | Failed)
//! ```
//!
//! Input errors leave the session in `NotStarted`. Transfer errors leave it
//! in `Uploading`. A failing check is recorded as data and never blocks
//! the remaining checks.

use serde::{Deserialize, Serialize};

use cv_core::{
    InputError, SessionId, StateError, Timestamp, ValidationCheckResult, ValidationOutcome,
    Verdict,
};

use crate::error::{SessionError, TransferError};

// ─── Upload File ─────────────────────────────────────────────────────

/// The file picked in the upload form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadFile {
    /// File name as selected, e.g. `lab_results.csv`.
    pub name: String,
    /// Size in bytes.
    pub size_bytes: u64,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
        }
    }

    /// The dataset name the form pre-fills: the file name without a
    /// trailing `.csv`.
    pub fn suggested_dataset_name(&self) -> &str {
        self.name.strip_suffix(".csv").unwrap_or(&self.name)
    }

    /// Size in KiB, rounded up.
    pub fn size_kb(&self) -> u64 {
        self.size_bytes.div_ceil(1024)
    }
}

// ─── Session State ───────────────────────────────────────────────────

/// Where a session is in the upload-and-validate lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    NotStarted,
    Uploading,
    Uploaded,
    Validating,
    /// Terminal until [`ValidationSession::reset`].
    Completed(Verdict),
}

impl SessionState {
    /// Whether a run is in flight.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Uploading | Self::Uploaded | Self::Validating)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotStarted => write!(f, "NOT_STARTED"),
            Self::Uploading => write!(f, "UPLOADING"),
            Self::Uploaded => write!(f, "UPLOADED"),
            Self::Validating => write!(f, "VALIDATING"),
            Self::Completed(verdict) => write!(f, "COMPLETED_{verdict}"),
        }
    }
}

/// Record of one session state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTransition {
    pub from_state: SessionState,
    pub to_state: SessionState,
    pub timestamp: Timestamp,
    pub reason: String,
}

// ─── Session ─────────────────────────────────────────────────────────

/// An upload-and-validate session.
///
/// Owns its state exclusively. Sessions share nothing with each other.
#[derive(Debug, Clone)]
pub struct ValidationSession {
    id: SessionId,
    state: SessionState,
    dataset_name: Option<String>,
    file: Option<UploadFile>,
    results: Vec<ValidationCheckResult>,
    transfer_failures: u32,
    transitions: Vec<SessionTransition>,
}

impl Default for ValidationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationSession {
    /// A fresh session in `NotStarted`.
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            state: SessionState::NotStarted,
            dataset_name: None,
            file: None,
            results: Vec::new(),
            transfer_failures: 0,
            transitions: Vec::new(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The trimmed dataset name accepted by [`Self::submit`].
    pub fn dataset_name(&self) -> Option<&str> {
        self.dataset_name.as_deref()
    }

    pub fn file(&self) -> Option<&UploadFile> {
        self.file.as_ref()
    }

    /// Check results so far, in check order.
    pub fn results(&self) -> &[ValidationCheckResult] {
        &self.results
    }

    /// Failed transfer attempts in the current run.
    pub fn transfer_failures(&self) -> u32 {
        self.transfer_failures
    }

    /// Ordered log of every state change.
    pub fn transitions(&self) -> &[SessionTransition] {
        &self.transitions
    }

    /// Start an upload (NOT_STARTED → UPLOADING).
    ///
    /// The name is trimmed and must be non-empty, and a file must be
    /// selected. On any error the session is left untouched.
    pub fn submit(
        &mut self,
        dataset_name: &str,
        file: Option<UploadFile>,
    ) -> Result<(), SessionError> {
        self.require_state(SessionState::NotStarted, SessionState::Uploading)?;
        let name = dataset_name.trim();
        if name.is_empty() {
            return Err(InputError::MissingDatasetName.into());
        }
        let file = file.ok_or(InputError::MissingFile)?;
        self.dataset_name = Some(name.to_string());
        self.file = Some(file);
        self.do_transition(SessionState::Uploading, "upload submitted");
        Ok(())
    }

    /// Count a failed transfer attempt. The session stays in UPLOADING.
    ///
    /// Returns the number of failures so far.
    pub fn record_transfer_failure(&mut self, error: &TransferError) -> Result<u32, SessionError> {
        if self.state != SessionState::Uploading {
            return Err(StateError::invalid(
                self.state,
                SessionState::Uploading,
                format!("transfer failure reported outside upload: {error}"),
            )
            .into());
        }
        self.transfer_failures += 1;
        Ok(self.transfer_failures)
    }

    /// UPLOADING → UPLOADED.
    pub fn finish_upload(&mut self) -> Result<(), SessionError> {
        self.require_state(SessionState::Uploading, SessionState::Uploaded)?;
        self.do_transition(SessionState::Uploaded, "transfer complete");
        Ok(())
    }

    /// UPLOADED → VALIDATING.
    pub fn begin_validation(&mut self) -> Result<(), SessionError> {
        self.require_state(SessionState::Uploaded, SessionState::Validating)?;
        self.do_transition(SessionState::Validating, "checks started");
        Ok(())
    }

    /// Append one check result. Only while VALIDATING.
    pub fn record_result(&mut self, result: ValidationCheckResult) -> Result<(), SessionError> {
        self.require_state(SessionState::Validating, SessionState::Validating)?;
        self.results.push(result);
        Ok(())
    }

    /// VALIDATING → COMPLETED. The verdict is `Failed` iff any result failed.
    pub fn complete(&mut self) -> Result<ValidationOutcome, SessionError> {
        let outcome = ValidationOutcome::from_results(self.results.clone());
        let target = SessionState::Completed(outcome.verdict);
        self.require_state(SessionState::Validating, target)?;
        self.do_transition(target, "all checks recorded");
        Ok(outcome)
    }

    /// COMPLETED → NOT_STARTED, discarding name, file and results.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if !matches!(self.state, SessionState::Completed(_)) {
            return Err(StateError::invalid(
                self.state,
                SessionState::NotStarted,
                "only a completed session can be reset",
            )
            .into());
        }
        self.clear();
        self.do_transition(SessionState::NotStarted, "reset");
        Ok(())
    }

    /// Abort an in-flight run back to NOT_STARTED.
    pub fn abandon(&mut self, reason: &str) -> Result<(), SessionError> {
        if !self.state.is_active() {
            return Err(StateError::invalid(
                self.state,
                SessionState::NotStarted,
                "no run in flight",
            )
            .into());
        }
        self.clear();
        self.do_transition(SessionState::NotStarted, reason);
        Ok(())
    }

    fn clear(&mut self) {
        self.dataset_name = None;
        self.file = None;
        self.results.clear();
        self.transfer_failures = 0;
    }

    fn require_state(
        &self,
        expected: SessionState,
        target: SessionState,
    ) -> Result<(), SessionError> {
        if self.state != expected {
            return Err(StateError::invalid(
                self.state,
                target,
                format!("requires {expected}"),
            )
            .into());
        }
        Ok(())
    }

    fn do_transition(&mut self, to: SessionState, reason: &str) {
        self.transitions.push(SessionTransition {
            from_state: self.state,
            to_state: to,
            timestamp: Timestamp::now(),
            reason: reason.to_string(),
        });
        self.state = to;
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use cv_core::{CheckCategory, CheckOutcome};

    fn csv() -> Option<UploadFile> {
        Some(UploadFile::new("lab_results.csv", 4096))
    }

    fn check(name: &str, outcome: CheckOutcome) -> ValidationCheckResult {
        ValidationCheckResult::new(name, CheckCategory::Other, outcome, "details")
    }

    fn validating() -> ValidationSession {
        let mut s = ValidationSession::new();
        s.submit("Lab Results", csv()).unwrap();
        s.finish_upload().unwrap();
        s.begin_validation().unwrap();
        s
    }

    #[test]
    fn test_empty_name_stays_not_started() {
        let mut s = ValidationSession::new();
        let err = s.submit("   ", csv()).unwrap_err();
        assert_eq!(err, SessionError::Input(InputError::MissingDatasetName));
        assert_eq!(s.state(), SessionState::NotStarted);
        assert!(s.transitions().is_empty());
    }

    #[test]
    fn test_missing_file_stays_not_started() {
        let mut s = ValidationSession::new();
        let err = s.submit("Lab Results", None).unwrap_err();
        assert_eq!(err, SessionError::Input(InputError::MissingFile));
        assert_eq!(s.state(), SessionState::NotStarted);
        assert!(s.file().is_none());
    }

    #[test]
    fn test_submit_trims_name() {
        let mut s = ValidationSession::new();
        s.submit("  Lab Results ", csv()).unwrap();
        assert_eq!(s.state(), SessionState::Uploading);
        assert_eq!(s.dataset_name(), Some("Lab Results"));
    }

    #[test]
    fn test_happy_path_with_warning_passes() {
        let mut s = validating();
        s.record_result(check("a", CheckOutcome::Pass)).unwrap();
        s.record_result(check("b", CheckOutcome::Warning)).unwrap();
        let outcome = s.complete().unwrap();
        assert_eq!(outcome.verdict, Verdict::Passed);
        assert_eq!(s.state(), SessionState::Completed(Verdict::Passed));
        let path: Vec<String> = s.transitions().iter().map(|t| t.to_state.to_string()).collect();
        assert_eq!(
            path,
            ["UPLOADING", "UPLOADED", "VALIDATING", "COMPLETED_PASSED"]
        );
    }

    #[test]
    fn test_any_fail_fails_the_session() {
        let mut s = validating();
        s.record_result(check("a", CheckOutcome::Fail)).unwrap();
        s.record_result(check("b", CheckOutcome::Pass)).unwrap();
        assert_eq!(s.complete().unwrap().verdict, Verdict::Failed);
        assert_eq!(s.state(), SessionState::Completed(Verdict::Failed));
    }

    #[test]
    fn test_transfer_failure_stays_uploading() {
        let mut s = ValidationSession::new();
        s.submit("Lab Results", csv()).unwrap();
        let err = TransferError::Network("reset".into());
        assert_eq!(s.record_transfer_failure(&err).unwrap(), 1);
        assert_eq!(s.record_transfer_failure(&err).unwrap(), 2);
        assert_eq!(s.state(), SessionState::Uploading);
        s.finish_upload().unwrap();
        assert!(s.record_transfer_failure(&err).is_err());
    }

    #[test]
    fn test_out_of_order_calls_are_rejected() {
        let mut s = ValidationSession::new();
        assert!(s.finish_upload().is_err());
        assert!(s.begin_validation().is_err());
        assert!(s.complete().is_err());
        assert!(s
            .record_result(check("a", CheckOutcome::Pass))
            .is_err());
        assert_eq!(s.state(), SessionState::NotStarted);

        s.submit("x", csv()).unwrap();
        let err = s.submit("y", csv()).unwrap_err();
        assert!(matches!(err, SessionError::InvalidTransition(_)));
        assert_eq!(s.dataset_name(), Some("x"));
    }

    #[test]
    fn test_reset_only_from_completed() {
        let mut s = validating();
        assert!(s.reset().is_err());
        s.record_result(check("a", CheckOutcome::Pass)).unwrap();
        s.complete().unwrap();
        s.reset().unwrap();
        assert_eq!(s.state(), SessionState::NotStarted);
        assert!(s.results().is_empty());
        assert!(s.dataset_name().is_none());
        s.submit("again", csv()).unwrap();
    }

    #[test]
    fn test_abandon_from_active_states_only() {
        let mut s = ValidationSession::new();
        assert!(s.abandon("nothing running").is_err());

        let mut s = validating();
        s.record_result(check("a", CheckOutcome::Pass)).unwrap();
        s.abandon("cancelled").unwrap();
        assert_eq!(s.state(), SessionState::NotStarted);
        assert!(s.results().is_empty());
        assert_eq!(s.transitions().last().unwrap().reason, "cancelled");
    }

    #[test]
    fn test_suggested_dataset_name() {
        assert_eq!(
            UploadFile::new("lab_results.csv", 1).suggested_dataset_name(),
            "lab_results"
        );
        assert_eq!(
            UploadFile::new("notes.txt", 1).suggested_dataset_name(),
            "notes.txt"
        );
        assert_eq!(UploadFile::new("a.csv", 1025).size_kb(), 2);
    }
}
