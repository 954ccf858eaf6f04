//! # Validation Runner
//!
//! Drives a submitted [`ValidationSession`] through transfer and checks.
//!
//! Progress is streamed on an unbounded `mpsc` channel: zero or more
//! `TransferRetry`, then `StateChanged(Uploaded)`, `StateChanged(Validating)`,
//! one `CheckCompleted` per check in suite order, and finally
//! `Completed(verdict)`. A cancelled or failed run ends with `Abandoned`
//! instead. A dropped receiver does not stop the run.
//!
//! Cancellation is observed while transferring, while backing off between
//! transfer attempts, and before each check.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use cv_core::{StateError, ValidationCheckResult, ValidationOutcome, Verdict};

use crate::check::CheckSuite;
use crate::error::{backoff, SessionError, TransferError, ValidationError};
use crate::session::{SessionState, ValidationSession};
use crate::transport::UploadTransport;

/// Timing and retry knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Latency of the simulated transfer.
    pub upload_latency: Duration,
    /// Delay before each check.
    pub check_latency: Duration,
    /// Transfer attempts before giving up. Zero is treated as one.
    pub max_upload_attempts: u32,
    /// Base delay between transfer attempts; attempt `n` waits `n * base`.
    pub retry_backoff: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            upload_latency: Duration::from_millis(1500),
            check_latency: Duration::from_millis(800),
            max_upload_attempts: 3,
            retry_backoff: Duration::from_millis(500),
        }
    }
}

/// Progress notification for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    StateChanged(SessionState),
    TransferRetry {
        attempt: u32,
        error: TransferError,
    },
    CheckCompleted {
        index: usize,
        total: usize,
        result: ValidationCheckResult,
    },
    Completed(Verdict),
    Abandoned {
        reason: String,
    },
}

/// Runs sessions against one transport.
#[derive(Debug)]
pub struct ValidationRunner<T> {
    transport: T,
    config: RunnerConfig,
}

impl<T: UploadTransport> ValidationRunner<T> {
    pub fn new(transport: T, config: RunnerConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run a session that is in UPLOADING through to COMPLETED.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::Session`] if the session was not submitted.
    /// - [`ValidationError::TransferFailed`] on a permanent transfer error or
    ///   when attempts run out. The session is abandoned.
    /// - [`ValidationError::Cancelled`] if `cancel` fires. The session is
    ///   abandoned.
    pub async fn run(
        &self,
        session: &mut ValidationSession,
        suite: &CheckSuite,
        events: &UnboundedSender<SessionEvent>,
        cancel: &CancellationToken,
    ) -> Result<ValidationOutcome, ValidationError> {
        let (name, file) = match (session.state(), session.dataset_name(), session.file()) {
            (SessionState::Uploading, Some(name), Some(file)) => (name.to_string(), file.clone()),
            (state, ..) => {
                return Err(StateError::invalid(
                    state,
                    SessionState::Uploaded,
                    "run requires a submitted session",
                )
                .into())
            }
        };
        let session_id = session.id();
        info!(session = %session_id, dataset = %name, checks = suite.len(), "validation run started");

        let max_attempts = self.config.max_upload_attempts.max(1);
        loop {
            let attempt = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return Err(abandon(session, events, "uploading")?);
                }
                res = self.transport.transfer(&name, &file) => res,
            };
            let err = match attempt {
                Ok(()) => break,
                Err(err) => err,
            };
            let failures = session.record_transfer_failure(&err)?;
            if !err.is_transient() || failures >= max_attempts {
                warn!(session = %session_id, attempts = failures, error = %err, "upload failed");
                session.abandon(&format!("upload failed: {err}"))?;
                emit(
                    events,
                    SessionEvent::Abandoned {
                        reason: err.to_string(),
                    },
                );
                return Err(ValidationError::TransferFailed {
                    attempts: failures,
                    last: err,
                });
            }
            debug!(session = %session_id, attempt = failures, error = %err, "retrying upload");
            emit(
                events,
                SessionEvent::TransferRetry {
                    attempt: failures,
                    error: err,
                },
            );
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return Err(abandon(session, events, "uploading")?);
                }
                _ = tokio::time::sleep(backoff(self.config.retry_backoff, failures)) => {}
            }
        }

        session.finish_upload()?;
        emit(events, SessionEvent::StateChanged(session.state()));
        session.begin_validation()?;
        emit(events, SessionEvent::StateChanged(session.state()));

        let total = suite.len();
        for (index, entry) in suite.entries().iter().enumerate() {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return Err(abandon(session, events, "validating")?);
                }
                _ = tokio::time::sleep(self.config.check_latency) => {}
            }
            let result = entry.check.run(&file);
            debug!(session = %session_id, check = %result.check_name, result = %result.result, "check completed");
            session.record_result(result.clone())?;
            emit(
                events,
                SessionEvent::CheckCompleted {
                    index,
                    total,
                    result,
                },
            );
        }

        let outcome = session.complete()?;
        info!(session = %session_id, verdict = %outcome.verdict, "validation run finished");
        emit(events, SessionEvent::Completed(outcome.verdict));
        Ok(outcome)
    }
}

/// Abandon after cancellation; returns the error the run reports.
fn abandon(
    session: &mut ValidationSession,
    events: &UnboundedSender<SessionEvent>,
    during: &str,
) -> Result<ValidationError, SessionError> {
    let reason = format!("cancelled while {during}");
    warn!(session = %session.id(), "{reason}");
    session.abandon(&reason)?;
    emit(events, SessionEvent::Abandoned { reason });
    Ok(ValidationError::Cancelled {
        during: during.to_string(),
    })
}

fn emit(events: &UnboundedSender<SessionEvent>, event: SessionEvent) {
    if events.send(event).is_err() {
        debug!("session event receiver dropped");
    }
}
