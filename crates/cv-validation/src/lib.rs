//! # cv-validation: Validation Simulator
//!
//! Upload-and-validate sessions for CareVault.
//!
//! ## Modules
//!
//! - **Session** (`session.rs`): the per-upload state machine with a
//!   transition log.
//! - **Check** (`check.rs`): the `DatasetCheck` trait, ordered suites and the
//!   policy registry.
//! - **Transport** (`transport.rs`): the async upload seam.
//! - **Runner** (`runner.rs`): drives a session through transfer and checks,
//!   streaming `SessionEvent`s and honouring cancellation.
//! - **Intake** (`intake.rs`): runner plus repository writes.
//!
//! Checks never short-circuit. A run over an N-check suite that completes
//! always yields exactly N results.

pub mod check;
pub mod error;
pub mod intake;
pub mod runner;
pub mod session;
pub mod transport;

pub use check::{CheckRegistry, CheckSuite, CheckVerdict, DatasetCheck, SimulatedCheck, SuiteEntry};
pub use error::{SessionError, TransferError, ValidationError};
pub use intake::{DatasetIntake, IntakeReceipt, IntakeRequest, Uploader};
pub use runner::{RunnerConfig, SessionEvent, ValidationRunner};
pub use session::{SessionState, SessionTransition, UploadFile, ValidationSession};
pub use transport::{SimulatedTransport, UploadTransport};
