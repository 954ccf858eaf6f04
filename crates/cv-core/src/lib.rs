//! # cv-core: Foundational Types for CareVault
//!
//! Defines the data model shared by every other crate in the workspace:
//! dataset records, access-log entries, compliance policies, and the
//! results of validation checks. Depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `DatasetId`, `UserId`,
//!    `AccessLogId`, `PolicyId`: you cannot pass a user id where a dataset
//!    id is expected.
//!
//! 2. **UTC-only timestamps.** `Timestamp` is UTC with seconds precision.
//!    Calendar-date bucketing (daily access trends) is therefore UTC too.
//!
//! 3. **Check outcomes are data, not errors.** A `Fail` result is a normal
//!    value in `ValidationCheckResult`. `Verdict::from_results` is the only
//!    place the overall pass/fail rule lives.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `cv-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod access;
pub mod check;
pub mod dataset;
pub mod error;
pub mod identity;
pub mod policy;
pub mod temporal;

pub use access::{AccessAction, AccessLogEntry, NewAccessLog};
pub use check::{
    CheckCategory, CheckOutcome, ValidationCheckResult, ValidationOutcome, ValidationRecord,
    Verdict,
};
pub use dataset::{DatasetRecord, NewDataset, ValidationStatus};
pub use error::{CoreError, InputError, StateError};
pub use identity::{AccessLogId, DatasetId, PolicyId, SessionId, UserId, ValidationRecordId};
pub use policy::CompliancePolicy;
pub use temporal::Timestamp;
