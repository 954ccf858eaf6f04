//! # cv-cli: CareVault Command-Line Interface
//!
//! Every invocation seeds a fresh in-memory repository, so uploads are not
//! persisted between runs. Output is pretty-printed JSON on stdout; logs
//! go to stderr.
//!
//! ## Subcommands
//!
//! - `dashboard`: status counts, record total, compliance rate, recent activity
//! - `report`: the full compliance report
//! - `datasets`: dataset search
//! - `logs`: access-log search
//! - `policies`: configured compliance policies
//! - `history`: persisted check results for one dataset
//! - `upload`: simulated upload and validation
//!
//! ## Crate Policy
//!
//! - Argument parsing lives here; computation lives in the domain crates.

pub mod config;
pub mod context;
pub mod query;
pub mod upload;
