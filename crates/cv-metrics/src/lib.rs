//! # cv-metrics: Metrics Aggregator
//!
//! Pure functions over dataset and access-log collections producing every
//! number the dashboard and compliance report show. No hidden state, no
//! I/O. Calling any function twice on the same input gives the same output.
//!
//! ## Modules
//!
//! - **Tally** (`tally.rs`): insertion-ordered counter with a stable
//!   ranked view (count descending, ties by first encounter).
//! - **Aggregate** (`aggregate.rs`): status counts, compliance/masking
//!   rates, record totals, distinct actors, action frequency, daily access
//!   series, top actors, role breakdown.
//! - **Filter** (`filter.rs`): dataset search and access-log filters.
//! - **Summary** (`summary.rs`): `DashboardSummary` and `ComplianceReport`.
//!
//! ## Empty Collections
//!
//! Every rate over an empty collection is `0.0`, never `NaN`.

pub mod aggregate;
pub mod filter;
pub mod summary;
pub mod tally;

pub use aggregate::{
    action_frequency, compliance_rate, count_by_status, daily_access_series, masking_rate,
    percent_of, role_breakdown, top_actors, total_records, unique_actor_count, DailyCount,
    StatusCounts, STANDARD_ROLES,
};
pub use filter::{filter_datasets, LogFilter};
pub use summary::{ComplianceReport, DashboardSummary, ReportOptions, Share};
pub use tally::Tally;
