//! # Aggregations
//!
//! Each function takes a slice and returns a fresh value.
//!
//! ## Decisions
//!
//! - Rates over an empty collection are `0.0`.
//! - Daily buckets use the UTC calendar date of the entry timestamp.
//! - The daily series does not synthesize zero-count days: a date with no
//!   events is absent, so "the last 7 buckets" can span more than 7
//!   calendar days.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use cv_core::{AccessAction, AccessLogEntry, DatasetRecord, ValidationStatus};

use crate::tally::Tally;

/// Roles the compliance report always lists, even at zero.
pub const STANDARD_ROLES: [&str; 3] = ["Researcher", "Data Manager", "Security Officer"];

/// Dataset counts per validation status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    /// Datasets that passed validation.
    pub passed: usize,
    /// Datasets that failed validation.
    pub failed: usize,
    /// Datasets not yet validated.
    pub pending: usize,
}

impl StatusCounts {
    /// The count for one status.
    pub fn get(&self, status: ValidationStatus) -> usize {
        match status {
            ValidationStatus::Passed => self.passed,
            ValidationStatus::Failed => self.failed,
            ValidationStatus::Pending => self.pending,
        }
    }

    /// Sum over all statuses.
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.pending
    }
}

/// Number of access events on one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    /// UTC calendar date.
    pub date: NaiveDate,
    /// Events on that date.
    pub count: usize,
}

/// `value` rounded to `decimals` places.
fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

/// `count / total * 100`, rounded to `decimals` places. Zero when `total` is zero.
pub fn percent_of(count: usize, total: usize, decimals: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_to(count as f64 / total as f64 * 100.0, decimals)
}

/// Count datasets per validation status. Statuses that never occur report 0.
pub fn count_by_status(datasets: &[DatasetRecord]) -> StatusCounts {
    datasets
        .iter()
        .fold(StatusCounts::default(), |mut counts, d| {
            match d.validation_status {
                ValidationStatus::Passed => counts.passed += 1,
                ValidationStatus::Failed => counts.failed += 1,
                ValidationStatus::Pending => counts.pending += 1,
            }
            counts
        })
}

/// Percentage of datasets that passed, to one decimal. `0.0` when empty.
pub fn compliance_rate(datasets: &[DatasetRecord]) -> f64 {
    percent_of(count_by_status(datasets).passed, datasets.len(), 1)
}

/// Percentage of datasets with PHI masked, to one decimal. `0.0` when empty.
pub fn masking_rate(datasets: &[DatasetRecord]) -> f64 {
    let masked = datasets.iter().filter(|d| d.pii_masked).count();
    percent_of(masked, datasets.len(), 1)
}

/// Sum of `record_count` over all datasets.
pub fn total_records(datasets: &[DatasetRecord]) -> u64 {
    datasets.iter().map(|d| d.record_count).sum()
}

/// Number of distinct user ids in the log.
pub fn unique_actor_count(logs: &[AccessLogEntry]) -> usize {
    logs.iter().map(|l| l.user_id).collect::<HashSet<_>>().len()
}

/// How often each action occurs.
pub fn action_frequency(logs: &[AccessLogEntry]) -> Tally<AccessAction> {
    logs.iter().map(|l| l.action.clone()).collect()
}

/// Events per UTC calendar date, ascending, keeping the most recent
/// `window_days` non-empty dates.
pub fn daily_access_series(logs: &[AccessLogEntry], window_days: usize) -> Vec<DailyCount> {
    let mut by_date: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for log in logs {
        *by_date.entry(log.timestamp.date()).or_insert(0) += 1;
    }
    let skip = by_date.len().saturating_sub(window_days);
    by_date
        .into_iter()
        .skip(skip)
        .map(|(date, count)| DailyCount { date, count })
        .collect()
}

/// The `limit` most active users by name, count descending, ties in
/// first-encounter order.
pub fn top_actors(logs: &[AccessLogEntry], limit: usize) -> Vec<(String, usize)> {
    let tally: Tally<String> = logs.iter().map(|l| l.user_name.clone()).collect();
    let mut ranked = tally.ranked();
    ranked.truncate(limit);
    ranked
}

/// Events per role for the given roles, in the given order.
pub fn role_breakdown(logs: &[AccessLogEntry], roles: &[&str]) -> Vec<(String, usize)> {
    let tally: Tally<&str> = logs.iter().map(|l| l.user_role.as_str()).collect();
    roles
        .iter()
        .map(|role| (role.to_string(), tally.get(role)))
        .collect()
}
