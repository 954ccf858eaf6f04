//! # Dashboard and Report Summaries
//!
//! Snapshot structs assembled from the aggregations in [`crate::aggregate`].
//! They hold owned data and serialize directly to the JSON the CLI prints.

use serde::{Deserialize, Serialize};

use cv_core::{AccessLogEntry, DatasetRecord, ValidationStatus};

use crate::aggregate::{
    action_frequency, compliance_rate, count_by_status, daily_access_series, masking_rate,
    percent_of, role_breakdown, top_actors, total_records, unique_actor_count, DailyCount,
    StatusCounts, STANDARD_ROLES,
};

/// Entries shown in the dashboard's recent-activity card.
const DASHBOARD_RECENT_ACTIVITY: usize = 5;

/// A labelled count with its whole-number share of a total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Share {
    pub label: String,
    pub count: usize,
    pub percent: f64,
}

impl Share {
    fn of(label: impl Into<String>, count: usize, total: usize) -> Self {
        Self {
            label: label.into(),
            count,
            percent: percent_of(count, total, 0),
        }
    }
}

/// Knobs for [`ComplianceReport::build`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Number of daily buckets in the access trend.
    pub trend_window_days: usize,
    /// Maximum entries in the top-actor list.
    pub top_actors: usize,
    /// Maximum entries in the recent-activity list.
    pub recent_activity: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            trend_window_days: 7,
            top_actors: 10,
            recent_activity: 10,
        }
    }
}

/// Newest-first copy of at most `limit` entries. Equal timestamps keep log order.
fn most_recent(logs: &[AccessLogEntry], limit: usize) -> Vec<AccessLogEntry> {
    let mut sorted: Vec<&AccessLogEntry> = logs.iter().collect();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    sorted.into_iter().take(limit).cloned().collect()
}

/// The landing-page cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_datasets: usize,
    pub status: StatusCounts,
    pub total_records: u64,
    /// Passed share rounded to a whole percent.
    pub compliance_percent: f64,
    pub recent_activity: Vec<AccessLogEntry>,
}

impl DashboardSummary {
    pub fn from_collections(datasets: &[DatasetRecord], logs: &[AccessLogEntry]) -> Self {
        let status = count_by_status(datasets);
        Self {
            total_datasets: datasets.len(),
            status,
            total_records: total_records(datasets),
            compliance_percent: percent_of(status.passed, datasets.len(), 0),
            recent_activity: most_recent(logs, DASHBOARD_RECENT_ACTIVITY),
        }
    }
}

/// The full compliance report.
///
/// Dataset rates carry one decimal. Breakdown shares are whole percents of
/// their own total (datasets for status, actions for action and role).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub total_datasets: usize,
    pub compliance_rate: f64,
    pub masking_rate: f64,
    pub masked_datasets: usize,
    pub total_records: u64,
    pub status_breakdown: Vec<Share>,
    pub unique_users: usize,
    pub total_actions: usize,
    pub action_breakdown: Vec<Share>,
    pub role_breakdown: Vec<Share>,
    pub top_actors: Vec<Share>,
    pub access_trend: Vec<DailyCount>,
    pub recent_activity: Vec<AccessLogEntry>,
}

impl ComplianceReport {
    pub fn build(
        datasets: &[DatasetRecord],
        logs: &[AccessLogEntry],
        options: ReportOptions,
    ) -> Self {
        let total_datasets = datasets.len();
        let total_actions = logs.len();
        let status = count_by_status(datasets);

        let status_breakdown = ValidationStatus::ALL
            .iter()
            .map(|s| Share::of(s.as_str(), status.get(*s), total_datasets))
            .collect();

        let action_breakdown = action_frequency(logs)
            .ranked()
            .into_iter()
            .map(|(action, n)| Share::of(action.as_str(), n, total_actions))
            .collect();

        let role_breakdown = role_breakdown(logs, &STANDARD_ROLES)
            .into_iter()
            .map(|(role, n)| Share::of(role, n, total_actions))
            .collect();

        let top_actors = top_actors(logs, options.top_actors)
            .into_iter()
            .map(|(name, n)| Share::of(name, n, total_actions))
            .collect();

        Self {
            total_datasets,
            compliance_rate: compliance_rate(datasets),
            masking_rate: masking_rate(datasets),
            masked_datasets: datasets.iter().filter(|d| d.pii_masked).count(),
            total_records: total_records(datasets),
            status_breakdown,
            unique_users: unique_actor_count(logs),
            total_actions,
            action_breakdown,
            role_breakdown,
            top_actors,
            access_trend: daily_access_series(logs, options.trend_window_days),
            recent_activity: most_recent(logs, options.recent_activity),
        }
    }
}
