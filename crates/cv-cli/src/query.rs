//! # Read-Only Subcommands
//!
//! `dashboard`, `report`, `datasets`, `logs`, `policies` and `history`.
//! Each handler builds a serializable view from the repository; `main`
//! prints it.

use clap::Args;
use serde::Serialize;

use cv_core::{
    AccessAction, AccessLogEntry, CompliancePolicy, DatasetId, DatasetRecord, ValidationRecord,
    ValidationStatus,
};
use cv_metrics::{filter_datasets, ComplianceReport, DashboardSummary, LogFilter, ReportOptions};
use cv_store::Repository;

use crate::context::AppContext;

/// Arguments for the report subcommand.
#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    /// Daily buckets in the access trend.
    #[arg(long)]
    pub trend_days: Option<usize>,

    /// Entries in the top-actor list.
    #[arg(long)]
    pub top: Option<usize>,
}

/// Arguments for the datasets subcommand.
#[derive(Args, Debug, Default)]
pub struct DatasetsArgs {
    /// Case-insensitive substring of dataset or owner name.
    #[arg(long, default_value = "")]
    pub search: String,

    /// Only datasets with this status (passed, failed, pending).
    #[arg(long, value_parser = parse_status)]
    pub status: Option<ValidationStatus>,
}

/// Arguments for the logs subcommand.
#[derive(Args, Debug, Default)]
pub struct LogsArgs {
    /// Substring of user name, dataset name or IP address.
    #[arg(long)]
    pub search: Option<String>,

    /// Only this action (view, upload, download, validate, audit, ...).
    #[arg(long, value_parser = parse_action)]
    pub action: Option<AccessAction>,

    /// Only this role, e.g. "Security Officer".
    #[arg(long)]
    pub role: Option<String>,
}

/// Arguments for the history subcommand.
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Numeric dataset identifier.
    pub dataset_id: u64,
}

fn parse_status(raw: &str) -> Result<ValidationStatus, String> {
    ValidationStatus::ALL
        .into_iter()
        .find(|s| s.as_str().eq_ignore_ascii_case(raw))
        .ok_or_else(|| format!("unknown status {raw:?}; expected passed, failed or pending"))
}

fn parse_action(raw: &str) -> Result<AccessAction, std::convert::Infallible> {
    Ok(AccessAction::parse(&raw.to_ascii_uppercase()))
}

pub fn dashboard(ctx: &AppContext) -> DashboardSummary {
    let repo = &ctx.repository;
    DashboardSummary::from_collections(&repo.list_datasets(), &repo.list_access_logs())
}

pub fn report(ctx: &AppContext, args: &ReportArgs) -> ComplianceReport {
    let options = ReportOptions {
        trend_window_days: args.trend_days.unwrap_or(ctx.config.report.trend_window_days),
        top_actors: args.top.unwrap_or(ctx.config.report.top_actors),
        ..ctx.config.report
    };
    let repo = &ctx.repository;
    ComplianceReport::build(&repo.list_datasets(), &repo.list_access_logs(), options)
}

pub fn datasets(ctx: &AppContext, args: &DatasetsArgs) -> Vec<DatasetRecord> {
    let all = ctx.repository.list_datasets();
    filter_datasets(&all, &args.search)
        .into_iter()
        .filter(|d| args.status.map_or(true, |s| d.validation_status == s))
        .cloned()
        .collect()
}

pub fn logs(ctx: &AppContext, args: &LogsArgs) -> Vec<AccessLogEntry> {
    let filter = LogFilter {
        search: args.search.clone(),
        action: args.action.clone(),
        role: args.role.clone(),
    };
    let all = ctx.repository.list_access_logs();
    filter.apply(&all).into_iter().cloned().collect()
}

pub fn policies(ctx: &AppContext) -> Vec<CompliancePolicy> {
    ctx.repository.list_policies()
}

/// A dataset with every persisted check result.
#[derive(Debug, Serialize)]
pub struct DatasetHistory {
    pub dataset: DatasetRecord,
    pub checks: Vec<ValidationRecord>,
}

pub fn history(ctx: &AppContext, args: &HistoryArgs) -> anyhow::Result<DatasetHistory> {
    let id = DatasetId(args.dataset_id);
    let dataset = ctx
        .repository
        .get_dataset(id)
        .ok_or_else(|| anyhow::anyhow!("{id} not found"))?;
    Ok(DatasetHistory {
        checks: ctx.repository.validation_results(id),
        dataset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_reflects_seed() {
        let summary = dashboard(&AppContext::seeded());
        assert_eq!(summary.total_datasets, 8);
        assert_eq!(summary.status.passed, 5);
        assert_eq!(summary.compliance_percent, 63.0);
        assert_eq!(summary.recent_activity.len(), 5);
        assert_eq!(summary.recent_activity[0].user_name, "Robert Johnson");
    }

    #[test]
    fn report_overrides_config() {
        let ctx = AppContext::seeded();
        let report = report(
            &ctx,
            &ReportArgs {
                trend_days: None,
                top: Some(2),
            },
        );
        assert_eq!(report.compliance_rate, 62.5);
        assert_eq!(report.unique_users, 4);
        assert_eq!(report.top_actors.len(), 2);
        assert_eq!(report.top_actors[0].label, "Dr. Sarah Chen");
    }

    #[test]
    fn datasets_by_search_and_status() {
        let ctx = AppContext::seeded();
        let hits = datasets(
            &ctx,
            &DatasetsArgs {
                search: "patient".into(),
                status: Some(ValidationStatus::Failed),
            },
        );
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Patient Survey Responses");
        assert_eq!(datasets(&ctx, &DatasetsArgs::default()).len(), 8);
    }

    #[test]
    fn status_and_action_parsers() {
        assert_eq!(parse_status("FAILED").unwrap(), ValidationStatus::Failed);
        assert!(parse_status("done").is_err());
        assert_eq!(parse_action("audit").unwrap(), AccessAction::Audit);
    }

    #[test]
    fn logs_by_action() {
        let ctx = AppContext::seeded();
        let hits = logs(
            &ctx,
            &LogsArgs {
                action: Some(AccessAction::Audit),
                ..LogsArgs::default()
            },
        );
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].user_role, "Security Officer");
    }

    #[test]
    fn history_of_failed_dataset() {
        let ctx = AppContext::seeded();
        let h = history(&ctx, &HistoryArgs { dataset_id: 3 }).unwrap();
        assert_eq!(h.dataset.validation_status, ValidationStatus::Failed);
        assert_eq!(h.checks.len(), 2);
        assert!(history(&ctx, &HistoryArgs { dataset_id: 99 }).is_err());
    }
}
