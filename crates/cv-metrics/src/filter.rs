//! # List Filters
//!
//! Substring search over datasets and access logs.

use serde::{Deserialize, Serialize};

use cv_core::{AccessAction, AccessLogEntry, DatasetRecord};

/// Datasets whose name or owner contains `term`, case-insensitively.
/// An empty term matches everything.
pub fn filter_datasets<'a>(datasets: &'a [DatasetRecord], term: &str) -> Vec<&'a DatasetRecord> {
    datasets.iter().filter(|d| d.matches_search(term)).collect()
}

/// Access-log filter. Every populated field must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFilter {
    /// Case-insensitive match on user or dataset name; verbatim match on IP.
    pub search: Option<String>,
    /// Exact action.
    pub action: Option<AccessAction>,
    /// Exact role.
    pub role: Option<String>,
}

impl LogFilter {
    /// Whether `entry` passes the filter.
    pub fn matches(&self, entry: &AccessLogEntry) -> bool {
        let search_ok = self.search.as_deref().map_or(true, |term| {
            let needle = term.to_lowercase();
            entry.user_name.to_lowercase().contains(&needle)
                || entry.dataset_name.to_lowercase().contains(&needle)
                || entry.ip_address.contains(term)
        });
        let action_ok = self.action.as_ref().map_or(true, |a| *a == entry.action);
        let role_ok = self.role.as_deref().map_or(true, |r| r == entry.user_role);
        search_ok && action_ok && role_ok
    }

    /// Entries passing the filter, in log order.
    pub fn apply<'a>(&self, logs: &'a [AccessLogEntry]) -> Vec<&'a AccessLogEntry> {
        logs.iter().filter(|l| self.matches(l)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cv_core::{AccessLogId, DatasetId, Timestamp, UserId, ValidationStatus};

    fn entry(user: &str, role: &str, action: AccessAction, dataset: &str, ip: &str) -> AccessLogEntry {
        AccessLogEntry {
            id: AccessLogId(1),
            user_id: UserId(1),
            user_name: user.into(),
            user_role: role.into(),
            action,
            dataset_id: DatasetId(1),
            dataset_name: dataset.into(),
            timestamp: Timestamp::parse("2025-03-15T11:00:00Z").unwrap(),
            ip_address: ip.into(),
            success: true,
        }
    }

    fn logs() -> Vec<AccessLogEntry> {
        vec![
            entry("Dr. Sarah Chen", "Researcher", AccessAction::View, "Patient Demographics Q1 2025", "192.168.1.45"),
            entry("Jane Smith", "Data Manager", AccessAction::Validate, "Lab Results Dataset", "192.168.1.89"),
            entry("Robert Johnson", "Security Officer", AccessAction::Audit, "Patient Demographics Q1 2025", "192.168.1.12"),
        ]
    }

    #[test]
    fn default_filter_matches_everything() {
        assert_eq!(LogFilter::default().apply(&logs()).len(), 3);
    }

    #[test]
    fn search_covers_user_dataset_and_ip() {
        let logs = logs();
        let by = |term: &str| {
            LogFilter {
                search: Some(term.into()),
                ..LogFilter::default()
            }
            .apply(&logs)
            .len()
        };
        assert_eq!(by("jane"), 1);
        assert_eq!(by("DEMOGRAPHICS"), 2);
        assert_eq!(by("1.12"), 1);
        assert_eq!(by("nobody"), 0);
    }

    #[test]
    fn filters_combine() {
        let logs = logs();
        let filter = LogFilter {
            search: Some("patient".into()),
            action: Some(AccessAction::Audit),
            role: Some("Security Officer".into()),
        };
        let hits = filter.apply(&logs);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].user_name, "Robert Johnson");

        let wrong_role = LogFilter {
            role: Some("Researcher".into()),
            ..filter
        };
        assert!(wrong_role.apply(&logs).is_empty());
    }

    #[test]
    fn dataset_search() {
        let d = DatasetRecord {
            id: DatasetId(6),
            name: "Genomic Research Data".into(),
            owner_id: UserId(105),
            owner_name: "Dr. Lisa Anderson".into(),
            created_at: Timestamp::parse("2025-03-05T12:00:00Z").unwrap(),
            validation_status: ValidationStatus::Passed,
            pii_masked: true,
            file_size_kb: 8192,
            record_count: 5600,
            error_message: None,
        };
        let all = vec![d];
        assert_eq!(filter_datasets(&all, "anderson").len(), 1);
        assert_eq!(filter_datasets(&all, "").len(), 1);
        assert!(filter_datasets(&all, "imaging").is_empty());
    }
}
