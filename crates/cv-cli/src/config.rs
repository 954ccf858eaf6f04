//! CLI configuration.
//!
//! Runner timing and report sizing come from environment variables; absent
//! variables take defaults. Policies can be replaced from a YAML file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use cv_core::CompliancePolicy;
use cv_metrics::ReportOptions;
use cv_validation::RunnerConfig;

/// Settings shared by every subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CliConfig {
    pub runner: RunnerConfig,
    pub report: ReportOptions,
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `CAREVAULT_UPLOAD_LATENCY_MS` (default: 1500)
    /// - `CAREVAULT_CHECK_LATENCY_MS` (default: 800)
    /// - `CAREVAULT_MAX_UPLOAD_ATTEMPTS` (default: 3)
    /// - `CAREVAULT_RETRY_BACKOFF_MS` (default: 500)
    /// - `CAREVAULT_TREND_WINDOW_DAYS` (default: 7)
    /// - `CAREVAULT_TOP_ACTORS` (default: 10)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let millis = |var: &str, default: Duration| -> Result<Duration, ConfigError> {
            Ok(env_number(&lookup, var)?.map_or(default, Duration::from_millis))
        };

        let runner = RunnerConfig {
            upload_latency: millis("CAREVAULT_UPLOAD_LATENCY_MS", defaults.runner.upload_latency)?,
            check_latency: millis("CAREVAULT_CHECK_LATENCY_MS", defaults.runner.check_latency)?,
            max_upload_attempts: match env_number(&lookup, "CAREVAULT_MAX_UPLOAD_ATTEMPTS")? {
                Some(0) => {
                    return Err(ConfigError::OutOfRange {
                        var: "CAREVAULT_MAX_UPLOAD_ATTEMPTS".to_string(),
                        reason: "must be at least 1".to_string(),
                    })
                }
                Some(n) => u32::try_from(n).map_err(|_| ConfigError::OutOfRange {
                    var: "CAREVAULT_MAX_UPLOAD_ATTEMPTS".to_string(),
                    reason: format!("{n} does not fit in 32 bits"),
                })?,
                None => defaults.runner.max_upload_attempts,
            },
            retry_backoff: millis("CAREVAULT_RETRY_BACKOFF_MS", defaults.runner.retry_backoff)?,
        };

        let report = ReportOptions {
            trend_window_days: env_number(&lookup, "CAREVAULT_TREND_WINDOW_DAYS")?
                .map_or(defaults.report.trend_window_days, |n| n as usize),
            top_actors: env_number(&lookup, "CAREVAULT_TOP_ACTORS")?
                .map_or(defaults.report.top_actors, |n| n as usize),
            ..defaults.report
        };

        Ok(Self { runner, report })
    }
}

fn env_number(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &str,
) -> Result<Option<u64>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber {
                var: var.to_string(),
                value: raw,
            }),
    }
}

/// Read a YAML list of policies.
pub fn load_policies(path: &Path) -> Result<Vec<CompliancePolicy>, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::PolicyFileRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_policies(&raw).map_err(|source| ConfigError::PolicyFileParse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_policies(raw: &str) -> Result<Vec<CompliancePolicy>, serde_yaml::Error> {
    serde_yaml::from_str(raw)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber { var: String, value: String },
    #[error("{var} out of range: {reason}")]
    OutOfRange { var: String, reason: String },
    #[error("cannot read policy file {}: {source}", path.display())]
    PolicyFileRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid policy file {}: {source}", path.display())]
    PolicyFileParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = CliConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.runner.upload_latency, Duration::from_millis(1500));
        assert_eq!(cfg.runner.check_latency, Duration::from_millis(800));
        assert_eq!(cfg.runner.max_upload_attempts, 3);
        assert_eq!(cfg.report.trend_window_days, 7);
        assert_eq!(cfg.report.top_actors, 10);
        assert_eq!(cfg, CliConfig::default());
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = CliConfig::from_lookup(lookup(&[
            ("CAREVAULT_UPLOAD_LATENCY_MS", "0"),
            ("CAREVAULT_CHECK_LATENCY_MS", " 25 "),
            ("CAREVAULT_MAX_UPLOAD_ATTEMPTS", "5"),
            ("CAREVAULT_TREND_WINDOW_DAYS", "30"),
            ("CAREVAULT_TOP_ACTORS", "3"),
        ]))
        .unwrap();
        assert_eq!(cfg.runner.upload_latency, Duration::ZERO);
        assert_eq!(cfg.runner.check_latency, Duration::from_millis(25));
        assert_eq!(cfg.runner.max_upload_attempts, 5);
        assert_eq!(cfg.report.trend_window_days, 30);
        assert_eq!(cfg.report.top_actors, 3);
        assert_eq!(cfg.report.recent_activity, 10);
    }

    #[test]
    fn garbage_is_an_error() {
        let err = CliConfig::from_lookup(lookup(&[("CAREVAULT_TOP_ACTORS", "ten")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { ref var, .. } if var == "CAREVAULT_TOP_ACTORS"));

        let err = CliConfig::from_lookup(lookup(&[("CAREVAULT_MAX_UPLOAD_ATTEMPTS", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { .. }));
    }

    #[test]
    fn policy_yaml_defaults_to_active() {
        let policies = parse_policies(
            "- id: 4\n  name: Minimum Necessary Standard\n  policy_type: HIPAA\n  description: Limit PHI to the minimum necessary\n- id: 5\n  name: Audit Trail Retention\n  policy_type: HIPAA\n  description: Keep access logs for six years\n  is_active: false\n",
        )
        .unwrap();
        assert_eq!(policies.len(), 2);
        assert!(policies[0].is_active);
        assert!(!policies[1].is_active);
        assert_eq!(policies[0].id.get(), 4);
    }

    #[test]
    fn missing_policy_file_is_reported() {
        let err = load_policies(Path::new("/nonexistent/policies.yaml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/policies.yaml"));
    }
}
