//! # Dataset Checks
//!
//! A check inspects an uploaded file and returns a [`CheckVerdict`]. A
//! [`CheckSuite`] is the ordered list a runner executes. Every check in the
//! suite runs, even after a `Fail`, so each run yields one result per check.
//!
//! Checks can be bound to compliance policies through a [`CheckRegistry`],
//! keyed by policy name. [`CheckSuite::for_policies`] builds one check per
//! active policy and substitutes a `Warning` placeholder when no check is
//! registered, so an unenforced policy is visible rather than silently
//! skipped.

use std::collections::HashMap;
use std::sync::Arc;

use cv_core::{CheckCategory, CheckOutcome, CompliancePolicy, PolicyId, ValidationCheckResult};

use crate::session::UploadFile;

/// What one check concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckVerdict {
    pub outcome: CheckOutcome,
    pub details: String,
}

impl CheckVerdict {
    pub fn pass(details: impl Into<String>) -> Self {
        Self {
            outcome: CheckOutcome::Pass,
            details: details.into(),
        }
    }

    pub fn fail(details: impl Into<String>) -> Self {
        Self {
            outcome: CheckOutcome::Fail,
            details: details.into(),
        }
    }

    pub fn warning(details: impl Into<String>) -> Self {
        Self {
            outcome: CheckOutcome::Warning,
            details: details.into(),
        }
    }
}

/// A single compliance check.
pub trait DatasetCheck: Send + Sync {
    /// Display name, e.g. "PHI Identifier Check".
    fn name(&self) -> &str;

    fn category(&self) -> CheckCategory;

    /// Inspect the file. Must not panic; a failing file is a `Fail` verdict.
    fn inspect(&self, file: &UploadFile) -> CheckVerdict;

    /// Run the check and package its result.
    fn run(&self, file: &UploadFile) -> ValidationCheckResult {
        let verdict = self.inspect(file);
        ValidationCheckResult::new(self.name(), self.category(), verdict.outcome, verdict.details)
    }
}

/// A check with a fixed verdict, independent of the file.
#[derive(Debug, Clone)]
pub struct SimulatedCheck {
    name: String,
    category: CheckCategory,
    verdict: CheckVerdict,
}

impl SimulatedCheck {
    pub fn new(name: impl Into<String>, category: CheckCategory, verdict: CheckVerdict) -> Self {
        Self {
            name: name.into(),
            category,
            verdict,
        }
    }

    pub fn phi_identifiers() -> Self {
        Self::new(
            "PHI Identifier Check",
            CheckCategory::Phi,
            CheckVerdict::pass("All 18 HIPAA identifiers properly masked or encrypted"),
        )
    }

    pub fn encryption() -> Self {
        Self::new(
            "Data Encryption Validation",
            CheckCategory::Encryption,
            CheckVerdict::pass("AES-256 encryption confirmed on sensitive fields"),
        )
    }

    pub fn access_control() -> Self {
        Self::new(
            "Access Control Check",
            CheckCategory::AccessControl,
            CheckVerdict::pass("Proper role-based access control configured"),
        )
    }

    pub fn null_values() -> Self {
        Self::new(
            "Null Value Check",
            CheckCategory::DataQuality,
            CheckVerdict::warning("23 null values found in optional fields"),
        )
    }

    /// Stand-in for a policy that has no registered check.
    fn unenforced(policy: &CompliancePolicy) -> Self {
        Self::new(
            policy.name.clone(),
            CheckCategory::Other,
            CheckVerdict::warning(format!(
                "no check registered for {} policy \"{}\"",
                policy.policy_type, policy.name
            )),
        )
    }
}

impl DatasetCheck for SimulatedCheck {
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> CheckCategory {
        self.category
    }

    fn inspect(&self, _file: &UploadFile) -> CheckVerdict {
        self.verdict.clone()
    }
}

// ─── Registry ────────────────────────────────────────────────────────

/// Checks available for policy enforcement, keyed by policy name.
#[derive(Clone, Default)]
pub struct CheckRegistry {
    checks: HashMap<String, Arc<dyn DatasetCheck>>,
}

impl CheckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The simulated checks bound to the three standard HIPAA policies.
    pub fn simulated() -> Self {
        let mut registry = Self::new();
        registry.register("HIPAA PHI Masking", SimulatedCheck::phi_identifiers());
        registry.register("Data Encryption at Rest", SimulatedCheck::encryption());
        registry.register("Access Control Validation", SimulatedCheck::access_control());
        registry
    }

    /// Bind `check` to the policy named `policy_name`, replacing any earlier binding.
    pub fn register(&mut self, policy_name: impl Into<String>, check: impl DatasetCheck + 'static) {
        self.checks.insert(policy_name.into(), Arc::new(check));
    }

    pub fn get(&self, policy_name: &str) -> Option<Arc<dyn DatasetCheck>> {
        self.checks.get(policy_name).cloned()
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

impl std::fmt::Debug for CheckRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.checks.keys().collect();
        names.sort();
        f.debug_struct("CheckRegistry").field("policies", &names).finish()
    }
}

// ─── Suite ───────────────────────────────────────────────────────────

/// One suite slot: a check and the policy it enforces, if any.
#[derive(Clone)]
pub struct SuiteEntry {
    pub policy_id: Option<PolicyId>,
    pub check: Arc<dyn DatasetCheck>,
}

/// Ordered checks for one validation run.
#[derive(Clone, Default)]
pub struct CheckSuite {
    entries: Vec<SuiteEntry>,
}

impl CheckSuite {
    pub fn new() -> Self {
        Self::default()
    }

    /// The four fixed checks shown by the upload form: three passes and a
    /// null-value warning.
    pub fn simulated() -> Self {
        let mut suite = Self::new();
        suite.push(SimulatedCheck::phi_identifiers());
        suite.push(SimulatedCheck::encryption());
        suite.push(SimulatedCheck::access_control());
        suite.push(SimulatedCheck::null_values());
        suite
    }

    /// One check per active policy, in policy order.
    pub fn for_policies(policies: &[CompliancePolicy], registry: &CheckRegistry) -> Self {
        let entries = policies
            .iter()
            .filter(|p| p.is_active)
            .map(|policy| SuiteEntry {
                policy_id: Some(policy.id),
                check: registry
                    .get(&policy.name)
                    .unwrap_or_else(|| Arc::new(SimulatedCheck::unenforced(policy))),
            })
            .collect();
        Self { entries }
    }

    /// Append a check not tied to a policy.
    pub fn push(&mut self, check: impl DatasetCheck + 'static) {
        self.entries.push(SuiteEntry {
            policy_id: None,
            check: Arc::new(check),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[SuiteEntry] {
        &self.entries
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.check.name()).collect()
    }
}

impl std::fmt::Debug for CheckSuite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckSuite")
            .field("checks", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(id: u64, name: &str, active: bool) -> CompliancePolicy {
        CompliancePolicy {
            id: PolicyId(id),
            name: name.into(),
            policy_type: "HIPAA".into(),
            description: String::new(),
            is_active: active,
        }
    }

    #[test]
    fn simulated_suite_matches_upload_form() {
        let suite = CheckSuite::simulated();
        assert_eq!(
            suite.names(),
            [
                "PHI Identifier Check",
                "Data Encryption Validation",
                "Access Control Check",
                "Null Value Check"
            ]
        );
        let file = UploadFile::new("x.csv", 10);
        let outcomes: Vec<CheckOutcome> = suite
            .entries()
            .iter()
            .map(|e| e.check.run(&file).result)
            .collect();
        assert_eq!(
            outcomes,
            [
                CheckOutcome::Pass,
                CheckOutcome::Pass,
                CheckOutcome::Pass,
                CheckOutcome::Warning
            ]
        );
    }

    #[test]
    fn policy_suite_skips_inactive_and_flags_unregistered() {
        let policies = vec![
            policy(1, "HIPAA PHI Masking", true),
            policy(2, "Data Encryption at Rest", false),
            policy(4, "Minimum Necessary Standard", true),
        ];
        let suite = CheckSuite::for_policies(&policies, &CheckRegistry::simulated());
        assert_eq!(suite.len(), 2);
        assert_eq!(suite.entries()[0].policy_id, Some(PolicyId(1)));
        assert_eq!(suite.names()[0], "PHI Identifier Check");

        let placeholder = suite.entries()[1].check.run(&UploadFile::new("x.csv", 1));
        assert_eq!(placeholder.check_name, "Minimum Necessary Standard");
        assert_eq!(placeholder.result, CheckOutcome::Warning);
        assert_eq!(suite.entries()[1].policy_id, Some(PolicyId(4)));
    }

    #[test]
    fn registry_replaces_bindings() {
        let mut registry = CheckRegistry::simulated();
        assert_eq!(registry.len(), 3);
        registry.register(
            "HIPAA PHI Masking",
            SimulatedCheck::new("Strict PHI", CheckCategory::Phi, CheckVerdict::fail("ssn")),
        );
        assert_eq!(registry.len(), 3);
        let check = registry.get("HIPAA PHI Masking").unwrap();
        assert_eq!(check.name(), "Strict PHI");
        assert!(registry.get("unknown").is_none());
    }
}
