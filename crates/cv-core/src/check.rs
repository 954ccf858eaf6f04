//! # Validation Check Results and Verdicts
//!
//! A validation run produces one [`ValidationCheckResult`] per check, in
//! check order. The overall [`Verdict`] is `Failed` if and only if at least
//! one result is [`CheckOutcome::Fail`]; `Warning` never fails a run.

use serde::{Deserialize, Serialize};

use crate::identity::{DatasetId, PolicyId, ValidationRecordId};
use crate::temporal::Timestamp;

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckOutcome {
    /// The check passed.
    Pass,
    /// The check failed. Fails the whole run.
    Fail,
    /// The check raised a concern that does not fail the run.
    Warning,
}

impl CheckOutcome {
    /// Return the string value for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "Pass",
            Self::Fail => "Fail",
            Self::Warning => "Warning",
        }
    }
}

impl std::fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a check inspects. PHI checks drive the `pii_masked` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckCategory {
    /// Protected Health Information identifiers.
    Phi,
    /// Encryption of sensitive fields.
    Encryption,
    /// Role-based access control.
    AccessControl,
    /// Data quality (nulls, formats).
    DataQuality,
    /// Anything else.
    Other,
}

/// Result of one named check within a validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationCheckResult {
    /// Check name, e.g. "PHI Identifier Check".
    pub check_name: String,
    /// What the check inspects.
    pub category: CheckCategory,
    /// Pass, Fail or Warning.
    pub result: CheckOutcome,
    /// Human-readable explanation.
    pub details: String,
}

impl ValidationCheckResult {
    /// Build a check result.
    pub fn new(
        check_name: impl Into<String>,
        category: CheckCategory,
        result: CheckOutcome,
        details: impl Into<String>,
    ) -> Self {
        Self {
            check_name: check_name.into(),
            category,
            result,
            details: details.into(),
        }
    }

    /// Whether this result fails the run.
    pub fn is_failure(&self) -> bool {
        self.result == CheckOutcome::Fail
    }
}

/// Terminal status of a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// No check failed.
    Passed,
    /// At least one check failed.
    Failed,
}

impl Verdict {
    /// Derive the verdict from a set of results.
    ///
    /// `Failed` iff any result is `Fail`. An empty set is `Passed`.
    pub fn from_results<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a ValidationCheckResult>,
    {
        if results.into_iter().any(ValidationCheckResult::is_failure) {
            Self::Failed
        } else {
            Self::Passed
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Passed => f.write_str("PASSED"),
            Self::Failed => f.write_str("FAILED"),
        }
    }
}

/// The full output of a completed validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// Overall verdict.
    pub verdict: Verdict,
    /// Every check result, in check order.
    pub results: Vec<ValidationCheckResult>,
}

impl ValidationOutcome {
    /// Build an outcome, deriving the verdict from the results.
    pub fn from_results(results: Vec<ValidationCheckResult>) -> Self {
        let verdict = Verdict::from_results(&results);
        Self { verdict, results }
    }

    /// True iff at least one PHI check ran and every PHI check passed.
    pub fn phi_masked(&self) -> bool {
        let mut phi = self
            .results
            .iter()
            .filter(|r| r.category == CheckCategory::Phi)
            .peekable();
        phi.peek().is_some() && phi.all(|r| r.result == CheckOutcome::Pass)
    }

    /// `"<check>: <details>"` for every failed check, joined with `"; "`.
    ///
    /// `None` iff the verdict is `Passed`.
    pub fn failure_summary(&self) -> Option<String> {
        let failures: Vec<String> = self
            .results
            .iter()
            .filter(|r| r.is_failure())
            .map(|r| format!("{}: {}", r.check_name, r.details))
            .collect();
        if failures.is_empty() {
            None
        } else {
            Some(failures.join("; "))
        }
    }
}

/// A check result persisted against a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRecord {
    /// Repository-assigned identifier.
    pub id: ValidationRecordId,
    /// The dataset that was checked.
    pub dataset_id: DatasetId,
    /// The policy the check enforces, if known.
    pub policy_id: Option<PolicyId>,
    /// The check result.
    #[serde(flatten)]
    pub result: ValidationCheckResult,
    /// When the check ran.
    pub checked_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn result(name: &str, category: CheckCategory, outcome: CheckOutcome) -> ValidationCheckResult {
        ValidationCheckResult::new(name, category, outcome, format!("{name} details"))
    }

    #[test]
    fn warning_does_not_fail_the_verdict() {
        let results = vec![
            result("PHI Identifier Check", CheckCategory::Phi, CheckOutcome::Pass),
            result("Null Value Check", CheckCategory::DataQuality, CheckOutcome::Warning),
        ];
        assert_eq!(Verdict::from_results(&results), Verdict::Passed);
    }

    #[test]
    fn single_fail_fails_the_verdict() {
        let results = vec![
            result("PHI Identifier Check", CheckCategory::Phi, CheckOutcome::Fail),
            result("Access Control Check", CheckCategory::AccessControl, CheckOutcome::Pass),
        ];
        assert_eq!(Verdict::from_results(&results), Verdict::Failed);
    }

    #[test]
    fn empty_results_pass() {
        let none: Vec<ValidationCheckResult> = Vec::new();
        assert_eq!(Verdict::from_results(&none), Verdict::Passed);
    }

    #[test]
    fn phi_masked_requires_a_phi_check() {
        let outcome = ValidationOutcome::from_results(vec![result(
            "Access Control Check",
            CheckCategory::AccessControl,
            CheckOutcome::Pass,
        )]);
        assert!(!outcome.phi_masked());
    }

    #[test]
    fn phi_warning_is_not_masked() {
        let outcome = ValidationOutcome::from_results(vec![result(
            "PHI Identifier Check",
            CheckCategory::Phi,
            CheckOutcome::Warning,
        )]);
        assert_eq!(outcome.verdict, Verdict::Passed);
        assert!(!outcome.phi_masked());
    }

    #[test]
    fn failure_summary_joins_every_failure() {
        let outcome = ValidationOutcome::from_results(vec![
            result("A", CheckCategory::Other, CheckOutcome::Fail),
            result("B", CheckCategory::Other, CheckOutcome::Pass),
            result("C", CheckCategory::Other, CheckOutcome::Fail),
        ]);
        assert_eq!(
            outcome.failure_summary().as_deref(),
            Some("A: A details; C: C details")
        );
    }

    #[test]
    fn validation_record_flattens_result() {
        let record = ValidationRecord {
            id: ValidationRecordId(1),
            dataset_id: DatasetId(3),
            policy_id: Some(PolicyId(1)),
            result: result("PHI Identifier Check", CheckCategory::Phi, CheckOutcome::Fail),
            checked_at: Timestamp::parse("2025-03-01T00:00:00Z").unwrap(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["check_name"], "PHI Identifier Check");
        assert_eq!(json["result"], "Fail");
        assert_eq!(json["dataset_id"], 3);
    }

    fn outcome_strategy() -> impl Strategy<Value = CheckOutcome> {
        prop_oneof![
            Just(CheckOutcome::Pass),
            Just(CheckOutcome::Fail),
            Just(CheckOutcome::Warning),
        ]
    }

    proptest! {
        /// The verdict is Failed exactly when some result is Fail.
        #[test]
        fn verdict_failed_iff_any_fail(outcomes in prop::collection::vec(outcome_strategy(), 0..12)) {
            let results: Vec<_> = outcomes
                .iter()
                .map(|o| result("check", CheckCategory::Other, *o))
                .collect();
            let any_fail = outcomes.contains(&CheckOutcome::Fail);
            let outcome = ValidationOutcome::from_results(results);
            prop_assert_eq!(outcome.verdict == Verdict::Failed, any_fail);
            prop_assert_eq!(outcome.failure_summary().is_some(), any_fail);
        }
    }
}
