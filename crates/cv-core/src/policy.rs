//! # Compliance Policies
//!
//! Read-only reference data. Each active policy gives rise to one check
//! when a check suite is built from policies.

use serde::{Deserialize, Serialize};

use crate::identity::PolicyId;

/// A named compliance rule, e.g. "HIPAA PHI Masking".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompliancePolicy {
    /// Policy identifier.
    pub id: PolicyId,
    /// Policy name.
    pub name: String,
    /// Regulatory regime, e.g. "HIPAA".
    pub policy_type: String,
    /// What the policy requires.
    pub description: String,
    /// Inactive policies are not enforced.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_active_defaults_to_true() {
        let policy: CompliancePolicy = serde_json::from_str(
            r#"{"id": 9, "name": "Audit Logging", "policy_type": "HIPAA", "description": "All access is logged"}"#,
        )
        .unwrap();
        assert!(policy.is_active);
        assert_eq!(policy.id, PolicyId(9));
    }
}
