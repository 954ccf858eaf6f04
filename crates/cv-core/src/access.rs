//! # Access Log Entries
//!
//! The access log is append-only. Entries are immutable once created and
//! reference datasets softly: `dataset_id` is not checked against the
//! dataset collection, and `dataset_name` is a denormalized copy.

use serde::{Deserialize, Serialize};

use crate::identity::{AccessLogId, DatasetId, UserId};
use crate::temporal::Timestamp;

/// The action recorded by an access-log entry.
///
/// The five known actions have dedicated variants. Any other action string
/// is preserved verbatim in [`AccessAction::Other`] so that logs written by
/// newer producers are never rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AccessAction {
    /// Dataset viewed.
    View,
    /// Dataset uploaded.
    Upload,
    /// Dataset downloaded.
    Download,
    /// Dataset validated.
    Validate,
    /// Dataset audited.
    Audit,
    /// Any other action.
    Other(String),
}

impl AccessAction {
    /// The known actions, in display order.
    pub const KNOWN: [AccessAction; 5] = [
        Self::View,
        Self::Upload,
        Self::Download,
        Self::Validate,
        Self::Audit,
    ];

    /// Parse an action string. Never fails.
    pub fn parse(s: &str) -> Self {
        match s {
            "VIEW" => Self::View,
            "UPLOAD" => Self::Upload,
            "DOWNLOAD" => Self::Download,
            "VALIDATE" => Self::Validate,
            "AUDIT" => Self::Audit,
            other => Self::Other(other.to_string()),
        }
    }

    /// The wire string of this action.
    pub fn as_str(&self) -> &str {
        match self {
            Self::View => "VIEW",
            Self::Upload => "UPLOAD",
            Self::Download => "DOWNLOAD",
            Self::Validate => "VALIDATE",
            Self::Audit => "AUDIT",
            Self::Other(s) => s,
        }
    }
}

impl std::fmt::Display for AccessAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AccessAction {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AccessAction {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

/// One immutable access-log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessLogEntry {
    /// Repository-assigned identifier.
    pub id: AccessLogId,
    /// Acting user.
    pub user_id: UserId,
    /// Acting user's display name.
    pub user_name: String,
    /// Acting user's role, e.g. "Researcher".
    pub user_role: String,
    /// What the user did.
    pub action: AccessAction,
    /// Dataset acted on (soft reference).
    pub dataset_id: DatasetId,
    /// Denormalized dataset name.
    pub dataset_name: String,
    /// When it happened.
    pub timestamp: Timestamp,
    /// Client IP address, stored as given.
    pub ip_address: String,
    /// Whether the action succeeded.
    pub success: bool,
}

/// Fields supplied when appending to the access log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccessLog {
    /// Acting user.
    pub user_id: UserId,
    /// Acting user's display name.
    pub user_name: String,
    /// Acting user's role.
    pub user_role: String,
    /// What the user did.
    pub action: AccessAction,
    /// Dataset acted on.
    pub dataset_id: DatasetId,
    /// Dataset name at the time of the action.
    pub dataset_name: String,
    /// Client IP address.
    pub ip_address: String,
    /// Whether the action succeeded.
    pub success: bool,
}
