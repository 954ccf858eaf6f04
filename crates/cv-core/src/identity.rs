//! # Domain Identity Newtypes
//!
//! Newtype wrappers for every identifier in CareVault. These prevent
//! accidental identifier confusion: you cannot pass a `UserId` where a
//! `DatasetId` is expected, even though both are plain integers underneath.
//!
//! Record identifiers are sequential integers assigned by the repository.
//! Validation sessions are not stored records and use a random UUID.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Access the inner integer.
            pub fn get(&self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }
    };
}

numeric_id!(
    /// Identifier of an uploaded dataset.
    DatasetId,
    "dataset"
);

numeric_id!(
    /// Identifier of a user (dataset owner or access-log actor).
    UserId,
    "user"
);

numeric_id!(
    /// Identifier of an access-log entry.
    AccessLogId,
    "access"
);

numeric_id!(
    /// Identifier of a compliance policy.
    PolicyId,
    "policy"
);

numeric_id!(
    /// Identifier of a persisted validation check result.
    ValidationRecordId,
    "validation"
);

/// Unique identifier for one upload-and-validate session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Generate a new random session identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session:{}", self.0)
    }
}
