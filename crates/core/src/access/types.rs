//! Access-control types.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// A named capability, e.g. `reports:read`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    /// Permission ID.
    pub id: Uuid,
    /// Unique permission name.
    pub name: String,
}

/// A role with its permission references resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HydratedRole {
    /// Role ID.
    pub id: Uuid,
    /// Unique role name.
    pub name: String,
    /// Resolved permissions.
    pub permissions: Vec<Permission>,
}

/// Legacy single-role field kept for backward compatibility.
///
/// A legacy `Admin` bypasses all permission checks regardless of the
/// assigned role set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LegacyRole {
    /// Ordinary user.
    #[default]
    User,
    /// Administrator; short-circuits every capability check.
    Admin,
}

impl FromStr for LegacyRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(format!("Unknown legacy role: {other}")),
        }
    }
}

impl LegacyRole {
    /// String form stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

/// A caller's fully hydrated access data.
#[derive(Debug, Clone)]
pub struct UserAccess {
    /// User ID.
    pub user_id: Uuid,
    /// Legacy single-role field.
    pub legacy_role: LegacyRole,
    /// Assigned roles with resolved permissions.
    pub roles: Vec<HydratedRole>,
}
