//! Capability evaluation.

use super::types::{LegacyRole, UserAccess};

/// Evaluates role and permission checks for a hydrated caller.
pub struct AccessGate;

impl AccessGate {
    /// True when the caller holds the named role.
    ///
    /// A legacy admin passes every role check.
    #[must_use]
    pub fn has_role(access: &UserAccess, role_name: &str) -> bool {
        if role_name.is_empty() {
            return false;
        }
        if access.legacy_role == LegacyRole::Admin {
            return true;
        }
        access.roles.iter().any(|r| r.name == role_name)
    }

    /// True when the caller holds the named permission through any of its
    /// roles. A legacy admin passes every permission check, even with an
    /// empty role set.
    #[must_use]
    pub fn has_permission(access: &UserAccess, permission_name: &str) -> bool {
        if permission_name.is_empty() {
            return false;
        }
        if access.legacy_role == LegacyRole::Admin {
            return true;
        }
        access
            .roles
            .iter()
            .flat_map(|r| r.permissions.iter())
            .any(|p| p.name == permission_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::types::{HydratedRole, Permission};
    use uuid::Uuid;

    fn role(name: &str, permissions: &[&str]) -> HydratedRole {
        HydratedRole {
            id: Uuid::new_v4(),
            name: name.to_string(),
            permissions: permissions
                .iter()
                .map(|p| Permission {
                    id: Uuid::new_v4(),
                    name: (*p).to_string(),
                })
                .collect(),
        }
    }

    fn user(legacy_role: LegacyRole, roles: Vec<HydratedRole>) -> UserAccess {
        UserAccess {
            user_id: Uuid::new_v4(),
            legacy_role,
            roles,
        }
    }

    #[test]
    fn test_admin_short_circuits_with_empty_role_set() {
        let access = user(LegacyRole::Admin, vec![]);
        assert!(AccessGate::has_permission(&access, "reports:read"));
        assert!(AccessGate::has_permission(&access, "anything:at-all"));
        assert!(AccessGate::has_role(&access, "accountant"));
    }

    #[test]
    fn test_permission_resolved_through_roles() {
        let access = user(
            LegacyRole::User,
            vec![role("accountant", &["reports:read", "invoices:write"])],
        );
        assert!(AccessGate::has_permission(&access, "reports:read"));
        assert!(!AccessGate::has_permission(&access, "roles:create"));
    }

    #[test]
    fn test_role_check_matches_name() {
        let access = user(LegacyRole::User, vec![role("accountant", &[])]);
        assert!(AccessGate::has_role(&access, "accountant"));
        assert!(!AccessGate::has_role(&access, "admin"));
    }

    #[test]
    fn test_plain_user_without_roles_fails_both() {
        let access = user(LegacyRole::User, vec![]);
        assert!(!AccessGate::has_role(&access, "accountant"));
        assert!(!AccessGate::has_permission(&access, "reports:read"));
    }

    #[test]
    fn test_empty_capability_names_fail() {
        let access = user(LegacyRole::Admin, vec![]);
        assert!(!AccessGate::has_role(&access, ""));
        assert!(!AccessGate::has_permission(&access, ""));
    }
}
