//! Privilege policy: which role sets count as "privileged".

use serde::{Deserialize, Serialize};

use crate::RoleEntity;

/// Decides whether a user's roles grant elevated access.
///
/// The policy belongs to the application, not to the session layer, so it
/// is passed in rather than hard-coded. Any `Fn(&[RoleEntity]) -> bool`
/// closure is a policy too.
pub trait PrivilegePolicy: Send + Sync + 'static {
    fn is_privileged(&self, roles: &[RoleEntity]) -> bool;
}

impl<F> PrivilegePolicy for F
where
    F: Fn(&[RoleEntity]) -> bool + Send + Sync + 'static,
{
    fn is_privileged(&self, roles: &[RoleEntity]) -> bool {
        self(roles)
    }
}

/// Treats a role set as privileged if any role's level is at or below
/// `max_privileged_level` (lower levels are more privileged).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelThresholdPolicy {
    pub max_privileged_level: i16,
}

impl Default for LevelThresholdPolicy {
    fn default() -> Self {
        Self {
            max_privileged_level: 20,
        }
    }
}

impl PrivilegePolicy for LevelThresholdPolicy {
    fn is_privileged(&self, roles: &[RoleEntity]) -> bool {
        roles
            .iter()
            .any(|role| role.role_level <= self.max_privileged_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RoleId;

    #[test]
    fn test_level_threshold_admin_role_is_privileged() {
        let roles = vec![
            RoleEntity::new(RoleId::USER, 100, "User"),
            RoleEntity::new(RoleId::ADMINISTRATOR, 20, "Administrator"),
        ];

        assert!(LevelThresholdPolicy::default().is_privileged(&roles));
    }

    #[test]
    fn test_level_threshold_plain_user_is_not_privileged() {
        let roles = vec![RoleEntity::new(RoleId::USER, 100, "User")];

        assert!(!LevelThresholdPolicy::default().is_privileged(&roles));
    }

    #[test]
    fn test_level_threshold_no_roles_is_not_privileged() {
        assert!(!LevelThresholdPolicy::default().is_privileged(&[]));
    }

    #[test]
    fn test_closure_policy_is_called() {
        let policy = |roles: &[RoleEntity]| {
            roles.iter().any(|r| r.role_id == RoleId::THERAPIST)
        };
        let roles = vec![RoleEntity::new(RoleId::THERAPIST, 50, "Therapist")];

        assert!(policy.is_privileged(&roles));
        assert!(!policy.is_privileged(&[]));
    }
}
