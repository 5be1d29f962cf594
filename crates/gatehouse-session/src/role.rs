//! The role value a signed-in session carries.

use gatehouse_identity::{RoleEntity, RoleId};

/// One of the signed-in user's roles.
///
/// Built from a [`RoleEntity`] when the session is populated and never
/// changed afterwards, so the fields are private behind getters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    role_id: RoleId,
    role_level: i16,
    role_name: String,
}

impl Role {
    pub fn role_id(&self) -> RoleId {
        self.role_id
    }

    /// Lower levels are more privileged.
    pub fn role_level(&self) -> i16 {
        self.role_level
    }

    pub fn role_name(&self) -> &str {
        &self.role_name
    }
}

impl From<&RoleEntity> for Role {
    fn from(entity: &RoleEntity) -> Self {
        Self {
            role_id: entity.role_id,
            role_level: entity.role_level,
            role_name: entity.role_name.clone(),
        }
    }
}
