//! Entities returned by the identity provider.
//!
//! These mirror what an identity provider knows about a signed-in visitor:
//! the session itself, the user it belongs to, and that user's roles.
//! They derive `Serialize`/`Deserialize` so a validator backed by a remote
//! API can decode them straight from its response body.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Role catalog
// ---------------------------------------------------------------------------

/// Identifier of a role in the role catalog.
///
/// A newtype over the provider's numeric id. The catalog is owned by the
/// identity provider, so unknown ids are valid values; the associated
/// constants name the roles the admin front-end cares about.
///
/// `#[serde(transparent)]` keeps the wire form a bare number:
/// `RoleId(2)` is just `2` in JSON.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct RoleId(pub i16);

impl RoleId {
    pub const GLOBAL_ADMINISTRATOR: RoleId = RoleId(1);
    pub const SYSTEM_ADMINISTRATOR: RoleId = RoleId(2);
    pub const ADMINISTRATOR: RoleId = RoleId(3);
    pub const THERAPIST: RoleId = RoleId(50);
    pub const USER: RoleId = RoleId(100);
}

/// Renders the raw number, which is what diagnostics print.
impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A role as the identity provider describes it.
///
/// `role_level` is an ordinal: lower levels are more privileged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleEntity {
    pub role_id: RoleId,
    pub role_level: i16,
    pub role_name: String,
}

impl RoleEntity {
    pub fn new(role_id: RoleId, role_level: i16, role_name: &str) -> Self {
        Self {
            role_id,
            role_level,
            role_name: role_name.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Session and user
// ---------------------------------------------------------------------------

/// Status of a session as reported by the identity provider.
///
/// Only [`SessionStatus::SignedIn`] means the visitor is authenticated.
/// Everything else (including statuses added by the provider later, which
/// deserialize as `Unknown`) is treated as signed out.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "PascalCase")]
pub enum SessionStatus {
    SignedIn,
    SignedOut,
    Expired,
    Disabled,
    Error,
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionStatus::SignedIn => "signed-in",
            SessionStatus::SignedOut => "signed-out",
            SessionStatus::Expired => "expired",
            SessionStatus::Disabled => "disabled",
            SessionStatus::Error => "error",
            SessionStatus::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// The user a session belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEntity {
    pub display_name: String,
    /// Roles in the order the provider lists them.
    pub roles: Vec<RoleEntity>,
}

/// A session record held by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEntity {
    /// Opaque token the visitor presents on later requests.
    pub token: String,
    /// Stable id of this session, used for log correlation.
    pub guid: Uuid,
    /// The provider's own view of this session's status.
    pub status: SessionStatus,
    pub email: String,
    pub user: UserEntity,
}

impl SessionEntity {
    /// Returns `true` if this record describes a live, signed-in session.
    pub fn is_signed_in(&self) -> bool {
        self.status == SessionStatus::SignedIn && !self.token.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Outcome of validating a session token.
///
/// A single sum type instead of a status plus a nullable entity:
///
/// - `Validated`: the token belongs to a signed-in session.
/// - `NotValidated`: the token was rejected. The provider may still hand
///   back the session record (an expired session, say), so callers can
///   keep correlating logs under that session's guid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Validated(SessionEntity),
    NotValidated {
        status: SessionStatus,
        entity: Option<SessionEntity>,
    },
}

impl Validation {
    /// Builds a `Validation` from a provider's `(status, entity)` pair.
    ///
    /// Only `SignedIn` with an entity present becomes `Validated`.
    pub fn from_parts(
        status: SessionStatus,
        entity: Option<SessionEntity>,
    ) -> Self {
        match (status, entity) {
            (SessionStatus::SignedIn, Some(entity)) => {
                Validation::Validated(entity)
            }
            (status, entity) => Validation::NotValidated { status, entity },
        }
    }

    /// The session status this outcome represents.
    pub fn status(&self) -> SessionStatus {
        match self {
            Validation::Validated(_) => SessionStatus::SignedIn,
            Validation::NotValidated { status, .. } => *status,
        }
    }

    pub fn entity(&self) -> Option<&SessionEntity> {
        match self {
            Validation::Validated(entity) => Some(entity),
            Validation::NotValidated { entity, .. } => entity.as_ref(),
        }
    }

    pub fn is_validated(&self) -> bool {
        matches!(self, Validation::Validated(_))
    }
}
