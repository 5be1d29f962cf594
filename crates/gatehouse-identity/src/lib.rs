//! Identity provider contract for Gatehouse.
//!
//! This crate defines what the session layer needs from the outside world
//! to answer "who is making this request?":
//!
//! - **Entities** ([`SessionEntity`], [`UserEntity`], [`RoleEntity`]):
//!   the data an identity provider hands back for a validated token.
//! - **Validation** ([`Validation`], [`SessionStatus`]): the outcome of
//!   checking a token, as a single sum type.
//! - **Validator** ([`IdentityValidator`] trait): the remote capability
//!   that performs the check.
//! - **Privilege policy** ([`PrivilegePolicy`]): decides whether a role
//!   set grants elevated access.
//!
//! # Architecture
//!
//! ```text
//! Pages (gatehouse) → Session (gatehouse-session) → Identity (this crate)
//! ```

#![allow(async_fn_in_trait)]

mod error;
mod policy;
mod types;
mod validator;

pub use error::IdentityError;
pub use policy::{LevelThresholdPolicy, PrivilegePolicy};
pub use types::{
    RoleEntity, RoleId, SessionEntity, SessionStatus, UserEntity, Validation,
};
pub use validator::IdentityValidator;
