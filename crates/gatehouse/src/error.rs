//! Unified error type for Gatehouse.

use gatehouse_identity::IdentityError;
use gatehouse_session::{SessionError, StoreError};

use crate::recaptcha::ReCaptchaError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant generates `From` impls, so the
/// `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum GatehouseError {
    /// The identity provider failed, when a handler calls it directly.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// A session operation failed (e.g. sign-in without an entity).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The session store failed, when a handler reads or writes it directly.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// ReCaptcha verification could not be performed.
    #[error(transparent)]
    ReCaptcha(#[from] ReCaptchaError),

    /// The logging subscriber could not be installed.
    #[error("logging setup failed: {0}")]
    Logging(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_identity_error() {
        let err = IdentityError::Unavailable("down".into());
        let gatehouse_err: GatehouseError = err.into();
        assert!(matches!(gatehouse_err, GatehouseError::Identity(_)));
        assert!(gatehouse_err.to_string().contains("down"));
    }

    #[test]
    fn test_from_session_error() {
        let err = SessionError::MissingSessionEntity;
        let gatehouse_err: GatehouseError = err.into();
        assert!(matches!(gatehouse_err, GatehouseError::Session(_)));
    }

    #[test]
    fn test_from_store_error() {
        let err = StoreError::Unavailable("locked".into());
        let gatehouse_err: GatehouseError = err.into();
        assert!(matches!(gatehouse_err, GatehouseError::Store(_)));
    }
}
