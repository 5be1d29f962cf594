//! Error types for the session layer.

/// Errors returned by [`UserSession`](crate::UserSession) operations.
///
/// Loading a session never fails: provider and store failures during
/// construction are logged and the visitor is treated as signed out.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// `sign_in` was called without a session entity. The token and log
    /// correlation were refreshed, but identity data was left untouched.
    #[error("sign-in requested without a session entity")]
    MissingSessionEntity,
}

/// Errors reported by a [`SessionStore`](crate::SessionStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing storage could not be accessed.
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}
