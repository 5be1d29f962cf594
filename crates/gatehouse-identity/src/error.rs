//! Error types for the identity layer.

/// Errors an [`IdentityValidator`](crate::IdentityValidator) can report.
///
/// None of these are fatal to the caller. The session layer logs them and
/// treats the visitor as signed out.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The identity provider could not be reached (connection refused,
    /// DNS failure, database down, ...).
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),

    /// The identity provider did not answer within the allowed time.
    #[error("identity provider timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The identity provider answered, but the answer made no sense.
    #[error("malformed identity response: {0}")]
    MalformedResponse(String),
}
