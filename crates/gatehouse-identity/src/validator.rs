//! The identity provider hook.
//!
//! Gatehouse does not validate tokens itself. The identity provider owns
//! sessions, users and roles; Gatehouse only asks it "is this token still
//! good, and if so, who is it?".
//!
//! [`IdentityValidator`] is that question as a trait. Production code
//! implements it over the provider's API or database; tests implement it
//! with a scripted answer.

use crate::{IdentityError, Validation};

/// Checks a session token against the identity provider.
///
/// # Trait bounds
///
/// - `Send + Sync` → one validator is shared by every request handler,
///   and Tokio may poll those handlers on any worker thread.
/// - `'static` → the validator lives as long as the application.
///
/// # Example
///
/// ```rust
/// use gatehouse_identity::{
///     IdentityError, IdentityValidator, SessionStatus, Validation,
/// };
///
/// /// Rejects every token. Useful while the provider is being wired up.
/// struct RejectAll;
///
/// impl IdentityValidator for RejectAll {
///     async fn validate(
///         &self,
///         _token: &str,
///         _caller_ip: &str,
///     ) -> Result<Validation, IdentityError> {
///         Ok(Validation::from_parts(SessionStatus::SignedOut, None))
///     }
/// }
/// ```
pub trait IdentityValidator: Send + Sync + 'static {
    /// Validates `token` on behalf of a caller at `caller_ip`.
    ///
    /// Implementations typically also refresh the session's last-seen
    /// time on the provider side, which is why the caller IP is passed.
    ///
    /// # Returns
    /// - `Ok(Validation::Validated(entity))`: the session is signed in
    /// - `Ok(Validation::NotValidated { .. })`: expired, signed out, ...
    /// - `Err(IdentityError)`: the provider could not answer
    fn validate(
        &self,
        token: &str,
        caller_ip: &str,
    ) -> impl std::future::Future<Output = Result<Validation, IdentityError>> + Send;
}
