//! Page authorization: send anonymous callers to the sign-in page.
//!
//! Every access-controlled page handler starts with
//! [`ensure_signed_in`]. It only reads the session; deciding whether to
//! redirect never changes who the caller is.

use std::fmt;

use gatehouse_session::{CorrelationSink, SessionStore, UserSession};

/// The page anonymous callers are sent to.
pub const SIGN_IN_PAGE: &str = "/SignIn";

/// Query parameter carrying the page to come back to after signing in.
pub const RETURN_URL_PARAM: &str = "returnUrl";

/// An instruction to send the browser to another page.
///
/// Kept framework-neutral: the hosting layer turns it into a 302 (or
/// whatever its idiom is) using [`location`](Self::location).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    target_page: String,
    params: Vec<(String, String)>,
}

impl Redirect {
    /// A redirect to `target_page` with no parameters.
    pub fn to_page(target_page: &str) -> Self {
        Self {
            target_page: target_page.to_string(),
            params: Vec::new(),
        }
    }

    /// Appends a query parameter.
    pub fn with_param(mut self, name: &str, value: &str) -> Self {
        self.params.push((name.to_string(), value.to_string()));
        self
    }

    pub fn target_page(&self) -> &str {
        &self.target_page
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Value of the first parameter called `name`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// The redirect target with percent-encoded query parameters, e.g.
    /// `/SignIn?returnUrl=%2FReports%3Fpage%3D2`.
    pub fn location(&self) -> String {
        if self.params.is_empty() {
            return self.target_page.clone();
        }
        let query = self
            .params
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.target_page, query)
    }
}

impl fmt::Display for Redirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.location())
    }
}

/// Returns a redirect to the sign-in page if the caller is not signed in.
///
/// `path_and_query` is what the caller originally asked for (e.g.
/// `/Reports?page=2`); it travels as the `returnUrl` parameter so the
/// sign-in page can send the caller back afterwards.
///
/// Returns `None` when the caller is signed in and the page may be served.
pub fn ensure_signed_in<S, C>(
    session: &UserSession<S, C>,
    path_and_query: &str,
) -> Option<Redirect>
where
    S: SessionStore,
    C: CorrelationSink,
{
    if session.is_signed_in() {
        return None;
    }

    tracing::info!(
        return_url = %path_and_query,
        "redirecting to sign-in page"
    );

    Some(
        Redirect::to_page(SIGN_IN_PAGE)
            .with_param(RETURN_URL_PARAM, path_and_query),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_identity::{
        IdentityError, IdentityValidator, SessionEntity, SessionStatus,
        UserEntity, Validation,
    };
    use gatehouse_session::MemorySessionStore;

    struct SignedOut;

    impl IdentityValidator for SignedOut {
        async fn validate(
            &self,
            _token: &str,
            _caller_ip: &str,
        ) -> Result<Validation, IdentityError> {
            Ok(Validation::from_parts(SessionStatus::SignedOut, None))
        }
    }

    struct Quiet;

    impl CorrelationSink for Quiet {
        fn push(&self, _key: &'static str, _value: &str) {}
    }

    fn entity() -> SessionEntity {
        SessionEntity {
            token: "tok".into(),
            guid: uuid::Uuid::from_u128(9),
            status: SessionStatus::SignedIn,
            email: "ops@example.com".into(),
            user: UserEntity {
                display_name: "Ops".into(),
                roles: Vec::new(),
            },
        }
    }

    async fn anonymous() -> UserSession<MemorySessionStore, Quiet> {
        UserSession::builder(MemorySessionStore::new(), Quiet)
            .load(&SignedOut, "127.0.0.1")
            .await
    }

    #[tokio::test]
    async fn test_ensure_signed_in_anonymous_redirects_with_return_url() {
        let session = anonymous().await;

        let redirect = ensure_signed_in(&session, "/Reports?page=2")
            .expect("anonymous caller should be redirected");

        assert_eq!(redirect.target_page(), SIGN_IN_PAGE);
        assert_eq!(redirect.param(RETURN_URL_PARAM), Some("/Reports?page=2"));
    }

    #[tokio::test]
    async fn test_ensure_signed_in_signed_in_returns_none() {
        let mut session = anonymous().await;
        session.sign_in(Some(entity())).unwrap();

        assert!(ensure_signed_in(&session, "/Index").is_none());
    }

    #[tokio::test]
    async fn test_ensure_signed_in_does_not_change_session() {
        let session = anonymous().await;
        let guid = session.session_guid();

        let _ = ensure_signed_in(&session, "/");

        assert_eq!(session.session_guid(), guid);
        assert!(!session.is_signed_in());
    }

    #[test]
    fn test_location_percent_encodes_params() {
        let redirect = Redirect::to_page("/SignIn")
            .with_param("returnUrl", "/Reports?page=2&sort=desc");

        assert_eq!(
            redirect.location(),
            "/SignIn?returnUrl=%2FReports%3Fpage%3D2%26sort%3Ddesc"
        );
        assert_eq!(redirect.to_string(), redirect.location());
    }

    #[test]
    fn test_location_without_params_is_bare_page() {
        assert_eq!(Redirect::to_page("/SignIn").location(), "/SignIn");
    }

    #[test]
    fn test_param_missing_returns_none() {
        let redirect = Redirect::to_page("/SignIn").with_param("a", "1");

        assert_eq!(redirect.param("b"), None);
        assert_eq!(redirect.params().len(), 1);
    }
}
