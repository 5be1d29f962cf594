//! Per-request page context and page handlers.

pub mod index;

use gatehouse_session::{
    CorrelationSink, SessionStore, SpanCorrelation, UserSession,
};

use crate::authorization::{self, Redirect};
use crate::recaptcha::ReCaptchaVerifier;

/// Score reported when ReCaptcha could not be verified.
pub const RECAPTCHA_UNVERIFIED_SCORE: f64 = -1.0;

/// What a page handler wants the hosting layer to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Render the page.
    Render,
    /// Send the browser elsewhere.
    Redirect(Redirect),
}

/// Everything a page handler needs about the current request.
///
/// Built by [`Gatehouse::begin_request`](crate::Gatehouse::begin_request).
/// Handlers that emit their own logs should enter [`span`](Self::span) so
/// the lines carry the session guid.
pub struct PageContext<S, C> {
    session: UserSession<S, C>,
    path_and_query: String,
    remote_ip: String,
    recaptcha_site_key: Option<String>,
    correlation: SpanCorrelation,
}

impl<S: SessionStore, C: CorrelationSink> PageContext<S, C> {
    pub fn new(
        session: UserSession<S, C>,
        path_and_query: &str,
        remote_ip: &str,
        correlation: SpanCorrelation,
    ) -> Self {
        Self {
            session,
            path_and_query: path_and_query.to_string(),
            remote_ip: remote_ip.to_string(),
            recaptcha_site_key: None,
            correlation,
        }
    }

    /// Sets the public ReCaptcha key rendered into forms.
    pub fn with_recaptcha_site_key(mut self, site_key: &str) -> Self {
        self.recaptcha_site_key = Some(site_key.to_string());
        self
    }

    pub fn session(&self) -> &UserSession<S, C> {
        &self.session
    }

    /// Mutable access for the sign-in and sign-out pages.
    pub fn session_mut(&mut self) -> &mut UserSession<S, C> {
        &mut self.session
    }

    pub fn path_and_query(&self) -> &str {
        &self.path_and_query
    }

    pub fn remote_ip(&self) -> &str {
        &self.remote_ip
    }

    pub fn recaptcha_site_key(&self) -> Option<&str> {
        self.recaptcha_site_key.as_deref()
    }

    /// The span for the current session guid. Follows the guid across
    /// sign-in and sign-out, so fetch it again after either.
    pub fn span(&self) -> tracing::Span {
        self.correlation.span()
    }

    /// Redirect to the sign-in page if the caller is anonymous.
    pub fn ensure_signed_in(&self) -> Option<Redirect> {
        let span = self.span();
        let _entered = span.enter();
        authorization::ensure_signed_in(&self.session, &self.path_and_query)
    }

    /// Checks the ReCaptcha token a form posted.
    ///
    /// Returns `(true, score)` when the verify endpoint answered and
    /// `(false, -1.0)` when it could not be reached or understood. The
    /// caller decides what score is good enough.
    pub async fn verify_recaptcha<R: ReCaptchaVerifier>(
        &self,
        verifier: &R,
        response: &str,
    ) -> (bool, f64) {
        match verifier.verify(response, &self.remote_ip).await {
            Ok(outcome) => (true, outcome.score),
            Err(e) => {
                tracing::warn!(
                    parent: &self.span(),
                    error = %e,
                    "recaptcha verification failed"
                );
                (false, RECAPTCHA_UNVERIFIED_SCORE)
            }
        }
    }
}
