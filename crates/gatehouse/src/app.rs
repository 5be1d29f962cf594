//! `Gatehouse` builder and per-request entry point.
//!
//! This ties the layers together: store → identity provider → session →
//! page context. One `Gatehouse` is built at startup and shared by all
//! request handlers; it holds no per-visitor state.

use std::sync::Arc;

use gatehouse_identity::{IdentityValidator, PrivilegePolicy};
use gatehouse_session::{
    SessionConfig, SessionStore, SpanCorrelation, UserSession,
};
use tracing::Instrument;

use crate::pages::PageContext;
use crate::recaptcha::ReCaptchaConfig;

/// Builder for configuring a [`Gatehouse`].
///
/// # Example
///
/// ```rust,ignore
/// use gatehouse::prelude::*;
///
/// let gatehouse = Gatehouse::builder()
///     .session_config(SessionConfig::default())
///     .build(my_validator, LevelThresholdPolicy::default());
/// ```
pub struct GatehouseBuilder {
    session_config: SessionConfig,
    recaptcha: Option<ReCaptchaConfig>,
}

impl GatehouseBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            session_config: SessionConfig::default(),
            recaptcha: None,
        }
    }

    /// Sets the session configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Enables ReCaptcha; the site key is handed to every page context.
    pub fn recaptcha(mut self, config: ReCaptchaConfig) -> Self {
        self.recaptcha = Some(config);
        self
    }

    /// Builds the `Gatehouse` around an identity provider and a privilege
    /// policy.
    pub fn build<V: IdentityValidator>(
        self,
        validator: V,
        policy: impl PrivilegePolicy,
    ) -> Gatehouse<V> {
        Gatehouse {
            validator,
            policy: Arc::new(policy),
            session_config: self.session_config,
            recaptcha: self.recaptcha,
        }
    }
}

impl Default for GatehouseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared, read-only collaborators for loading user sessions.
pub struct Gatehouse<V: IdentityValidator> {
    validator: V,
    policy: Arc<dyn PrivilegePolicy>,
    session_config: SessionConfig,
    recaptcha: Option<ReCaptchaConfig>,
}

impl<V: IdentityValidator> Gatehouse<V> {
    /// Creates a new builder.
    pub fn builder() -> GatehouseBuilder {
        GatehouseBuilder::new()
    }

    pub fn validator(&self) -> &V {
        &self.validator
    }

    pub fn session_config(&self) -> &SessionConfig {
        &self.session_config
    }

    pub fn recaptcha_config(&self) -> Option<&ReCaptchaConfig> {
        self.recaptcha.as_ref()
    }

    /// Loads the caller's session and wraps it in a [`PageContext`].
    ///
    /// `store` is the browser session's slot storage, `caller_ip` the
    /// remote address, `path_and_query` the URL the caller asked for.
    /// Never fails; see [`UserSession`] for how provider outages degrade.
    pub async fn begin_request<S: SessionStore>(
        &self,
        store: S,
        caller_ip: &str,
        path_and_query: &str,
    ) -> PageContext<S, SpanCorrelation> {
        let correlation = SpanCorrelation::request_span(caller_ip);
        let root = correlation.root().clone();

        let session = UserSession::builder(store, correlation.clone())
            .config(self.session_config.clone())
            .shared_policy(Arc::clone(&self.policy))
            .load(&self.validator, caller_ip)
            .instrument(root)
            .await;

        let ctx =
            PageContext::new(session, path_and_query, caller_ip, correlation);
        match &self.recaptcha {
            Some(recaptcha) => ctx.with_recaptcha_site_key(&recaptcha.site_key),
            None => ctx,
        }
    }
}
