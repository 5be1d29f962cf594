//! Google ReCaptcha verification.
//!
//! Sign-in forms post a ReCaptcha token along with the credentials. The
//! token is checked with Google's `siteverify` endpoint; v3 keys also
//! return a score between 0.0 (bot) and 1.0 (human).
//!
//! Secrets are passed in through [`ReCaptchaConfig`] when the client is
//! built; there is no process-wide settings object.

use serde::{Deserialize, Serialize};

/// Google's verification endpoint.
pub const DEFAULT_VERIFY_URL: &str =
    "https://www.google.com/recaptcha/api/siteverify";

/// Errors that prevent a ReCaptcha answer from being obtained.
#[derive(Debug, thiserror::Error)]
pub enum ReCaptchaError {
    /// The request failed, returned a non-success HTTP status, or the
    /// body could not be decoded.
    #[error("recaptcha request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Keys and endpoint for ReCaptcha.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReCaptchaConfig {
    /// Public key embedded in rendered pages.
    pub site_key: String,
    /// Server-side secret sent to the verify endpoint.
    pub secret: String,
    pub verify_url: String,
}

impl Default for ReCaptchaConfig {
    fn default() -> Self {
        Self {
            site_key: String::new(),
            secret: String::new(),
            verify_url: DEFAULT_VERIFY_URL.to_string(),
        }
    }
}

/// The verify endpoint's answer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReCaptchaOutcome {
    pub success: bool,
    /// v3 score; absent for v2 keys, in which case it reads 0.0.
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default, rename = "error-codes")]
    pub error_codes: Vec<String>,
}

/// Verifies a ReCaptcha response token.
pub trait ReCaptchaVerifier: Send + Sync + 'static {
    fn verify(
        &self,
        response: &str,
        remote_ip: &str,
    ) -> impl std::future::Future<Output = Result<ReCaptchaOutcome, ReCaptchaError>> + Send;
}

#[derive(Serialize)]
struct VerifyRequest<'a> {
    secret: &'a str,
    response: &'a str,
    remoteip: &'a str,
}

/// [`ReCaptchaVerifier`] that posts to Google's `siteverify` endpoint.
#[derive(Debug, Clone)]
pub struct GoogleReCaptchaClient {
    http: reqwest::Client,
    config: ReCaptchaConfig,
}

impl GoogleReCaptchaClient {
    pub fn new(config: ReCaptchaConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Uses an existing `reqwest::Client` (shared connection pool, custom
    /// timeouts, ...).
    pub fn with_client(http: reqwest::Client, config: ReCaptchaConfig) -> Self {
        Self { http, config }
    }

    pub fn site_key(&self) -> &str {
        &self.config.site_key
    }
}

impl ReCaptchaVerifier for GoogleReCaptchaClient {
    async fn verify(
        &self,
        response: &str,
        remote_ip: &str,
    ) -> Result<ReCaptchaOutcome, ReCaptchaError> {
        let form = VerifyRequest {
            secret: &self.config.secret,
            response,
            remoteip: remote_ip,
        };

        let outcome = self
            .http
            .post(&self.config.verify_url)
            .form(&form)
            .send()
            .await?
            .error_for_status()?
            .json::<ReCaptchaOutcome>()
            .await?;

        tracing::debug!(
            success = outcome.success,
            score = outcome.score,
            "recaptcha verified"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_points_at_google() {
        let config = ReCaptchaConfig::default();

        assert_eq!(config.verify_url, DEFAULT_VERIFY_URL);
        assert!(config.secret.is_empty());
    }

    #[test]
    fn test_client_exposes_site_key() {
        let client = GoogleReCaptchaClient::new(ReCaptchaConfig {
            site_key: "site-123".into(),
            ..ReCaptchaConfig::default()
        });

        assert_eq!(client.site_key(), "site-123");
    }
}
