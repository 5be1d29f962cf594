//! Session configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for how a [`UserSession`](crate::UserSession) reads and
/// writes the session store and talks to the identity provider.
///
/// Passed in explicitly by the application. `SessionConfig::default()`
/// gives working key names and a 10 second validation timeout; override
/// just the fields you need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Store key holding the signed-in session token.
    pub token_key: String,

    /// Store key holding the tracking guid of an anonymous visitor.
    pub tracking_guid_key: String,

    /// Upper bound on one identity provider round trip. `None` leaves the
    /// call unbounded and relies on the caller's own request timeout.
    pub validate_timeout: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_key: "Gatehouse.Identity.UserSession.SignedIn.Token".to_string(),
            tracking_guid_key: "Gatehouse.Identity.UserSession.SignedOut.Guid"
                .to_string(),
            validate_timeout: Some(Duration::from_secs(10)),
        }
    }
}
