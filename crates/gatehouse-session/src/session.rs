//! The user session: who is making this request.
//!
//! A [`UserSession`] is built once per request from two store slots and,
//! when a token is present, one round trip to the identity provider. It
//! then exposes sign-in / sign-out / role queries to the page handlers.
//!
//! ```text
//!                 load()
//!                   │
//!          ┌────────┴─────────┐
//!          ▼                  ▼
//!     [SignedOut]  ←──────  [SignedIn]
//!   (tracking guid) sign_out()  (session guid)
//!          │                  ▲
//!          └──── sign_in() ───┘
//! ```
//!
//! Only the token and the tracking guid outlive the request (in the
//! [`SessionStore`]); the `UserSession` itself is dropped with it.

use std::sync::Arc;

use gatehouse_identity::{
    IdentityError, IdentityValidator, LevelThresholdPolicy, PrivilegePolicy,
    RoleId, SessionEntity, SessionStatus, Validation,
};
use rand::Rng;
use uuid::Uuid;

use crate::{
    CorrelationSink, Role, SessionConfig, SessionError, SessionStore,
    SESSION_GUID_FIELD,
};

/// Coarse state of a [`UserSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Anonymous or signed out. The session guid is a tracking guid.
    SignedOut,
    /// Signed in. The session guid belongs to the provider's session.
    SignedIn,
}

/// Configures and loads a [`UserSession`].
///
/// # Example
///
/// ```rust,ignore
/// let session = UserSession::builder(store, SpanCorrelation::request_span(ip))
///     .config(SessionConfig::default())
///     .load(&validator, ip)
///     .await;
/// ```
pub struct UserSessionBuilder<S, C> {
    store: S,
    correlation: C,
    config: SessionConfig,
    policy: Arc<dyn PrivilegePolicy>,
}

impl<S: SessionStore, C: CorrelationSink> UserSessionBuilder<S, C> {
    /// Sets the session configuration.
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the policy that decides whether a role set is privileged.
    pub fn policy(mut self, policy: impl PrivilegePolicy) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    /// Same as [`policy`](Self::policy), for a policy already shared
    /// between requests.
    pub fn shared_policy(mut self, policy: Arc<dyn PrivilegePolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Loads the session for the caller at `caller_ip`.
    ///
    /// Never fails: if the identity provider is unreachable, times out or
    /// answers garbage, the error is logged and the caller is treated as
    /// signed out.
    pub async fn load<V: IdentityValidator>(
        self,
        validator: &V,
        caller_ip: &str,
    ) -> UserSession<S, C> {
        let mut session = UserSession {
            store: self.store,
            correlation: self.correlation,
            config: self.config,
            policy: self.policy,
            session_token: None,
            session_guid: Uuid::nil(),
            is_signed_in: false,
            is_privileged: false,
            email: None,
            display_name: None,
            roles: None,
        };
        session.initialise(validator, caller_ip).await;
        session
    }
}

/// The signed-in state of the visitor behind one request.
///
/// Invariant: when [`is_signed_in`](Self::is_signed_in) is `false`, the
/// email, display name and roles are all `None`.
pub struct UserSession<S, C> {
    store: S,
    correlation: C,
    config: SessionConfig,
    policy: Arc<dyn PrivilegePolicy>,

    session_token: Option<String>,
    session_guid: Uuid,
    is_signed_in: bool,
    is_privileged: bool,
    email: Option<String>,
    display_name: Option<String>,
    roles: Option<Vec<Role>>,
}

impl<S: SessionStore, C: CorrelationSink> UserSession<S, C> {
    /// Starts building a session over `store`, reporting the session guid
    /// to `correlation`.
    pub fn builder(store: S, correlation: C) -> UserSessionBuilder<S, C> {
        UserSessionBuilder {
            store,
            correlation,
            config: SessionConfig::default(),
            policy: Arc::new(LevelThresholdPolicy::default()),
        }
    }

    // -- Accessors --------------------------------------------------------

    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    /// The guid log lines of this request are correlated under. Never nil
    /// once the session is loaded.
    pub fn session_guid(&self) -> Uuid {
        self.session_guid
    }

    pub fn is_signed_in(&self) -> bool {
        self.is_signed_in
    }

    pub fn is_privileged(&self) -> bool {
        self.is_privileged
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// The user's roles in provider order, or `None` when signed out.
    pub fn roles(&self) -> Option<&[Role]> {
        self.roles.as_deref()
    }

    pub fn state(&self) -> SessionState {
        if self.is_signed_in {
            SessionState::SignedIn
        } else {
            SessionState::SignedOut
        }
    }

    // -- Operations -------------------------------------------------------

    /// Signs the visitor in with a session the identity provider just
    /// created (after a successful password check, say).
    ///
    /// # Errors
    /// Returns [`SessionError::MissingSessionEntity`] when `entity` is
    /// `None`. The stored token and log correlation are still refreshed,
    /// but identity data is left exactly as it was.
    pub fn sign_in(
        &mut self,
        entity: Option<SessionEntity>,
    ) -> Result<(), SessionError> {
        let Some(entity) = entity else {
            self.persist_token();
            self.push_guid();
            return Err(SessionError::MissingSessionEntity);
        };

        self.adopt_session(&entity);
        self.populate_signed_in(&entity);
        self.persist_token();
        self.push_guid();

        tracing::info!(signed_in = self.is_signed_in, "session signed in");
        Ok(())
    }

    /// Signs the visitor out. Same as [`clear`](Self::clear).
    pub fn sign_out(&mut self) {
        tracing::info!("session signed out");
        self.clear();
    }

    /// Forgets the signed-in identity and removes the stored token.
    ///
    /// The visitor is anonymous afterwards but still gets a tracking guid.
    pub fn clear(&mut self) {
        self.session_token = None;
        self.session_guid = Uuid::nil();

        self.is_signed_in = false;
        self.is_privileged = false;

        self.email = None;
        self.display_name = None;

        self.roles = None;

        if let Err(e) = self.store.remove(&self.config.token_key) {
            tracing::debug!(error = %e, "could not remove session token");
        }
        self.adopt_tracking_guid();
        self.push_guid();
    }

    /// Looks up one of the user's roles by id.
    ///
    /// Returns `None` if the user lacks the role or is not signed in.
    pub fn has_role(&self, role_id: RoleId) -> Option<&Role> {
        self.roles
            .as_ref()?
            .iter()
            .find(|role| role.role_id() == role_id)
    }

    /// Role ids as `"2, 5"`, for diagnostics. `None` when there are no roles.
    pub fn role_ids_as_string(&self) -> Option<String> {
        self.join_roles(|role| role.role_id().to_string())
    }

    /// Role names as `"Administrator, User"`, for diagnostics. `None` when
    /// there are no roles.
    pub fn role_names_as_string(&self) -> Option<String> {
        self.join_roles(|role| role.role_name().to_string())
    }

    // -- Internals --------------------------------------------------------

    async fn initialise<V: IdentityValidator>(
        &mut self,
        validator: &V,
        caller_ip: &str,
    ) {
        let Some(token) = self.read_slot(&self.config.token_key) else {
            self.adopt_tracking_guid();
            self.push_guid();
            return;
        };

        let validation = match self.validate(validator, &token, caller_ip).await
        {
            Ok(validation) => validation,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    %caller_ip,
                    "session validation failed, continuing signed out"
                );
                Validation::from_parts(SessionStatus::Error, None)
            }
        };

        match &validation {
            Validation::Validated(entity) => {
                self.adopt_session(entity);
                self.populate_signed_in(entity);
            }
            Validation::NotValidated {
                status,
                entity: Some(entity),
            } => {
                tracing::debug!(%status, "session not signed in");
                self.adopt_session(entity);
            }
            Validation::NotValidated { status, entity: None } => {
                tracing::debug!(%status, "session unknown to identity provider");
                self.adopt_tracking_guid();
            }
        }

        self.persist_token();
        self.push_guid();
    }

    async fn validate<V: IdentityValidator>(
        &self,
        validator: &V,
        token: &str,
        caller_ip: &str,
    ) -> Result<Validation, IdentityError> {
        let call = validator.validate(token, caller_ip);
        match self.config.validate_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| IdentityError::Timeout(limit))?,
            None => call.await,
        }
    }

    /// Takes over the entity's token and guid. An empty token is never
    /// adopted, and a nil guid falls back to the tracking guid.
    fn adopt_session(&mut self, entity: &SessionEntity) {
        self.session_token =
            (!entity.token.is_empty()).then(|| entity.token.clone());

        if entity.guid.is_nil() {
            tracing::debug!("session entity has no guid, using tracking guid");
            self.adopt_tracking_guid();
        } else {
            self.session_guid = entity.guid;
        }
    }

    fn populate_signed_in(&mut self, entity: &SessionEntity) {
        if !entity.is_signed_in() {
            return;
        }

        self.is_signed_in = true;
        self.is_privileged = self.policy.is_privileged(&entity.user.roles);

        self.email = Some(entity.email.clone());
        self.display_name = Some(entity.user.display_name.clone());

        self.roles = Some(entity.user.roles.iter().map(Role::from).collect());
    }

    /// Reuses the visitor's tracking guid, or mints and stores a new one.
    fn adopt_tracking_guid(&mut self) {
        let stored = self
            .read_slot(&self.config.tracking_guid_key)
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
            .filter(|guid| !guid.is_nil());

        let guid = match stored {
            Some(guid) => guid,
            None => {
                let guid = generate_guid();
                self.write_slot(&self.config.tracking_guid_key, &guid.to_string());
                guid
            }
        };

        self.session_guid = guid;
    }

    /// Writes the current token back to the store.
    ///
    /// An absent token leaves the stored slot alone; only `clear` removes it.
    fn persist_token(&self) {
        if let Some(token) = &self.session_token {
            self.write_slot(&self.config.token_key, token);
        }
    }

    /// Tags the rest of the request's logs with the current guid. Called
    /// once at the end of every operation that may change it.
    fn push_guid(&self) {
        self.correlation
            .push(SESSION_GUID_FIELD, &self.session_guid.to_string());
    }

    fn read_slot(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(error = %e, key, "session store read failed");
                None
            }
        }
    }

    fn write_slot(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            tracing::debug!(error = %e, key, "session store write failed");
        }
    }

    fn join_roles(&self, render: impl Fn(&Role) -> String) -> Option<String> {
        let roles = self.roles.as_ref().filter(|roles| !roles.is_empty())?;
        Some(roles.iter().map(render).collect::<Vec<_>>().join(", "))
    }
}

/// Generates a random (version 4) guid.
fn generate_guid() -> Uuid {
    let bytes: [u8; 16] = rand::rng().random();
    uuid::Builder::from_random_bytes(bytes).into_uuid()
}

// =========================================================================
// Tests
// =========================================================================
