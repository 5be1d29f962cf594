//! # Gatehouse
//!
//! Session-aware page authorization for web admin front-ends.
//!
//! Each request gets a fresh [`UserSession`](gatehouse_session::UserSession)
//! loaded from the browser session's store and checked against the
//! identity provider. Page handlers then ask one question before serving
//! anything: is the caller signed in? If not, they get a [`Redirect`] to
//! the sign-in page that remembers where the caller was going.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gatehouse::prelude::*;
//!
//! let gatehouse = Gatehouse::builder()
//!     .recaptcha(recaptcha_config)
//!     .build(my_validator, LevelThresholdPolicy::default());
//!
//! // Per request:
//! let ctx = gatehouse.begin_request(store, caller_ip, "/Reports?page=2").await;
//! match pages::index::on_get(&ctx) {
//!     PageOutcome::Render => { /* render the page */ }
//!     PageOutcome::Redirect(redirect) => { /* 302 to redirect.location() */ }
//! }
//! ```

#![allow(async_fn_in_trait)]

mod app;
pub mod authorization;
mod error;
pub mod pages;
pub mod recaptcha;
pub mod telemetry;

pub use app::{Gatehouse, GatehouseBuilder};
pub use error::GatehouseError;

pub mod prelude {
    pub use crate::authorization::{ensure_signed_in, Redirect};
    pub use crate::pages::{self, PageContext, PageOutcome};
    pub use crate::recaptcha::{
        GoogleReCaptchaClient, ReCaptchaConfig, ReCaptchaOutcome,
        ReCaptchaVerifier,
    };
    pub use crate::{Gatehouse, GatehouseBuilder, GatehouseError};
    pub use gatehouse_identity::{
        IdentityError, IdentityValidator, LevelThresholdPolicy,
        PrivilegePolicy, RoleEntity, RoleId, SessionEntity, SessionStatus,
        UserEntity, Validation,
    };
    pub use gatehouse_session::{
        CorrelationSink, MemorySessionStore, Role, SessionConfig,
        SessionError, SessionState, SessionStore, SpanCorrelation,
        StoreError, UserSession,
    };
}
