//! Per-request user session management for Gatehouse.
//!
//! This crate answers "who is making this request?" for an admin
//! front-end:
//!
//! 1. **Storage**: the browser session's server-side slots
//!    ([`SessionStore`] trait, [`MemorySessionStore`])
//! 2. **Validation**: checking the stored token with the identity
//!    provider ([`IdentityValidator`](gatehouse_identity::IdentityValidator))
//! 3. **State**: the signed-in / signed-out state machine with roles and
//!    display data ([`UserSession`])
//! 4. **Correlation**: tagging every log line of the request with the
//!    session guid ([`CorrelationSink`], [`SpanCorrelation`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Pages (gatehouse)  ← redirect anonymous callers to the sign-in page
//!     ↕
//! Session Layer (this crate)  ← one UserSession per request
//!     ↕
//! Identity Layer (gatehouse-identity)  ← entities, validator contract
//! ```

mod config;
mod correlation;
mod error;
mod role;
mod session;
mod store;

pub use config::SessionConfig;
pub use correlation::{CorrelationSink, SpanCorrelation, SESSION_GUID_FIELD};
pub use error::{SessionError, StoreError};
pub use role::Role;
pub use session::{SessionState, UserSession, UserSessionBuilder};
pub use store::{MemorySessionStore, SessionStore};
