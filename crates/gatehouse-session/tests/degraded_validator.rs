//! An identity provider outage must not take the admin UI down: the
//! session loads signed out and exactly one error is logged.
//!
//! Kept in its own test binary because it installs a thread-local
//! `tracing` subscriber.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use gatehouse_identity::{IdentityError, IdentityValidator, Validation};
use gatehouse_session::{
    MemorySessionStore, SessionConfig, SessionStore, SpanCorrelation,
    UserSession,
};
use tracing::Level;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Counts ERROR-level events.
struct ErrorCounter(Arc<AtomicUsize>);

impl<S: tracing::Subscriber> Layer<S> for ErrorCounter {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::ERROR {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Behaves like a provider whose network call never completes.
struct TimingOut;

impl IdentityValidator for TimingOut {
    async fn validate(
        &self,
        _token: &str,
        _caller_ip: &str,
    ) -> Result<Validation, IdentityError> {
        tokio::time::sleep(Duration::from_secs(600)).await;
        Err(IdentityError::Unavailable("unreachable".into()))
    }
}

#[tokio::test(start_paused = true)]
async fn test_load_network_timeout_logs_one_error_and_stays_signed_out() {
    let errors = Arc::new(AtomicUsize::new(0));
    let subscriber =
        tracing_subscriber::registry().with(ErrorCounter(Arc::clone(&errors)));
    let _guard = tracing::subscriber::set_default(subscriber);

    let config = SessionConfig {
        validate_timeout: Some(Duration::from_secs(5)),
        ..SessionConfig::default()
    };
    let store = MemorySessionStore::new();
    store.set(&config.token_key, "tok-abc").unwrap();

    let session = UserSession::builder(
        store.clone(),
        SpanCorrelation::request_span("198.51.100.4"),
    )
    .config(config.clone())
    .load(&TimingOut, "198.51.100.4")
    .await;

    assert!(!session.is_signed_in());
    assert!(!session.session_guid().is_nil());
    assert_eq!(
        store.get(&config.tracking_guid_key).unwrap(),
        Some(session.session_guid().to_string())
    );
    assert_eq!(errors.load(Ordering::SeqCst), 1, "error logged exactly once");
}
