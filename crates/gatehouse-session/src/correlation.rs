//! Log correlation: attaching the session guid to every log line of a
//! request.

use std::sync::{Arc, Mutex, MutexGuard};

/// Field name under which the session guid is recorded.
pub const SESSION_GUID_FIELD: &str = "session_guid";

/// Receives key/value pairs that should decorate the rest of the request's
/// log output.
pub trait CorrelationSink: Send + Sync {
    fn push(&self, key: &'static str, value: &str);
}

impl<T: CorrelationSink + ?Sized> CorrelationSink for Arc<T> {
    fn push(&self, key: &'static str, value: &str) {
        (**self).push(key, value)
    }
}

/// Tags a request's `tracing` output with the session guid.
///
/// Each distinct guid gets its own `session{session_guid=...}` span,
/// opened as a child of the request span. A guid that changes mid-request
/// (sign-in, sign-out) moves to a fresh span; no span field is ever
/// recorded twice. Pushing the guid already in effect is a no-op.
///
/// Emit events under [`span`](Self::span) so they carry the current guid:
///
/// ```text
/// INFO request{caller_ip=10.0.0.5}:session{session_guid=67e5...}: index page accessed
/// ```
#[derive(Debug, Clone)]
pub struct SpanCorrelation {
    root: tracing::Span,
    current: Arc<Mutex<Current>>,
}

#[derive(Debug)]
struct Current {
    session_guid: Option<String>,
    span: tracing::Span,
}

impl SpanCorrelation {
    /// Correlates under `root`. Until a guid is pushed, [`span`](Self::span)
    /// is `root` itself.
    pub fn new(root: tracing::Span) -> Self {
        let current = Current {
            session_guid: None,
            span: root.clone(),
        };
        Self {
            root,
            current: Arc::new(Mutex::new(current)),
        }
    }

    /// A fresh `request` span for the caller at `caller_ip`.
    pub fn request_span(caller_ip: &str) -> Self {
        Self::new(tracing::info_span!("request", caller_ip = %caller_ip))
    }

    /// The request span, without any session guid.
    pub fn root(&self) -> &tracing::Span {
        &self.root
    }

    /// The span carrying the most recently pushed guid.
    pub fn span(&self) -> tracing::Span {
        self.lock().span.clone()
    }

    /// The most recently pushed guid, if any.
    pub fn session_guid(&self) -> Option<String> {
        self.lock().session_guid.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Current> {
        // A panic while swapping spans leaves a usable value behind.
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CorrelationSink for SpanCorrelation {
    fn push(&self, key: &'static str, value: &str) {
        let mut current = self.lock();

        if key != SESSION_GUID_FIELD {
            current.span.record(key, tracing::field::display(value));
            return;
        }

        if current.session_guid.as_deref() == Some(value) {
            return;
        }

        current.span = tracing::info_span!(
            parent: &self.root,
            "session",
            session_guid = %value,
        );
        current.session_guid = Some(value.to_string());
    }
}
