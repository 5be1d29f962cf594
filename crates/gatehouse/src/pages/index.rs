//! The admin landing page.

use gatehouse_session::{CorrelationSink, SessionStore};

use crate::pages::{PageContext, PageOutcome};

/// `GET /`: signed-in callers see the page, everyone else is sent to
/// sign in and brought back here afterwards.
pub fn on_get<S: SessionStore, C: CorrelationSink>(
    ctx: &PageContext<S, C>,
) -> PageOutcome {
    tracing::info!(parent: &ctx.span(), "index page accessed");

    match ctx.ensure_signed_in() {
        Some(redirect) => PageOutcome::Redirect(redirect),
        None => PageOutcome::Render,
    }
}
