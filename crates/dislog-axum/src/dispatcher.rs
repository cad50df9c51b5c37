//! Notification dispatch for classified failures.

use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use dislog_webhook::ErrorNotifier;

use crate::error::Error;

/// Tracing target for failure dispatch.
const TRACING_TARGET: &str = "dislog_axum::dispatcher";

/// Per-failure entry point: forwards a classified failure to the notifier
/// and renders the client response.
///
/// Stateless between invocations and safe to invoke concurrently for
/// unrelated requests. Cheap to clone; all clones share the underlying
/// notifier.
#[derive(Clone)]
pub struct ErrorDispatcher {
    notifier: Arc<dyn ErrorNotifier>,
}

impl std::fmt::Debug for ErrorDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorDispatcher").finish_non_exhaustive()
    }
}

impl ErrorDispatcher {
    /// Creates a dispatcher backed by the given notifier.
    pub fn new(notifier: impl ErrorNotifier + 'static) -> Self {
        Self {
            notifier: Arc::new(notifier),
        }
    }

    /// Forwards the failure to the notification side channel.
    ///
    /// Best-effort: the outcome is logged and otherwise discarded, and no
    /// delivery fault escapes to the caller.
    pub async fn report(&self, error: &Error) {
        let delivered = self
            .notifier
            .notify(
                error.message(),
                error.status_code().as_u16(),
                error.backtrace(),
            )
            .await;

        tracing::debug!(
            target: TRACING_TARGET,
            kind = error.kind().name(),
            status = error.status_code().as_u16(),
            delivered,
            "Failure reported"
        );
    }

    /// Reports the failure and renders the client-facing JSON response.
    ///
    /// This is the convergence point every handling path goes through, used
    /// directly when dispatching outside the router middleware.
    pub async fn dispatch(&self, error: Error) -> Response {
        self.report(&error).await;
        error.into_response()
    }
}
