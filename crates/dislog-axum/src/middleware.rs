//! Error-reporting and recovery middleware for `axum::Router`.
//!
//! This module wires the dispatcher into the request lifecycle: classified
//! failures rendered by handlers are observed after the inner service has
//! run and forwarded to the notification side channel, panics are converted
//! to internal-error responses, and timed-out requests are classified as
//! request timeouts.

use std::any::Any;
use std::future::ready;
use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tower_http::catch_panic::CatchPanicLayer;

use crate::dispatcher::ErrorDispatcher;
use crate::error::{Error, ErrorKind};

/// Tracing target for error recovery.
const TRACING_TARGET_ERROR: &str = "dislog_axum::recovery::error";

/// Tracing target for panic recovery.
const TRACING_TARGET_PANIC: &str = "dislog_axum::recovery::panic";

type ResponseFut = BoxFuture<'static, Response>;
type Panic = Box<dyn Any + Send + 'static>;

/// Configuration for recovery middleware behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct RecoveryConfig {
    /// Maximum duration in seconds to wait for a request to complete before
    /// timing out. Requests exceeding this duration receive a 408 response.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
        }
    }
}

impl RecoveryConfig {
    /// Creates a new configuration with the specified request timeout in
    /// seconds.
    pub fn with_timeout_secs(secs: u64) -> Self {
        Self {
            request_timeout: secs,
        }
    }

    /// Returns the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

/// Extension trait for `axum::`[`Router`] to wire failure reporting.
pub trait RouterReportingExt<S> {
    /// Layers the reporting middleware and panic recovery.
    ///
    /// Apply this last so the reporting layer is outermost and observes
    /// failures produced by every inner layer, including timeouts added by
    /// [`with_recovery`](Self::with_recovery).
    fn with_error_reporting(self, dispatcher: ErrorDispatcher) -> Self;

    /// Layers timeout recovery with the provided configuration.
    ///
    /// Timed-out requests are classified as request timeouts; any other
    /// service error falls back to an internal server error.
    fn with_recovery(self, config: &RecoveryConfig) -> Self;

    /// Layers timeout recovery with default configuration.
    ///
    /// Uses a 30-second timeout suitable for most production environments.
    fn with_default_recovery(self) -> Self;
}

impl<S> RouterReportingExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_error_reporting(self, dispatcher: ErrorDispatcher) -> Self {
        let middlewares = ServiceBuilder::new()
            .layer(middleware::from_fn_with_state(dispatcher, report_errors))
            .layer(CatchPanicLayer::custom(catch_panic));

        self.layer(middlewares)
    }

    fn with_recovery(self, config: &RecoveryConfig) -> Self {
        let middlewares = ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_error))
            .layer(TimeoutLayer::new(config.request_timeout()));

        self.layer(middlewares)
    }

    fn with_default_recovery(self) -> Self {
        self.with_recovery(&RecoveryConfig::default())
    }
}

/// Middleware observing classified failures after the inner service runs.
///
/// [`Error`]'s `IntoResponse` stashes the failure in response extensions;
/// this middleware picks it up and forwards it to the dispatcher. The
/// response itself is returned unchanged.
pub async fn report_errors(
    State(dispatcher): State<ErrorDispatcher>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    if let Some(error) = response.extensions().get::<Error>() {
        dispatcher.report(error).await;
    }

    response
}

fn handle_error(err: tower::BoxError) -> ResponseFut {
    use tower::timeout::error::Elapsed;

    // Most specific category first; anything unrecognized falls back to an
    // internal server error with the generic message.
    let error = if err.downcast_ref::<Elapsed>().is_some() {
        tracing::error!(
            target: TRACING_TARGET_ERROR,
            error = %err,
            "request timeout exceeded"
        );

        Error::new(ErrorKind::RequestTimeout)
    } else {
        tracing::error!(
            target: TRACING_TARGET_ERROR,
            error = %err,
            "unknown middleware error"
        );

        Error::new(ErrorKind::InternalServerError)
    };

    ready(error.into_response()).boxed()
}

fn catch_panic(err: Panic) -> Response {
    // A handler that panicked with a classified failure keeps its category.
    if let Some(error) = err.downcast_ref::<Error>() {
        tracing::error!(
            target: TRACING_TARGET_PANIC,
            error = %error,
            "service panic"
        );
        return error.clone().into_response();
    }

    let message = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic type");

    tracing::error!(
        target: TRACING_TARGET_PANIC,
        message = %message,
        "service panic"
    );

    Error::new(ErrorKind::InternalServerError).into_response()
}
