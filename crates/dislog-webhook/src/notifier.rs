//! Best-effort delivery of error notifications to a Discord webhook.

use std::sync::Arc;

use jiff::Timestamp;
use reqwest::Client;
use url::Url;
use uuid::Uuid;

use crate::ErrorNotifier;
use crate::config::NotifyConfig;
use crate::delivery::DeliveryReceipt;
use crate::error::Result;
use crate::formatter::DiscordFormatter;
use crate::payload::DiscordPayload;

/// Tracing target for notifier operations.
pub const TRACING_TARGET: &str = "dislog_webhook::notifier";

/// Inner client that holds the HTTP client and configuration.
struct DiscordNotifierInner {
    http: Client,
    config: NotifyConfig,
}

/// Discord-backed [`ErrorNotifier`] with total failure containment.
///
/// Each notification is a single synchronous `POST` bounded by the
/// configured timeout. There is no retry, no backoff and no queue: a failed
/// delivery is logged and lost. Cheap to clone; clones share the underlying
/// HTTP client.
#[derive(Clone)]
pub struct DiscordNotifier {
    inner: Arc<DiscordNotifierInner>,
}

impl std::fmt::Debug for DiscordNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordNotifier")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl DiscordNotifier {
    /// Creates a new notifier with the given configuration.
    pub fn new(config: NotifyConfig) -> Self {
        let timeout = config.timeout();

        tracing::debug!(
            target: TRACING_TARGET,
            timeout_ms = timeout.as_millis(),
            "Creating webhook client"
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("dislog/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to create HTTP client");

        let inner = DiscordNotifierInner { http, config };

        Self {
            inner: Arc::new(inner),
        }
    }

    /// Gets the notifier configuration.
    pub fn config(&self) -> &NotifyConfig {
        &self.inner.config
    }

    fn http(&self) -> &Client {
        &self.inner.http
    }

    /// Performs a single POST of the payload to the webhook endpoint.
    async fn deliver(&self, url: &Url, payload: &DiscordPayload) -> Result<DeliveryReceipt> {
        let request_id = Uuid::now_v7();
        let started_at = Timestamp::now();
        let body = serde_json::to_vec(payload)?;

        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request_id,
            "Delivering notification"
        );

        let response = self
            .http()
            .post(url.as_str())
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;

        Ok(DeliveryReceipt::new(
            request_id,
            response.status().as_u16(),
            started_at,
        ))
    }
}

#[async_trait::async_trait]
impl ErrorNotifier for DiscordNotifier {
    async fn notify(&self, message: &str, status: u16, backtrace: Option<&[String]>) -> bool {
        let config = self.config();

        // Both gates are required: an enabled environment and a configured
        // webhook URL. Anything else is a silent no-op.
        let Some(url) = config.webhook_url.as_ref().filter(|_| config.is_enabled()) else {
            tracing::debug!(
                target: TRACING_TARGET,
                status,
                environment = config.environment.as_deref().unwrap_or_default(),
                "Notification skipped"
            );
            return false;
        };

        let payload = DiscordFormatter::new(message, status, backtrace, config).format();

        match self.deliver(url, &payload).await {
            Ok(receipt) if receipt.is_success() => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    request_id = %receipt.request_id,
                    status_code = receipt.status_code,
                    duration = %receipt.duration(),
                    "Notification delivered"
                );
                true
            }
            Ok(receipt) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    request_id = %receipt.request_id,
                    status_code = receipt.status_code,
                    "Webhook endpoint rejected the notification"
                );
                false
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %error,
                    "Notification delivery failed"
                );
                false
            }
        }
    }
}
