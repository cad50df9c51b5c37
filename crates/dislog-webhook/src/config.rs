//! Notification configuration and environment gating.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Default username shown for the webhook bot.
pub const DEFAULT_BOT_USERNAME: &str = "Error Logger";

/// Default number of backtrace lines included per notification.
pub const DEFAULT_BACKTRACE_LINES: usize = 5;

/// Default timeout for webhook HTTP requests: 30 seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration validation error, surfaced to the operator at startup.
///
/// Nothing calls [`NotifyConfig::validate`] automatically; host applications
/// that want fail-fast startup behavior invoke it explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No webhook URL was configured.
    #[error("webhook URL is required")]
    MissingWebhookUrl,
    /// The bot username was empty.
    #[error("bot username is required")]
    MissingBotUsername,
    /// No environment name was configured.
    #[error("environment must be present")]
    MissingEnvironment,
}

/// Embed colors keyed by HTTP status code, with a fallback for the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorMap {
    /// Colors for explicitly mapped status codes.
    #[serde(default)]
    pub by_status: HashMap<u16, u32>,
    /// Color used for statuses without an explicit entry.
    #[serde(default = "default_fallback_color")]
    pub fallback: u32,
}

fn default_fallback_color() -> u32 {
    10181046 // gray for others
}

impl Default for ColorMap {
    fn default() -> Self {
        let by_status = HashMap::from([
            (500, 15158332), // red for server errors
            (404, 3447003),  // blue for not found
            (422, 16776960), // yellow for validation errors
            (403, 15105570), // orange for forbidden
        ]);

        Self {
            by_status,
            fallback: default_fallback_color(),
        }
    }
}

impl ColorMap {
    /// Returns the embed color for the given status code.
    pub fn color_for(&self, status: u16) -> u32 {
        self.by_status.get(&status).copied().unwrap_or(self.fallback)
    }
}

/// Operator-supplied settings for the notification side channel.
///
/// Constructed once at process start and treated as immutable afterwards;
/// the notifier shares it across concurrent dispatches without locking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Discord webhook endpoint. Delivery is skipped while unset.
    #[serde(default)]
    pub webhook_url: Option<Url>,

    /// Name of the current deployment environment.
    #[serde(default)]
    pub environment: Option<String>,

    /// Username shown for the webhook bot.
    #[serde(default = "default_bot_username")]
    pub bot_username: String,

    /// Embed colors keyed by HTTP status.
    #[serde(default)]
    pub color_map: ColorMap,

    /// Maximum number of backtrace lines included per notification.
    #[serde(default = "default_backtrace_lines")]
    pub backtrace_lines_limit: usize,

    /// Environments for which notifications are dispatched.
    #[serde(default = "default_enabled_environments")]
    pub enabled_environments: Vec<String>,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub http_timeout: u64,
}

fn default_bot_username() -> String {
    DEFAULT_BOT_USERNAME.to_string()
}

fn default_backtrace_lines() -> usize {
    DEFAULT_BACKTRACE_LINES
}

fn default_enabled_environments() -> Vec<String> {
    vec!["production".to_string(), "staging".to_string()]
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            environment: None,
            bot_username: default_bot_username(),
            color_map: ColorMap::default(),
            backtrace_lines_limit: default_backtrace_lines(),
            enabled_environments: default_enabled_environments(),
            http_timeout: default_timeout_secs(),
        }
    }
}

impl NotifyConfig {
    /// Sets the webhook URL.
    #[must_use]
    pub fn with_webhook_url(mut self, webhook_url: Url) -> Self {
        self.webhook_url = Some(webhook_url);
        self
    }

    /// Sets the deployment environment name.
    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Sets the bot username.
    #[must_use]
    pub fn with_bot_username(mut self, bot_username: impl Into<String>) -> Self {
        self.bot_username = bot_username.into();
        self
    }

    /// Sets the embed color table.
    #[must_use]
    pub fn with_color_map(mut self, color_map: ColorMap) -> Self {
        self.color_map = color_map;
        self
    }

    /// Sets the backtrace line limit.
    #[must_use]
    pub fn with_backtrace_lines_limit(mut self, limit: usize) -> Self {
        self.backtrace_lines_limit = limit;
        self
    }

    /// Sets the environments for which notifications are dispatched.
    #[must_use]
    pub fn with_enabled_environments(
        mut self,
        environments: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.enabled_environments = environments.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the HTTP timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.http_timeout = timeout_secs;
        self
    }

    /// Returns the HTTP timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout)
    }

    /// Checks that the configuration is complete enough to deliver.
    ///
    /// Advisory only: the notifier does not call this and degrades to a
    /// no-op on incomplete configuration instead.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.webhook_url.is_none() {
            return Err(ConfigError::MissingWebhookUrl);
        }

        if self.bot_username.trim().is_empty() {
            return Err(ConfigError::MissingBotUsername);
        }

        match self.environment.as_deref() {
            Some(environment) if !environment.trim().is_empty() => Ok(()),
            _ => Err(ConfigError::MissingEnvironment),
        }
    }

    /// Returns whether the current environment permits notifications.
    ///
    /// True iff an environment is set, the enabled set is non-empty and the
    /// environment is a member of it. Missing inputs map to `false`, never
    /// to an error.
    pub fn is_enabled(&self) -> bool {
        let Some(environment) = self.environment.as_deref() else {
            return false;
        };

        if environment.is_empty() || self.enabled_environments.is_empty() {
            return false;
        }

        self.enabled_environments
            .iter()
            .any(|enabled| enabled == environment)
    }
}
