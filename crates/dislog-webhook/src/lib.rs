#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;

pub mod config;
pub mod delivery;
pub mod formatter;
pub mod notifier;
pub mod payload;

pub use config::{ColorMap, ConfigError, NotifyConfig};
pub use delivery::DeliveryReceipt;
pub use error::{Error, Result};
pub use formatter::DiscordFormatter;
pub use notifier::DiscordNotifier;
pub use payload::{DiscordPayload, Embed, EmbedField};

/// Core trait for error-notification delivery.
///
/// Implement this trait to create custom notification providers, or to
/// substitute a recording double in tests.
#[async_trait::async_trait]
pub trait ErrorNotifier: Send + Sync {
    /// Delivers a notification for a classified failure, best-effort.
    ///
    /// The returned flag reports whether a delivery was attempted and
    /// acknowledged; it is purely informational and callers must not use it
    /// for control flow. Implementations never panic and never surface
    /// delivery faults to the caller.
    async fn notify(&self, message: &str, status: u16, backtrace: Option<&[String]>) -> bool;
}
