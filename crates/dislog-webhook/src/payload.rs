//! Discord webhook payload types.

use serde::{Deserialize, Serialize};

/// The top-level body POSTed to a Discord webhook endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscordPayload {
    /// Username shown for the webhook bot.
    pub username: String,

    /// Rich embeds carried by the message.
    pub embeds: Vec<Embed>,
}

/// A single rich embed within a webhook message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    /// Embed headline.
    pub title: String,

    /// Embed body text.
    pub description: String,

    /// Accent color as a 24-bit RGB integer.
    pub color: u32,

    /// Ordered name/value fields rendered below the description.
    pub fields: Vec<EmbedField>,

    /// ISO-8601 timestamp shown in the embed footer.
    pub timestamp: String,
}

/// A name/value pair rendered inside an embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    /// Field label.
    pub name: String,
    /// Field content.
    pub value: String,
    /// Whether the field is laid out inline with its neighbors.
    pub inline: bool,
}

impl EmbedField {
    /// Creates a new embed field.
    pub fn new(name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline,
        }
    }
}
