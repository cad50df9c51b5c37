//! Formatting of classified failures into Discord payloads.

use jiff::Timestamp;

use crate::config::NotifyConfig;
use crate::payload::{DiscordPayload, Embed, EmbedField};

/// Marker line appended when a backtrace was cut at the configured limit.
const TRUNCATION_MARKER: &str = "... (truncated)";

/// Builds a [`DiscordPayload`] from a classified failure.
///
/// Formatting is pure and performs no I/O: identical inputs produce
/// identical payloads apart from the timestamp stamped by
/// [`format`](Self::format).
#[derive(Debug, Clone)]
pub struct DiscordFormatter<'a> {
    message: &'a str,
    status: u16,
    backtrace: Option<&'a [String]>,
    config: &'a NotifyConfig,
}

impl<'a> DiscordFormatter<'a> {
    /// Creates a formatter for a single failure.
    pub fn new(
        message: &'a str,
        status: u16,
        backtrace: Option<&'a [String]>,
        config: &'a NotifyConfig,
    ) -> Self {
        Self {
            message,
            status,
            backtrace,
            config,
        }
    }

    /// Formats the failure, stamped with the current UTC time.
    pub fn format(&self) -> DiscordPayload {
        self.format_at(Timestamp::now())
    }

    /// Formats the failure with an explicit timestamp.
    pub fn format_at(&self, at: Timestamp) -> DiscordPayload {
        let environment = self.config.environment.as_deref().unwrap_or_default();

        let embed = Embed {
            title: format!(
                "{} - Error Notification ({})",
                capitalize(environment),
                self.status
            ),
            description: self.message.to_string(),
            color: self.config.color_map.color_for(self.status),
            fields: self.build_fields(environment),
            timestamp: format_timestamp(at),
        };

        DiscordPayload {
            username: self.config.bot_username.clone(),
            embeds: vec![embed],
        }
    }

    fn build_fields(&self, environment: &str) -> Vec<EmbedField> {
        let mut fields = vec![
            EmbedField::new("Status Code", self.status.to_string(), true),
            EmbedField::new("Environment", environment, true),
        ];

        // An absent or empty backtrace produces no field at all.
        if let Some(backtrace) = self.backtrace.filter(|lines| !lines.is_empty()) {
            fields.push(EmbedField::new(
                "Backtrace",
                self.format_backtrace(backtrace),
                false,
            ));
        }

        fields
    }

    fn format_backtrace(&self, backtrace: &[String]) -> String {
        let limit = self.config.backtrace_lines_limit;
        let mut value = backtrace
            .iter()
            .take(limit)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n");

        if backtrace.len() >= limit {
            value.push('\n');
            value.push_str(TRUNCATION_MARKER);
        }

        value
    }
}

/// Uppercases the first character and lowercases the rest.
fn capitalize(value: &str) -> String {
    let mut chars = value.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// UTC ISO-8601 with second precision and a trailing `Z`.
fn format_timestamp(at: Timestamp) -> String {
    at.strftime("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> NotifyConfig {
        NotifyConfig::default().with_environment("production")
    }

    fn timestamp() -> Timestamp {
        Timestamp::from_second(1704110400).unwrap() // 2024-01-01T12:00:00Z
    }

    #[test]
    fn test_format_with_backtrace() {
        let config = config();
        let backtrace = vec!["line 1".to_string(), "line 2".to_string()];
        let formatter =
            DiscordFormatter::new("Test error message", 500, Some(&backtrace), &config);

        let payload = formatter.format_at(timestamp());

        assert_eq!(payload.username, "Error Logger");
        assert_eq!(payload.embeds.len(), 1);

        let embed = &payload.embeds[0];
        assert_eq!(embed.title, "Production - Error Notification (500)");
        assert_eq!(embed.description, "Test error message");
        assert_eq!(embed.color, 15158332);
        assert_eq!(embed.timestamp, "2024-01-01T12:00:00Z");
        assert_eq!(
            embed.fields,
            vec![
                EmbedField::new("Status Code", "500", true),
                EmbedField::new("Environment", "production", true),
                EmbedField::new("Backtrace", "line 1\nline 2", false),
            ]
        );
    }

    #[test]
    fn test_format_without_backtrace() {
        let config = config();
        let formatter = DiscordFormatter::new("missing", 404, None, &config);

        let payload = formatter.format_at(timestamp());
        let embed = &payload.embeds[0];

        assert_eq!(embed.title, "Production - Error Notification (404)");
        assert_eq!(embed.color, 3447003);
        assert_eq!(
            embed.fields,
            vec![
                EmbedField::new("Status Code", "404", true),
                EmbedField::new("Environment", "production", true),
            ]
        );
    }

    #[test]
    fn test_empty_backtrace_omits_field() {
        let config = config();
        let backtrace: Vec<String> = Vec::new();
        let formatter = DiscordFormatter::new("boom", 500, Some(&backtrace), &config);

        let payload = formatter.format_at(timestamp());

        assert_eq!(payload.embeds[0].fields.len(), 2);
    }

    #[test]
    fn test_backtrace_truncation() {
        let config = config();
        let backtrace: Vec<String> = (1..=8).map(|n| format!("line {n}")).collect();
        let formatter = DiscordFormatter::new("boom", 500, Some(&backtrace), &config);

        let payload = formatter.format_at(timestamp());
        let field = &payload.embeds[0].fields[2];

        assert_eq!(
            field.value,
            "line 1\nline 2\nline 3\nline 4\nline 5\n... (truncated)"
        );
    }

    #[test]
    fn test_backtrace_at_limit_is_marked() {
        let config = config();
        let backtrace: Vec<String> = (1..=5).map(|n| format!("line {n}")).collect();
        let formatter = DiscordFormatter::new("boom", 500, Some(&backtrace), &config);

        let payload = formatter.format_at(timestamp());
        let field = &payload.embeds[0].fields[2];

        assert!(field.value.ends_with("... (truncated)"));
    }

    #[test]
    fn test_backtrace_below_limit_is_not_marked() {
        let config = config();
        let backtrace = vec!["line 1".to_string()];
        let formatter = DiscordFormatter::new("boom", 500, Some(&backtrace), &config);

        let payload = formatter.format_at(timestamp());
        let field = &payload.embeds[0].fields[2];

        assert_eq!(field.value, "line 1");
    }

    #[test]
    fn test_unmapped_status_uses_fallback_color() {
        let config = config();
        let formatter = DiscordFormatter::new("teapot", 418, None, &config);

        let payload = formatter.format_at(timestamp());

        assert_eq!(payload.embeds[0].color, 10181046);
    }

    #[test]
    fn test_environment_is_capitalized() {
        let config = NotifyConfig::default().with_environment("STAGING");
        let formatter = DiscordFormatter::new("boom", 500, None, &config);

        let payload = formatter.format_at(timestamp());

        assert_eq!(payload.embeds[0].title, "Staging - Error Notification (500)");
        assert_eq!(payload.embeds[0].fields[1].value, "STAGING");
    }

    #[test]
    fn test_format_is_deterministic() {
        let config = config();
        let backtrace = vec!["line 1".to_string()];
        let formatter = DiscordFormatter::new("boom", 500, Some(&backtrace), &config);

        let at = timestamp();

        assert_eq!(formatter.format_at(at), formatter.format_at(at));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("production"), "Production");
        assert_eq!(capitalize("STAGING"), "Staging");
        assert_eq!(capitalize(""), "");
    }
}
