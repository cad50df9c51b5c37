//! Error types for webhook delivery.

use thiserror::Error;

/// Result type alias for delivery operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for a single delivery attempt.
///
/// Never crosses the notifier boundary: the notifier logs it and reports a
/// plain failure indicator to its caller.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_error_display() {
        let source = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let error = Error::from(source);

        assert!(error.to_string().starts_with("Serialization error"));
    }
}
