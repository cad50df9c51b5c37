//! Client-facing error body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// JSON body rendered to the client for every classified failure.
///
/// The notification side channel never changes this body: the client
/// receives the same response whether delivery succeeded, failed or was
/// skipped.
#[must_use = "error bodies do nothing unless serialized"]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Numeric HTTP status code of the failure.
    pub status: u16,
    /// Client-facing error message.
    pub message: String,
    /// UTC time the failure was rendered, ISO-8601 with second precision.
    pub timestamp: String,
    /// Per-field violation details, present only when extracted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ErrorBody {
    /// Builds the body for a classified failure, stamped with the current
    /// time.
    pub fn from_error(error: &Error) -> Self {
        Self {
            status: error.status_code().as_u16(),
            message: error.message().to_string(),
            timestamp: Timestamp::now().strftime("%Y-%m-%dT%H:%M:%SZ").to_string(),
            details: error.details().map(<[String]>::to_vec),
        }
    }
}

impl IntoResponse for ErrorBody {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;

    use super::*;

    #[test]
    fn test_body_from_error() {
        let error = ErrorKind::NotFound.with_message("Document not found");
        let body = ErrorBody::from_error(&error);

        assert_eq!(body.status, 404);
        assert_eq!(body.message, "Document not found");
        assert!(body.details.is_none());
    }

    #[test]
    fn test_timestamp_format() {
        let body = ErrorBody::from_error(&Error::default());

        assert_eq!(body.timestamp.len(), 20);
        assert!(body.timestamp.ends_with('Z'));
        assert_eq!(&body.timestamp[4..5], "-");
        assert_eq!(&body.timestamp[10..11], "T");
    }

    #[test]
    fn test_details_skipped_when_absent() {
        let body = ErrorBody::from_error(&Error::default());
        let json = serde_json::to_string(&body).unwrap();

        assert!(!json.contains("details"));
    }

    #[test]
    fn test_details_serialized_when_present() {
        let error = ErrorKind::UnprocessableEntity.with_details(["name: can't be blank"]);
        let body = ErrorBody::from_error(&error);
        let json: serde_json::Value = serde_json::to_value(&body).unwrap();

        assert_eq!(json["status"], 422);
        assert_eq!(json["details"][0], "name: can't be blank");
    }
}
