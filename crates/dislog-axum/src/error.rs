//! Failure classification for HTTP handlers.
//!
//! This module maps every failure surfaced during request handling onto a
//! fixed table of categories, each carrying an HTTP status code and a
//! default client-facing message used when the failure brings no message of
//! its own.

use std::borrow::Cow;
use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::response::ErrorBody;

/// A specialized [`Result`] type for handlers that fail with a classified
/// [`Error`].
///
/// [`Result`]: std::result::Result
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Enumeration of the handled failure categories.
///
/// Each variant corresponds to one HTTP status code. Failures that match no
/// category fall back to [`InternalServerError`](Self::InternalServerError).
#[must_use = "error kinds do nothing unless used to create errors"]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    // 4xx Client Errors
    /// 400 Bad Request - Invalid request data
    BadRequest,
    /// 401 Unauthorized - Invalid credentials
    Unauthorized,
    /// 403 Forbidden - Access denied
    Forbidden,
    /// 404 Not Found - Resource not found
    NotFound,
    /// 406 Not Acceptable - Unsupported response format
    NotAcceptable,
    /// 408 Request Timeout - Request processing timed out
    RequestTimeout,
    /// 409 Conflict - Conflicting resource state
    Conflict,
    /// 422 Unprocessable Entity - Validation failed
    UnprocessableEntity,

    // 5xx Server Errors
    /// 500 Internal Server Error - Unexpected server error
    #[default]
    InternalServerError,
}

impl ErrorKind {
    /// Returns the HTTP status code for this failure category.
    #[inline]
    pub const fn status_code(self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::NotAcceptable => StatusCode::NOT_ACCEPTABLE,
            Self::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            Self::Conflict => StatusCode::CONFLICT,
            Self::UnprocessableEntity => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the snake_case name of this failure category.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BadRequest => "bad_request",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::NotAcceptable => "not_acceptable",
            Self::RequestTimeout => "request_timeout",
            Self::Conflict => "conflict",
            Self::UnprocessableEntity => "unprocessable_entity",
            Self::InternalServerError => "internal_server_error",
        }
    }

    /// Returns the default client-facing message for this category.
    #[inline]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::BadRequest => "Bad request",
            Self::Unauthorized => "Unauthorized access",
            Self::Forbidden => "Access forbidden",
            Self::NotFound => "Resource not found",
            Self::NotAcceptable => "Not acceptable",
            Self::RequestTimeout => "Request timeout",
            Self::Conflict => "Resource conflict",
            Self::UnprocessableEntity => "Validation failed",
            Self::InternalServerError => "Internal server error",
        }
    }

    /// Converts this kind into a full [`Error`].
    #[inline]
    pub fn into_error(self) -> Error {
        Error::new(self)
    }

    /// Creates an [`Error`] with the specified message.
    #[inline]
    pub fn with_message(self, message: impl Into<Cow<'static, str>>) -> Error {
        Error::new(self).with_message(message)
    }

    /// Creates an [`Error`] with the specified details.
    #[inline]
    pub fn with_details(self, details: impl IntoIterator<Item = impl Into<String>>) -> Error {
        Error::new(self).with_details(details)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl IntoResponse for ErrorKind {
    #[inline]
    fn into_response(self) -> Response {
        self.into_error().into_response()
    }
}

/// The error type for HTTP handlers.
///
/// Carries the failure category together with an optional custom message,
/// optional per-field violation details and optional backtrace lines
/// forwarded to the notification side channel.
#[must_use = "errors do nothing unless rendered"]
#[derive(Debug, Clone, Default)]
pub struct Error {
    kind: ErrorKind,
    message: Option<Cow<'static, str>>,
    details: Option<Vec<String>>,
    backtrace: Option<Vec<String>>,
}

impl Error {
    /// Creates a new [`Error`] with the specified kind.
    #[inline]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            details: None,
            backtrace: None,
        }
    }

    /// Sets a custom client-facing message.
    ///
    /// Empty or whitespace-only messages are discarded and the category
    /// default is used instead.
    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        let message = message.into();
        if !message.trim().is_empty() {
            self.message = Some(message);
        }
        self
    }

    /// Attaches per-field violation details.
    pub fn with_details(mut self, details: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.details = Some(details.into_iter().map(Into::into).collect());
        self
    }

    /// Attaches backtrace lines forwarded to the notifier.
    pub fn with_backtrace(mut self, backtrace: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.backtrace = Some(backtrace.into_iter().map(Into::into).collect());
        self
    }

    /// Returns the failure category.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the effective client-facing message.
    #[inline]
    pub fn message(&self) -> &str {
        self.message
            .as_deref()
            .unwrap_or_else(|| self.kind.default_message())
    }

    /// Returns the attached details, if any.
    #[inline]
    pub fn details(&self) -> Option<&[String]> {
        self.details.as_deref()
    }

    /// Returns the attached backtrace lines, if any.
    #[inline]
    pub fn backtrace(&self) -> Option<&[String]> {
        self.backtrace.as_deref()
    }

    /// Returns the HTTP status code for this error.
    #[inline]
    pub fn status_code(&self) -> StatusCode {
        self.kind.status_code()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {}",
            self.kind.name(),
            self.status_code().as_u16(),
            self.message()
        )
    }
}

impl std::error::Error for Error {}

impl From<ErrorKind> for Error {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Extraction of per-field violation details from structured validation
/// state.
///
/// Falls back to the overall validation message when no field-level errors
/// are present; it never fails.
impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, violations)| {
                violations.iter().map(move |violation| {
                    match violation.message.as_deref() {
                        Some(message) => format!("{field}: {message}"),
                        None => format!("{field}: {}", violation.code),
                    }
                })
            })
            .collect();

        if details.is_empty() {
            details.push(errors.to_string());
        } else {
            // HashMap iteration order is unspecified.
            details.sort();
        }

        Error::new(ErrorKind::UnprocessableEntity).with_details(details)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let mut response = ErrorBody::from_error(&self).into_response();

        // Stashed so the reporting middleware can observe the failure after
        // the inner service has run.
        response.extensions_mut().insert(self);

        response
    }
}
