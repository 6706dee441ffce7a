//! The one error type every dashboard operation returns.
//!
//! Transport failures, server-reported errors and client-side validation all
//! become an [`Error`] carrying an [`ErrorCode`], a message and optional
//! structured details. Views show [`Error::display_message`] as a transient
//! notification; nothing here is fatal and no class is retried.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error as ThisError;

/// Failure category a view can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Input failed validation before or at the backend.
    InvalidRequest,
    /// No usable session, or the backend rejected the credentials.
    Unauthorized,
    /// The caller's role may not perform the action.
    Forbidden,
    /// The addressed record is gone.
    NotFound,
    /// The write clashes with existing server state.
    Conflict,
    /// The backend could not be reached, timed out or failed.
    ServiceUnavailable,
    /// The consuming view went away before the request settled.
    Cancelled,
    /// Anything the client cannot explain, such as an undecodable payload.
    InternalError,
}

impl ErrorCode {
    /// Sentence used when an error is raised without a message of its own.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::InvalidRequest => "The request was invalid",
            Self::Unauthorized => "Please sign in again",
            Self::Forbidden => "You are not allowed to do that",
            Self::NotFound => "The record no longer exists",
            Self::Conflict => "The record was changed elsewhere",
            Self::ServiceUnavailable => "The server could not be reached",
            Self::Cancelled => "The view was closed",
            Self::InternalError => "Something went wrong",
        }
    }
}

/// Dashboard failure: code, notification text and optional details.
///
/// The message is never blank; see [`Error::new`].
///
/// # Examples
/// ```
/// use dashboard::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("Region not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.to_string(), "Region not found");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ThisError)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "RawError")]
#[error("{message}")]
pub struct Error {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// Raised by [`Error::try_new`] for a blank message.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ErrorValidationError {
    /// The message is empty once trimmed.
    #[error("error message must not be empty")]
    EmptyMessage,
}

impl Error {
    /// Create an error; a blank message is replaced by the code's
    /// [`ErrorCode::fallback_message`].
    ///
    /// # Examples
    /// ```
    /// use dashboard::domain::{Error, ErrorCode};
    ///
    /// let err = Error::new(ErrorCode::Forbidden, "  ");
    /// assert_eq!(err.message(), ErrorCode::Forbidden.fallback_message());
    /// ```
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::try_new(code, message).unwrap_or_else(|_| Self {
            code,
            message: code.fallback_message().to_owned(),
            details: None,
        })
    }

    /// Create an error, refusing a blank message.
    pub fn try_new(code: ErrorCode, message: impl Into<String>) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            details: None,
        })
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Structured context, e.g. the missing filters or failed users.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details.
    ///
    /// # Examples
    /// ```
    /// use dashboard::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_request("Please select all filters")
    ///     .with_details(json!({ "missing": ["country"] }));
    /// assert_eq!(err.details().unwrap()["missing"][0], "country");
    /// ```
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Message shown in the transient notification.
    ///
    /// Internal failures collapse to the generic sentence; every other class
    /// shows its own message.
    pub fn display_message(&self) -> &str {
        match self.code {
            ErrorCode::InternalError => ErrorCode::InternalError.fallback_message(),
            _ => self.message(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Cancelled, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

/// Wire shape checked before it becomes an [`Error`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawError {
    code: ErrorCode,
    message: String,
    #[serde(default)]
    details: Option<Value>,
}

impl TryFrom<RawError> for Error {
    type Error = ErrorValidationError;

    fn try_from(raw: RawError) -> Result<Self, Self::Error> {
        let mut error = Self::try_new(raw.code, raw.message)?;
        error.details = raw.details;
        Ok(error)
    }
}
