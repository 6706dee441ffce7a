//! Errors shared by every backend API port.

use serde_json::json;

use super::define_port_error;
use crate::domain::Error;

define_port_error! {
    /// Failure reported by a backend API adapter.
    pub enum ApiError {
        /// Network transport failed before a response arrived.
        Transport { message: String } =>
            "request failed: {message}",
        /// The request exceeded the configured timeout.
        Timeout { message: String } =>
            "request timed out: {message}",
        /// The backend rejected the token or credentials.
        Unauthorized { message: String } =>
            "unauthorized: {message}",
        /// The backend refused the action for this caller.
        Forbidden { message: String } =>
            "forbidden: {message}",
        /// The addressed record does not exist.
        NotFound { message: String } =>
            "not found: {message}",
        /// The backend answered with another error status.
        Rejected { status: u16, message: String } =>
            "rejected with status {status}: {message}",
        /// The response body could not be decoded.
        Decode { message: String } =>
            "invalid response payload: {message}",
    }
}

impl ApiError {
    /// Message suitable for a notification.
    ///
    /// Server-reported messages are passed through; transport and decode
    /// failures keep their prefixed description.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized { message }
            | Self::Forbidden { message }
            | Self::NotFound { message }
            | Self::Rejected { message, .. } => message.clone(),
            Self::Transport { .. } | Self::Timeout { .. } | Self::Decode { .. } => self.to_string(),
        }
    }
}

impl From<ApiError> for Error {
    fn from(value: ApiError) -> Self {
        let message = value.user_message();
        match value {
            ApiError::Transport { .. } | ApiError::Timeout { .. } => {
                Self::service_unavailable(message)
            }
            ApiError::Unauthorized { .. } => Self::unauthorized(message),
            ApiError::Forbidden { .. } => Self::forbidden(message),
            ApiError::NotFound { .. } => Self::not_found(message),
            ApiError::Rejected { status, .. } => {
                let error = match status {
                    409 => Self::conflict(message),
                    400..=499 => Self::invalid_request(message),
                    _ => Self::service_unavailable(message),
                };
                error.with_details(json!({ "status": status }))
            }
            ApiError::Decode { .. } => Self::internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(ApiError::transport("connection refused"), ErrorCode::ServiceUnavailable, "request failed: connection refused")]
    #[case(ApiError::timeout("30s"), ErrorCode::ServiceUnavailable, "request timed out: 30s")]
    #[case(ApiError::unauthorized("Invalid token"), ErrorCode::Unauthorized, "Invalid token")]
    #[case(ApiError::forbidden("Admins only"), ErrorCode::Forbidden, "Admins only")]
    #[case(ApiError::not_found("User not found"), ErrorCode::NotFound, "User not found")]
    #[case(ApiError::rejected(409_u16, "Region already exists"), ErrorCode::Conflict, "Region already exists")]
    #[case(ApiError::rejected(422_u16, "Name is invalid"), ErrorCode::InvalidRequest, "Name is invalid")]
    #[case(ApiError::rejected(502_u16, "Bad gateway"), ErrorCode::ServiceUnavailable, "Bad gateway")]
    #[case(ApiError::decode("missing field `_id`"), ErrorCode::InternalError, "invalid response payload: missing field `_id`")]
    fn maps_to_domain_errors(
        #[case] error: ApiError,
        #[case] code: ErrorCode,
        #[case] message: &str,
    ) {
        let mapped = Error::from(error);
        assert_eq!(mapped.code(), code);
        assert_eq!(mapped.message(), message);
    }

    #[rstest]
    fn rejected_status_is_kept_in_details() {
        let mapped = Error::from(ApiError::rejected(400_u16, "bad"));
        assert_eq!(mapped.details().map(|d| d["status"].clone()), Some(json!(400)));
    }
}
