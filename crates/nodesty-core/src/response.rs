//! The normalized result envelope returned by every API call.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;

/// Classification of a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The server answered with a 5xx status. Retried by the transport.
    ServerError,
    /// The server answered with a non-success, non-5xx status.
    ClientError,
    /// The request was sent but no complete response came back.
    NetworkError,
    /// The request could not be built or sent.
    RequestError,
    /// A success response carried a body that does not match the expected shape.
    DecodeError,
}

impl FailureKind {
    /// Stable error code, matching [`Error::error_code`].
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ServerError => "SERVER_ERROR",
            Self::ClientError => "CLIENT_ERROR",
            Self::NetworkError => "NETWORK_ERROR",
            Self::RequestError => "REQUEST_ERROR",
            Self::DecodeError => "DECODE_ERROR",
        }
    }

    /// Only server errors are worth retrying.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::ServerError)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Outcome of one API call.
///
/// A success carries an optional payload (absent for empty bodies such as
/// `204 No Content`) and the status text as its message. A failure carries a
/// short `error` label, a longer `message` and a [`FailureKind`]. The fields are
/// private so a value is always one or the other, never a mix.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<FailureKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    attempts: u32,
}

impl<T> ApiResponse<T> {
    /// Build a success envelope.
    #[must_use]
    pub fn ok(data: Option<T>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
            error: None,
            kind: None,
            status: None,
            attempts: 1,
        }
    }

    /// Build a failure envelope.
    #[must_use]
    pub fn failure(kind: FailureKind, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            error: Some(error.into()),
            kind: Some(kind),
            status: None,
            attempts: 1,
        }
    }

    /// Build a request-error envelope for a call that was never sent.
    #[must_use]
    pub fn request_error(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.is_empty() {
            "Unknown error occurred".to_string()
        } else {
            message
        };
        Self::failure(FailureKind::RequestError, "Request Error", message)
    }

    /// Attach the HTTP status of the response that produced this envelope.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Record how many HTTP attempts the call made.
    #[must_use]
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Whether the call succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.success
    }

    /// Payload of a successful call, if the response had a body.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Take the payload.
    #[must_use]
    pub fn into_data(self) -> Option<T> {
        self.data
    }

    /// Status text on success, descriptive message on failure.
    ///
    /// The status text is the registered reason phrase for the code (`OK`,
    /// `Not Found`), not the phrase the server sent. Codes without one render
    /// as `HTTP <code>`.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Short error label, only set on failure.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Failure classification, only set on failure.
    #[must_use]
    pub const fn kind(&self) -> Option<FailureKind> {
        self.kind
    }

    /// HTTP status code, when a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        self.status
    }

    /// Number of HTTP attempts made, including retries.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Transform the payload, keeping everything else.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> ApiResponse<U>
    where
        F: FnOnce(T) -> U,
    {
        ApiResponse {
            success: self.success,
            data: self.data.map(f),
            message: self.message,
            error: self.error,
            kind: self.kind,
            status: self.status,
            attempts: self.attempts,
        }
    }

    /// Convert into a `Result`, so callers can use `?`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] for failure envelopes.
    pub fn into_result(self) -> Result<Option<T>> {
        if self.success {
            return Ok(self.data);
        }

        Err(Error::Api {
            kind: self.kind.unwrap_or(FailureKind::RequestError),
            error: self.error.unwrap_or_default(),
            message: self.message.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_envelope() {
        let response = ApiResponse::ok(Some(json!({"ok": true})), "OK").with_status(200);
        assert!(response.is_success());
        assert_eq!(response.data(), Some(&json!({"ok": true})));
        assert_eq!(response.message(), Some("OK"));
        assert!(response.error().is_none());
        assert!(response.kind().is_none());
        assert_eq!(response.status(), Some(200));
        assert_eq!(response.attempts(), 1);
    }

    #[test]
    fn test_failure_envelope() {
        let response: ApiResponse<()> = ApiResponse::failure(
            FailureKind::NetworkError,
            "Network Error",
            "No response received from server",
        );
        assert!(!response.is_success());
        assert!(response.data().is_none());
        assert_eq!(response.error(), Some("Network Error"));
        assert_eq!(response.kind(), Some(FailureKind::NetworkError));
        assert!(response.status().is_none());
    }

    #[test]
    fn test_request_error_defaults_message() {
        let response: ApiResponse<()> = ApiResponse::request_error("");
        assert_eq!(response.error(), Some("Request Error"));
        assert_eq!(response.message(), Some("Unknown error occurred"));
        assert_eq!(response.kind(), Some(FailureKind::RequestError));
    }

    #[test]
    fn test_into_result() {
        let ok: ApiResponse<u32> = ApiResponse::ok(Some(7), "OK");
        assert_eq!(ok.into_result().unwrap(), Some(7));

        let failed: ApiResponse<u32> =
            ApiResponse::failure(FailureKind::ClientError, "not found", "HTTP 404: Not Found");
        let err = failed.into_result().unwrap_err();
        assert_eq!(
            err,
            Error::Api {
                kind: FailureKind::ClientError,
                error: "not found".to_string(),
                message: "HTTP 404: Not Found".to_string(),
            }
        );
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_map_keeps_metadata() {
        let response = ApiResponse::ok(Some(2u32), "Created")
            .with_status(201)
            .with_attempts(3)
            .map(|v| v * 10);
        assert_eq!(response.data(), Some(&20));
        assert_eq!(response.status(), Some(201));
        assert_eq!(response.attempts(), 3);
    }

    #[test]
    fn test_serialization_shape() {
        let response: ApiResponse<serde_json::Value> = ApiResponse::ok(None, "No Content")
            .with_status(204);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({"success": true, "message": "No Content", "status": 204, "attempts": 1})
        );

        let failure: ApiResponse<serde_json::Value> =
            ApiResponse::failure(FailureKind::ServerError, "boom", "HTTP 500: Internal Server Error");
        let value = serde_json::to_value(&failure).unwrap();
        assert_eq!(value["kind"], "server_error");
        assert_eq!(value["error"], "boom");
    }
}
