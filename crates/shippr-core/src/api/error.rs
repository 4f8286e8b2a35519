//! # API Errors
//!
//! Every failure at the API boundary is normalized into an [`ApiError`] with
//! one of a fixed set of [`ApiErrorKind`]s.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Classification of an API failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// The server could not be reached or did not answer in time.
    Network,
    /// The session is missing or rejected.
    Unauthorized,
    /// The input failed server-side validation.
    BadRequest,
    /// The request conflicts with existing state (e.g. email taken).
    Conflict,
    /// The server failed to handle the request.
    Server,
    /// Anything else, including unreadable responses.
    Unknown,
}

impl ApiErrorKind {
    /// Stable code used in logs and on screen.
    pub fn code(self) -> &'static str {
        match self {
            Self::Network => "NETWORK_ERROR",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::BadRequest => "BAD_REQUEST",
            Self::Conflict => "CONFLICT",
            Self::Server => "SERVER_ERROR",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Whether a retry could plausibly succeed.
    pub fn is_retryable(self) -> bool {
        !matches!(self, Self::Unauthorized | Self::BadRequest)
    }

    /// Maps a tRPC error code (`data.code`).
    pub fn from_trpc_code(code: &str) -> Option<Self> {
        let kind = match code {
            "UNAUTHORIZED" => Self::Unauthorized,
            "BAD_REQUEST" | "PARSE_ERROR" | "UNPROCESSABLE_CONTENT" => Self::BadRequest,
            "CONFLICT" => Self::Conflict,
            "INTERNAL_SERVER_ERROR" | "NOT_IMPLEMENTED" | "BAD_GATEWAY"
            | "SERVICE_UNAVAILABLE" | "GATEWAY_TIMEOUT" => Self::Server,
            "TIMEOUT" => Self::Network,
            _ => return None,
        };
        Some(kind)
    }

    /// Maps an HTTP status code.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            400 | 422 => Self::BadRequest,
            409 => Self::Conflict,
            408 => Self::Network,
            500..=599 => Self::Server,
            _ => Self::Unknown,
        }
    }

    /// Default message shown when the server gives none.
    fn default_message(self) -> &'static str {
        match self {
            Self::Network => "Could not reach the server",
            Self::Unauthorized => "Your session has expired, please log in again",
            Self::BadRequest => "The request was invalid",
            Self::Conflict => "That resource already exists",
            Self::Server => "The server ran into a problem",
            Self::Unknown => "Something went wrong",
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A classified API failure.
#[derive(Error, Debug)]
#[error("{kind}: {message}")]
pub struct ApiError {
    /// Classification.
    pub kind: ApiErrorKind,
    /// Message suitable for display.
    pub message: String,
    /// Per-field validation messages for [`ApiErrorKind::BadRequest`].
    pub issues: Vec<String>,
    /// The error this was derived from.
    #[source]
    pub source: Option<BoxError>,
}

impl ApiError {
    /// Error of `kind` with an explicit message.
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            issues: Vec::new(),
            source: None,
        }
    }

    /// Error of `kind` with its default message.
    pub fn of_kind(kind: ApiErrorKind) -> Self {
        Self::new(kind, kind.default_message())
    }

    /// Attaches the original error.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Whether a retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    /// Message plus validation issues, one per line.
    pub fn display_lines(&self) -> Vec<String> {
        let mut lines = vec![self.message.clone()];
        lines.extend(self.issues.iter().map(|issue| format!("• {issue}")));
        lines
    }

    /// Classifies a transport-level failure.
    pub fn from_transport(err: reqwest::Error) -> Self {
        let kind = if err.is_connect() || err.is_timeout() || err.is_request() {
            ApiErrorKind::Network
        } else if let Some(status) = err.status() {
            ApiErrorKind::from_status(status.as_u16())
        } else {
            ApiErrorKind::Unknown
        };
        Self::of_kind(kind).with_source(err)
    }

    /// Classifies a tRPC error envelope (`error.json`), falling back to the
    /// HTTP status when the tRPC code is unrecognized.
    pub fn from_trpc(shape: TrpcErrorShape, http_status: u16) -> Self {
        let data = shape.data.unwrap_or_default();
        let kind = data
            .code
            .as_deref()
            .and_then(ApiErrorKind::from_trpc_code)
            .or_else(|| data.http_status.map(ApiErrorKind::from_status))
            .unwrap_or_else(|| ApiErrorKind::from_status(http_status));

        let mut issues = data
            .zod_error
            .as_ref()
            .map(zod_issues)
            .unwrap_or_default();

        let message = match parse_issue_list(&shape.message) {
            Some(parsed) => {
                if issues.is_empty() {
                    issues = parsed;
                }
                kind.default_message().to_string()
            }
            None if shape.message.trim().is_empty() => kind.default_message().to_string(),
            None => shape.message,
        };

        Self {
            kind,
            message,
            issues,
            source: None,
        }
    }
}

/// Error object carried in a tRPC response item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrpcErrorShape {
    /// Human readable message.
    #[serde(default)]
    pub message: String,
    /// JSON-RPC style numeric code.
    #[serde(default)]
    pub code: Option<i64>,
    /// Extra data set by the tRPC error formatter.
    #[serde(default)]
    pub data: Option<TrpcErrorData>,
}

/// The `data` part of a tRPC error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrpcErrorData {
    /// tRPC error code such as `UNAUTHORIZED`.
    #[serde(default)]
    pub code: Option<String>,
    /// HTTP status the server chose.
    #[serde(default)]
    pub http_status: Option<u16>,
    /// Procedure path.
    #[serde(default)]
    pub path: Option<String>,
    /// Flattened zod error, when the formatter includes one.
    #[serde(default)]
    pub zod_error: Option<Value>,
}

/// Collects `formErrors` and `fieldErrors` from a flattened zod error.
fn zod_issues(zod: &Value) -> Vec<String> {
    let mut issues: Vec<String> = zod
        .get("formErrors")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect();

    if let Some(fields) = zod.get("fieldErrors").and_then(Value::as_object) {
        for (field, messages) in fields {
            for message in messages.as_array().into_iter().flatten().filter_map(Value::as_str) {
                issues.push(format!("{field}: {message}"));
            }
        }
    }
    issues
}

/// Parses a message that is itself a JSON array of `{ message, path }` issues.
fn parse_issue_list(message: &str) -> Option<Vec<String>> {
    #[derive(Deserialize)]
    struct Issue {
        message: String,
        #[serde(default)]
        path: Vec<Value>,
    }

    let trimmed = message.trim();
    if !trimmed.starts_with('[') {
        return None;
    }
    let issues: Vec<Issue> = serde_json::from_str(trimmed).ok()?;
    Some(
        issues
            .into_iter()
            .map(|issue| {
                let path: Vec<String> = issue
                    .path
                    .iter()
                    .map(|p| match p {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect();
                if path.is_empty() {
                    issue.message
                } else {
                    format!("{}: {}", path.join("."), issue.message)
                }
            })
            .collect(),
    )
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn shape(value: Value) -> TrpcErrorShape {
        serde_json::from_value(value).unwrap()
    }

    #[rstest]
    #[case("UNAUTHORIZED", ApiErrorKind::Unauthorized)]
    #[case("BAD_REQUEST", ApiErrorKind::BadRequest)]
    #[case("CONFLICT", ApiErrorKind::Conflict)]
    #[case("INTERNAL_SERVER_ERROR", ApiErrorKind::Server)]
    #[case("SERVICE_UNAVAILABLE", ApiErrorKind::Server)]
    #[case("TIMEOUT", ApiErrorKind::Network)]
    fn test_trpc_codes(#[case] code: &str, #[case] expected: ApiErrorKind) {
        let err = ApiError::from_trpc(
            shape(json!({ "message": "boom", "data": { "code": code } })),
            200,
        );
        assert_eq!(err.kind, expected);
        assert_eq!(err.message, "boom");
    }

    #[rstest]
    #[case(401, ApiErrorKind::Unauthorized)]
    #[case(400, ApiErrorKind::BadRequest)]
    #[case(409, ApiErrorKind::Conflict)]
    #[case(503, ApiErrorKind::Server)]
    #[case(404, ApiErrorKind::Unknown)]
    fn test_status_fallback(#[case] status: u16, #[case] expected: ApiErrorKind) {
        let err = ApiError::from_trpc(shape(json!({ "message": "" })), status);
        assert_eq!(err.kind, expected);
        assert!(!err.message.is_empty());
    }

    #[test]
    fn test_unknown_trpc_code_uses_http_status_in_data() {
        let err = ApiError::from_trpc(
            shape(json!({ "message": "x", "data": { "code": "NOT_FOUND", "httpStatus": 404 } })),
            500,
        );
        assert_eq!(err.kind, ApiErrorKind::Unknown);
    }

    #[test]
    fn test_retryability() {
        assert!(!ApiErrorKind::Unauthorized.is_retryable());
        assert!(!ApiErrorKind::BadRequest.is_retryable());
        assert!(ApiErrorKind::Network.is_retryable());
        assert!(ApiErrorKind::Conflict.is_retryable());
        assert!(ApiErrorKind::Server.is_retryable());
        assert!(ApiErrorKind::Unknown.is_retryable());
    }

    #[test]
    fn test_zod_field_errors_become_issues() {
        let err = ApiError::from_trpc(
            shape(json!({
                "message": "Invalid input",
                "data": {
                    "code": "BAD_REQUEST",
                    "zodError": {
                        "formErrors": ["Passwords do not match"],
                        "fieldErrors": { "email": ["Invalid email"] }
                    }
                }
            })),
            400,
        );

        assert_eq!(err.kind, ApiErrorKind::BadRequest);
        assert_eq!(
            err.issues,
            vec!["Passwords do not match".to_string(), "email: Invalid email".to_string()]
        );
    }

    #[test]
    fn test_json_array_message_becomes_issues() {
        let message = json!([
            { "code": "too_small", "message": "Must be at least 8 characters", "path": ["password"] }
        ])
        .to_string();
        let err = ApiError::from_trpc(
            shape(json!({ "message": message, "data": { "code": "BAD_REQUEST" } })),
            400,
        );

        assert_eq!(err.message, "The request was invalid");
        assert_eq!(err.issues, vec!["password: Must be at least 8 characters".to_string()]);
        assert_eq!(
            err.display_lines(),
            vec![
                "The request was invalid".to_string(),
                "• password: Must be at least 8 characters".to_string()
            ]
        );
    }

    #[test]
    fn test_display_includes_code() {
        let err = ApiError::new(ApiErrorKind::Conflict, "Email already registered");
        assert_eq!(err.to_string(), "CONFLICT: Email already registered");
    }
}
