use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

pub const TIMEOUT_ERROR: &str = "TIMEOUT_ERROR";
pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
pub const PARSE_ERROR: &str = "PARSE_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const FILE_ERROR: &str = "FILE_ERROR";
pub const CLIENT_ERROR: &str = "CLIENT_ERROR";

/// Maximum number of characters of a non-JSON error body kept in `details`.
const RAW_BODY_PREVIEW_CHARS: usize = 500;

/// The shape every failed call surfaces to its caller, regardless of cause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorBody {
    /// Builds the error body for a non-2xx response.
    ///
    /// A body that already has the `{error, message}` shape is passed through
    /// untouched. A FastAPI `{"detail": ...}` body contributes its message (when
    /// `detail` is a string) and is kept whole under `details`. Anything else is
    /// synthesized from the status code.
    #[must_use]
    pub fn from_response(status: u16, reason: Option<&str>, text: &str) -> Self {
        let error = reason.unwrap_or("HTTP Error").to_string();
        let code = Some(format!("HTTP_{status}"));
        let synthesized_message = format!("Request failed with status code {status}");

        let Ok(value) = serde_json::from_str::<Value>(text) else {
            let trimmed = text.trim();
            let details = (!trimmed.is_empty()).then(|| {
                Value::String(trimmed.chars().take(RAW_BODY_PREVIEW_CHARS).collect())
            });
            return Self {
                error,
                message: synthesized_message,
                code,
                details,
            };
        };

        if let Ok(body) = serde_json::from_value::<ErrorBody>(value.clone()) {
            return body;
        }

        let message = value
            .get("detail")
            .and_then(Value::as_str)
            .map_or(synthesized_message, str::to_owned);

        Self {
            error,
            message,
            code,
            details: Some(value),
        }
    }
}

/// Errors returned by [`crate::ApiClient`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// The attempt exceeded the per-request timeout. Never retried.
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// Connection refused, DNS failure, reset, TLS failure. Never retried.
    #[error("network error for {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status. Only 5xx is retried.
    #[error("HTTP {status} from {url}: {}", .body.message)]
    Status {
        status: u16,
        url: String,
        body: ErrorBody,
    },

    /// A 2xx response body did not match the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A request body could not be encoded as JSON.
    #[error("JSON serialization error for {context}: {source}")]
    Encode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A file selected for upload could not be read.
    #[error("failed to read {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The underlying `reqwest::Client` could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(#[source] reqwest::Error),
}

impl ApiError {
    /// Classifies a transport-level `reqwest` failure.
    pub(crate) fn from_transport(err: reqwest::Error, url: &str) -> Self {
        if err.is_timeout() {
            ApiError::Timeout {
                url: url.to_owned(),
            }
        } else {
            ApiError::Network {
                url: url.to_owned(),
                source: err,
            }
        }
    }

    pub(crate) fn from_status(status: reqwest::StatusCode, url: &str, text: &str) -> Self {
        ApiError::Status {
            status: status.as_u16(),
            url: url.to_owned(),
            body: ErrorBody::from_response(status.as_u16(), status.canonical_reason(), text),
        }
    }

    /// HTTP status of the failed response, if the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| (500..600).contains(&s))
    }

    /// Converts the error into the caller-facing [`ErrorBody`].
    #[must_use]
    pub fn normalized(&self) -> ErrorBody {
        match self {
            ApiError::Timeout { url } => ErrorBody {
                error: "Timeout".to_string(),
                message: "The server did not respond within the request timeout".to_string(),
                code: Some(TIMEOUT_ERROR.to_string()),
                details: Some(json!({ "url": url })),
            },
            ApiError::Network { url, source } => ErrorBody {
                error: "Network Error".to_string(),
                message: "Unable to reach the server".to_string(),
                code: Some(NETWORK_ERROR.to_string()),
                details: Some(json!({ "url": url, "reason": source.to_string() })),
            },
            ApiError::Status { body, .. } => body.clone(),
            ApiError::Deserialize { context, source } => ErrorBody {
                error: "Invalid Response".to_string(),
                message: format!("Unexpected response body for {context}: {source}"),
                code: Some(PARSE_ERROR.to_string()),
                details: None,
            },
            ApiError::Encode { context, source } => ErrorBody {
                error: "Invalid Request".to_string(),
                message: format!("Could not encode request body for {context}: {source}"),
                code: Some(PARSE_ERROR.to_string()),
                details: None,
            },
            ApiError::InvalidUrl { url, reason } => ErrorBody {
                error: "Invalid URL".to_string(),
                message: format!("\"{url}\": {reason}"),
                code: Some(CONFIG_ERROR.to_string()),
                details: None,
            },
            ApiError::File { path, source } => ErrorBody {
                error: "File Error".to_string(),
                message: format!("Failed to read {path}: {source}"),
                code: Some(FILE_ERROR.to_string()),
                details: None,
            },
            ApiError::Client(source) => ErrorBody {
                error: "Client Error".to_string(),
                message: source.to_string(),
                code: Some(CLIENT_ERROR.to_string()),
                details: None,
            },
        }
    }

    /// Emits one diagnostic entry for the failure category.
    pub(crate) fn log(&self) {
        match self {
            ApiError::Timeout { url } => {
                tracing::error!(url = %url, code = TIMEOUT_ERROR, "request timed out");
            }
            ApiError::Network { url, source } => {
                tracing::error!(url = %url, code = NETWORK_ERROR, error = %source, "server unreachable");
            }
            ApiError::Status { status, url, body } if *status >= 500 => {
                tracing::error!(status, url = %url, message = %body.message, "server error");
            }
            ApiError::Status { status, url, body } => {
                tracing::warn!(
                    status,
                    url = %url,
                    code = body.code.as_deref().unwrap_or_default(),
                    message = %body.message,
                    "request rejected"
                );
            }
            other => tracing::warn!(error = %other, "request failed"),
        }
    }
}
