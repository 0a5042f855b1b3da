use reqwest::StatusCode;
use routemix_core::error::CoreError;
use serde::Deserialize;

/// Errors from the routemix HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, body decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("routemix API error ({status}, {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// Invalid client configuration.
    #[error("Invalid client configuration: {0}")]
    Config(String),
}

/// Error body produced by the server: `{ "error": ..., "code": ... }`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
    pub code: String,
}

impl ClientError {
    /// Build an API error from a status and the raw response body.
    ///
    /// Bodies that are not the server's error envelope (a proxy page, an
    /// empty timeout response) keep the raw text as the message.
    pub(crate) fn from_response(status: StatusCode, body: &str) -> Self {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => ClientError::Api {
                status: status.as_u16(),
                code: parsed.code,
                message: parsed.error,
            },
            Err(_) => ClientError::Api {
                status: status.as_u16(),
                code: String::new(),
                message: body.trim().to_string(),
            },
        }
    }
}

impl From<ClientError> for CoreError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api {
                status,
                code,
                message,
            } => match code.as_str() {
                "VALIDATION_ERROR" | "BAD_REQUEST" => CoreError::Validation(message),
                "CONFLICT" => CoreError::Conflict(message),
                "UNAUTHORIZED" => CoreError::Unauthorized(message),
                "FORBIDDEN" => CoreError::Forbidden(message),
                "NOT_FOUND" => CoreError::NotFound {
                    entity: "Resource",
                    key: message,
                },
                _ if status == 400 || status == 422 => CoreError::Validation(message),
                _ => CoreError::Internal(format!("HTTP {status}: {message}")),
            },
            other => CoreError::Internal(other.to_string()),
        }
    }
}
