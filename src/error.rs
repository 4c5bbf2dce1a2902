//! Error types for Quetz API operations.

use thiserror::Error;

/// Errors that can occur during Quetz API operations.
#[derive(Debug, Error)]
pub enum QuetzError {
    /// Invalid client-side parameters (e.g. a zero page size).
    #[error("invalid client configuration: {0}")]
    Config(String),

    /// The base URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The server rejected the credential exchange.
    #[error("authentication failed with HTTP {status}: {body}")]
    Authentication { status: u16, body: String },

    /// No response was received.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("Quetz API error on {path}: HTTP {status}: {body}")]
    Api {
        status: u16,
        path: String,
        body: String,
    },

    /// The response body does not match the expected record schema.
    #[error("failed to decode {record}: {source}")]
    Decode {
        record: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A local file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl QuetzError {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Authentication { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Server-provided error message, if the body carries one.
    ///
    /// FastAPI reports errors as `{"detail": "..."}`; `{"message": "..."}`
    /// is accepted too. Validation errors with a structured `detail` and
    /// non-JSON bodies yield `None`.
    pub fn detail(&self) -> Option<String> {
        let body = match self {
            Self::Api { body, .. } | Self::Authentication { body, .. } => body,
            _ => return None,
        };
        let json: serde_json::Value = serde_json::from_str(body).ok()?;
        json.get("detail")
            .or_else(|| json.get("message"))
            .and_then(|m| m.as_str())
            .map(str::to_string)
    }

    /// Returns true for a 404 answer from the server.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Result type alias for Quetz operations.
pub type Result<T> = core::result::Result<T, QuetzError>;
