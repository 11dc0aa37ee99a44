//! REST client errors and their classification.

use thiserror::Error;

/// Errors from a backend call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was received (connect failure, timeout, DNS).
    #[error("Network error - please check your connection ({0})")]
    Network(#[source] reqwest::Error),

    /// HTTP 401. The stored token has already been cleared.
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// HTTP 5xx.
    #[error("Server error - please try again later ({status}: {message})")]
    Server { status: u16, message: String },

    /// Any other non-success status.
    #[error("API error: {status} - {message}")]
    Status {
        status: u16,
        message: String,
        body: serde_json::Value,
    },

    /// A 2xx response whose envelope reported `success: false` or carried no data.
    #[error("{}", .message.as_deref().unwrap_or("Request was not successful"))]
    Unsuccessful { message: Option<String> },

    /// A success response whose body did not have the expected shape.
    #[error("Failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The request could not be built.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// True when the backend could not be reached at all.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// True for 5xx responses.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Server { .. })
    }

    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Whether a caller may substitute demo data for this failure.
    #[must_use]
    pub const fn allows_demo_fallback(&self) -> bool {
        self.is_network_error() || self.is_server_error()
    }

    /// HTTP status, when a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Server { status, .. } | Self::Status { status, .. } => Some(*status),
            Self::Network(_)
            | Self::Unsuccessful { .. }
            | Self::Decode(_)
            | Self::InvalidRequest(_) => None,
        }
    }

    /// Message from the backend body, if one was sent.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { message }
            | Self::Server { message, .. }
            | Self::Status { message, .. } => Some(message.as_str()),
            Self::Unsuccessful { message } => message.as_deref(),
            Self::Network(_) | Self::Decode(_) | Self::InvalidRequest(_) => None,
        }
    }

    /// Classify a non-success response.
    pub(crate) fn from_status(status: u16, body: serde_json::Value) -> Self {
        let message = body
            .get("message")
            .and_then(serde_json::Value::as_str)
            .map_or_else(|| default_message(status), str::to_owned);

        match status {
            401 => Self::Unauthorized { message },
            s if s >= 500 => Self::Server { status, message },
            _ => Self::Status {
                status,
                message,
                body,
            },
        }
    }
}

fn default_message(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown error")
        .to_owned()
}
