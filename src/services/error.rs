use std::fmt;

/// Failure of a single backend call. Calls are never retried.
#[derive(Debug)]
pub enum ApiError {
    /// Connection refused, timeout, or body read failure.
    Transport(reqwest::Error),
    /// Non-2xx response.
    Status { status: u16, message: String },
    /// Body was not the expected JSON shape.
    Decode(serde_json::Error),
    /// Backend answered `success: false`.
    Backend(String),
    /// Backend answered `success: true` without `data`.
    MissingData,
    /// Request URL could not be built from the configured base.
    InvalidUrl(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(e) => write!(f, "connection error: {}", e),
            ApiError::Status { status, message } => write!(f, "HTTP {}: {}", status, message),
            ApiError::Decode(e) => write!(f, "unexpected response: {}", e),
            ApiError::Backend(message) => write!(f, "{}", message),
            ApiError::MissingData => write!(f, "response contained no data"),
            ApiError::InvalidUrl(reason) => write!(f, "invalid request URL: {}", reason),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Transport(e) => Some(e),
            ApiError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e)
    }
}
