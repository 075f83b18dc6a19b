use reqwest::StatusCode;

/// Failures surfaced to the user at the boundary of an action.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Required input missing or malformed; no request is issued.
    #[error("{0}")]
    Validation(String),
    /// Transport failure or non-2xx HTTP status.
    #[error("Network error: {message}")]
    Request {
        status: Option<u16>,
        message: String,
    },
    /// Backend answered with `success: false`.
    #[error("Error: {0}")]
    Application(String),
    /// Export attempted before any report was generated.
    #[error("No report data available. Generate a report first.")]
    NoData,
    /// Backend answered 2xx with a body that is not the expected envelope.
    #[error("Unexpected response format: {0}")]
    Decode(#[from] serde_json::Error),
}

impl AppError {
    pub fn http_status(status: StatusCode) -> Self {
        AppError::Request {
            status: Some(status.as_u16()),
            message: format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Request failed")
            ),
        }
    }

    pub fn transport(err: reqwest::Error) -> Self {
        AppError::Request {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }

    /// HTTP status carried by a request failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Request { status, .. } => *status,
            _ => None,
        }
    }
}
