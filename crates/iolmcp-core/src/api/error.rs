use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The token endpoint rejected the credentials. Never retried.
    #[error("Authentication failed ({status}): {}", truncate_body(.body.as_str()))]
    Authentication { status: StatusCode, body: String },

    /// A business endpoint answered with a non-success status after the
    /// single 401 recovery (if any) was spent.
    #[error("Request failed ({status}): {}", truncate_body(.body.as_str()))]
    Request { status: StatusCode, body: String },

    #[error("Cannot build authorization header: {0}")]
    AuthHeader(String),

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Truncate a response body to avoid logging excessive data
fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
}

impl ApiError {
    /// Stable label for the error family
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Authentication { .. } => "authentication",
            ApiError::Request { .. } => "request",
            ApiError::AuthHeader(_) => "auth_header",
            ApiError::Transport(_) => "transport",
            ApiError::InvalidResponse(_) => "invalid_response",
        }
    }

    /// HTTP status carried by the error, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Authentication { status, .. } | ApiError::Request { status, .. } => {
                Some(status.as_u16())
            }
            ApiError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Full response body for diagnostics
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::Authentication { body, .. } | ApiError::Request { body, .. } => Some(body),
            _ => None,
        }
    }
}
