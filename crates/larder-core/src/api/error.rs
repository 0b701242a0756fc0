use reqwest::StatusCode;
use thiserror::Error;

/// Broad cause of a failed remote operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No bearer token could be obtained.
    Auth,
    /// The server was unreachable or the request timed out.
    Transport,
    /// The server answered with a status the operation does not accept.
    Status,
    /// The response body did not have the expected shape.
    Decode,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("No bearer token available: {0}")]
    MissingToken(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Unexpected status {status} (expected {expected}): {body}")]
    UnexpectedStatus {
        status: StatusCode,
        expected: Expected,
        body: String,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Status an operation accepts as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Exactly(StatusCode),
    AnySuccess,
}

impl Expected {
    pub fn ok() -> Self {
        Expected::Exactly(StatusCode::OK)
    }

    pub fn created() -> Self {
        Expected::Exactly(StatusCode::CREATED)
    }

    pub fn accepts(&self, status: StatusCode) -> bool {
        match self {
            Expected::Exactly(code) => *code == status,
            Expected::AnySuccess => status.is_success(),
        }
    }
}

impl std::fmt::Display for Expected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expected::Exactly(code) => write!(f, "{}", code.as_u16()),
            Expected::AnySuccess => write!(f, "2xx"),
        }
    }
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    pub fn from_status(status: StatusCode, expected: Expected, body: &str) -> Self {
        ApiError::UnexpectedStatus {
            status,
            expected,
            body: Self::truncate_body(body),
        }
    }

    pub fn decode(what: &str, err: serde_json::Error) -> Self {
        ApiError::InvalidResponse(format!("{}: {}", what, err))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::MissingToken(_) => ErrorKind::Auth,
            ApiError::NetworkError(e) if e.is_decode() => ErrorKind::Decode,
            ApiError::NetworkError(_) => ErrorKind::Transport,
            ApiError::UnexpectedStatus { .. } => ErrorKind::Status,
            ApiError::InvalidResponse(_) => ErrorKind::Decode,
        }
    }

    /// Status code returned by the server, if it answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::UnexpectedStatus { status, .. } => Some(*status),
            ApiError::NetworkError(e) => e.status(),
            _ => None,
        }
    }
}
