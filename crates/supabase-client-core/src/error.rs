use std::fmt;

/// All errors that can occur in the supabase-client crates.
///
/// Every terminal call reports failures through this type. `Config` errors
/// are raised before any network access; `Network` errors mean no response
/// was obtained; `HttpStatus` carries a non-2xx response that the calling
/// facade decided to treat as a failure; `Decode` covers malformed bodies
/// and count headers.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SupabaseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error ({status}): {message}")]
    HttpStatus {
        status: u16,
        message: String,
        body: Option<Vec<u8>>,
    },

    #[error("Decode error: {0}")]
    Decode(String),
}

/// Discriminant of [`SupabaseError`], convenient for matching in callers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Network,
    HttpStatus,
    Decode,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config => write!(f, "config"),
            Self::Network => write!(f, "network"),
            Self::HttpStatus => write!(f, "http_status"),
            Self::Decode => write!(f, "decode"),
        }
    }
}

impl SupabaseError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn http_status(status: u16, message: impl Into<String>, body: Option<Vec<u8>>) -> Self {
        Self::HttpStatus {
            status,
            message: message.into(),
            body,
        }
    }

    /// Which category of the taxonomy this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Config,
            Self::Network(_) => ErrorKind::Network,
            Self::HttpStatus { .. } => ErrorKind::HttpStatus,
            Self::Decode(_) => ErrorKind::Decode,
        }
    }

    /// The HTTP status code, for `HttpStatus` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The raw response body that produced this error, if one was received.
    pub fn raw(&self) -> Option<&[u8]> {
        match self {
            Self::HttpStatus { body, .. } => body.as_deref(),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SupabaseError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

impl From<reqwest::Error> for SupabaseError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }
}

impl From<url::ParseError> for SupabaseError {
    fn from(e: url::ParseError) -> Self {
        Self::Config(format!("invalid URL: {e}"))
    }
}

/// Result alias using SupabaseError.
pub type SupabaseResult<T> = Result<T, SupabaseError>;
