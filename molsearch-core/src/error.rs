/// Structured error types for molsearch-core.
///
/// Uses `thiserror` for the library surface. The binary (`molsearch-cli`)
/// wraps these in `anyhow` at command boundaries.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Which backend call a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `GET /models` - option name bootstrap
    Models,
    /// `POST /search` - molecule search
    Search,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Models => write!(f, "GET /models"),
            Endpoint::Search => write!(f, "POST /search"),
        }
    }
}

/// The backend answered, but not with a 2xx status
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{endpoint} failed: {status} {reason}")]
pub struct HttpFailure {
    pub endpoint: Endpoint,
    pub status: u16,
    /// Canonical reason phrase (may be empty for unknown codes)
    pub reason: String,
    /// Raw response body, as received
    pub body: String,
}

/// Coarse classification of transport-level failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Could not reach the backend at all
    Connect,
    /// Response arrived but its body did not have the expected shape
    Decode,
    /// Anything else reqwest reports (redirect loops, timeouts, ...)
    Other,
}

/// The request never produced a usable response
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{endpoint} request failed: {message}")]
pub struct TransportFailure {
    pub endpoint: Endpoint,
    pub kind: TransportKind,
    pub message: String,
}

/// Failure value handed to the error channel.
///
/// Built at the call site so the sink never has to guess which shape it got.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchFailure {
    #[error(transparent)]
    Http(HttpFailure),
    #[error(transparent)]
    Transport(TransportFailure),
}

impl SearchFailure {
    /// Create an HTTP-level failure
    pub fn http(
        endpoint: Endpoint,
        status: u16,
        reason: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self::Http(HttpFailure {
            endpoint,
            status,
            reason: reason.into(),
            body: body.into(),
        })
    }

    /// Create a transport-level failure
    pub fn transport(endpoint: Endpoint, kind: TransportKind, message: impl Into<String>) -> Self {
        Self::Transport(TransportFailure {
            endpoint,
            kind,
            message: message.into(),
        })
    }

    /// The call this failure came from
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::Http(failure) => failure.endpoint,
            Self::Transport(failure) => failure.endpoint,
        }
    }
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file exists but could not be read
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Config file is not valid TOML for our schema
    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Base URL must be absolute http(s)
    #[error("Invalid base URL '{value}': expected http:// or https://")]
    InvalidUrl { value: String },

    /// Timeout value that is not a positive integer
    #[error("Invalid request timeout '{value}': expected a positive number of seconds")]
    InvalidTimeout { value: String },

    /// reqwest refused the client settings
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Result type alias for configuration loading
pub type Result<T> = std::result::Result<T, ConfigError>;

impl ConfigError {
    /// Create an invalid URL error
    pub fn invalid_url(value: impl Into<String>) -> Self {
        Self::InvalidUrl {
            value: value.into(),
        }
    }

    /// Create an invalid timeout error
    pub fn invalid_timeout(value: impl Into<String>) -> Self {
        Self::InvalidTimeout {
            value: value.into(),
        }
    }
}
