use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Result type alias for request execution
pub type Result<T> = std::result::Result<T, ClassifiedError>;

/// Shared error cause kept inside classified errors so they stay cloneable
pub type Cause = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Caller-visible failure kinds.
///
/// The set is closed and flat: every error returned by the request pipeline is
/// exactly one of these variants, so callers can match on it exhaustively.
#[derive(Debug, Clone, Error)]
pub enum ClassifiedError {
    #[error("Unable to decode response")]
    DecodeFailure {
        #[source]
        source: Arc<serde_json::Error>,
    },

    #[error("Response status code is {0}")]
    UnacceptableStatus(u16),

    #[error("User is not authorized")]
    Unauthorized,

    #[error("Request is forbidden")]
    Forbidden,

    #[error("Requested resource was not found")]
    NotFound,

    #[error("Some problem occurred in the server")]
    ServerError,

    #[error("Some problem occurred in the network connection")]
    ConnectionLost,

    #[error("The request timed out")]
    TimedOut,

    #[error("Something went wrong: {source}")]
    Unknown {
        #[source]
        source: Cause,
    },
}

/// Field-less mirror of [`ClassifiedError`] for comparisons and metrics labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    DecodeFailure,
    UnacceptableStatus,
    Unauthorized,
    Forbidden,
    NotFound,
    ServerError,
    ConnectionLost,
    TimedOut,
    Unknown,
}

impl ClassifiedError {
    /// Create a decode failure, keeping the decoder error for diagnostics
    pub fn decode(source: serde_json::Error) -> Self {
        Self::DecodeFailure {
            source: Arc::new(source),
        }
    }

    /// Wrap any error as an unclassified failure
    pub fn unknown<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Unknown {
            source: Arc::new(source),
        }
    }

    /// The variant of this error without its payload
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DecodeFailure { .. } => ErrorKind::DecodeFailure,
            Self::UnacceptableStatus(_) => ErrorKind::UnacceptableStatus,
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::Forbidden => ErrorKind::Forbidden,
            Self::NotFound => ErrorKind::NotFound,
            Self::ServerError => ErrorKind::ServerError,
            Self::ConnectionLost => ErrorKind::ConnectionLost,
            Self::TimedOut => ErrorKind::TimedOut,
            Self::Unknown { .. } => ErrorKind::Unknown,
        }
    }

    /// Status code carried by `UnacceptableStatus`
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::UnacceptableStatus(code) => Some(*code),
            _ => None,
        }
    }
}

/// Failures raised by a transport before a complete response was received
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Invalid HTTP response: {0}")]
    InvalidResponse(String),

    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Network access not allowed on {path} path")]
    NotPermitted { path: &'static str },

    #[error("Transport error: {message}")]
    Other { message: String },
}

impl TransportError {
    /// Sort a reqwest error into timeout, connect, or generic request failure
    pub fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_connect() {
            Self::Connect(error.to_string())
        } else {
            Self::Request(error)
        }
    }

    /// Create a generic transport error
    pub fn other<S: Into<String>>(message: S) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// The classified kind this failure already corresponds to, if any
    pub fn recognized(&self) -> Option<ClassifiedError> {
        match self {
            Self::Timeout => Some(ClassifiedError::TimedOut),
            Self::Connect(_) | Self::NotPermitted { .. } => Some(ClassifiedError::ConnectionLost),
            Self::Request(e) if e.is_timeout() => Some(ClassifiedError::TimedOut),
            Self::Request(e) if e.is_connect() => Some(ClassifiedError::ConnectionLost),
            _ => None,
        }
    }
}

/// Failures while turning an endpoint description into a request
#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid header '{name}'")]
    InvalidHeader { name: String },

    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl ConfigError {
    /// Create a new invalid configuration error
    pub fn invalid<S: Into<String>>(message: S) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

/// A raw failure as it reaches the error classifier
#[derive(Debug, Error)]
pub enum RequestFailure {
    #[error(transparent)]
    Classified(#[from] ClassifiedError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Endpoint(#[from] EndpointError),
}

impl RequestFailure {
    /// The already-classified error this failure stands for, if any
    pub fn recognized(&self) -> Option<ClassifiedError> {
        match self {
            Self::Classified(error) => Some(error.clone()),
            Self::Transport(error) => error.recognized(),
            Self::Endpoint(_) => None,
        }
    }

    /// Unwrap into a shareable cause for `ClassifiedError::Unknown`
    pub fn into_cause(self) -> Cause {
        match self {
            Self::Classified(error) => Arc::new(error),
            Self::Transport(error) => Arc::new(error),
            Self::Endpoint(error) => Arc::new(error),
        }
    }
}
