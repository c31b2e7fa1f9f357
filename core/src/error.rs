use std::fmt;
use thiserror::Error;

/// The error type for capisign operations.
///
/// Each variant carries the fields relevant to its kind so callers can
/// dispatch with a `match` instead of inspecting strings.
#[derive(Error, Debug)]
pub enum Error {
    /// The service answered with a non-success HTTP status.
    #[error("http status {status}: {status_text}")]
    HttpStatus {
        /// HTTP status code returned by the service.
        status: u16,
        /// Reason phrase returned by the service.
        status_text: String,
    },

    /// The service accepted the request but reported an error in its response envelope.
    #[error("action {action} failed with {code}: {message} (request id: {request_id})")]
    Backend {
        /// API action that was called.
        action: String,
        /// Request id assigned by the service.
        request_id: String,
        /// Service error code.
        code: String,
        /// Service error message.
        message: String,
    },

    /// The request could not be signed.
    #[error("signing failed at {stage}: {reason}")]
    Signing {
        /// Stage that failed.
        stage: SigningStage,
        /// Human readable reason, never containing secret material.
        reason: String,
        /// Underlying error, if any.
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Configuration error (unknown values, missing fields).
    #[error("invalid configuration: {message}")]
    ConfigInvalid {
        /// Description of the problem.
        message: String,
        /// Underlying error, if any.
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Request cannot be built (invalid url, header, body).
    #[error("invalid request: {message}")]
    RequestInvalid {
        /// Description of the problem.
        message: String,
        /// Underlying error, if any.
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Unexpected errors, mostly from the platform.
    #[error("unexpected error: {message}")]
    Unexpected {
        /// Description of the problem.
        message: String,
        /// Underlying error, if any.
        #[source]
        source: Option<anyhow::Error>,
    },
}

/// The kind of error that occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// See [`Error::HttpStatus`].
    HttpStatus,
    /// See [`Error::Backend`].
    Backend,
    /// See [`Error::Signing`].
    Signing,
    /// See [`Error::ConfigInvalid`].
    ConfigInvalid,
    /// See [`Error::RequestInvalid`].
    RequestInvalid,
    /// See [`Error::Unexpected`].
    Unexpected,
}

/// The stage of signing an error was raised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningStage {
    /// Selecting the signature algorithm.
    Algorithm,
    /// Validating secret material.
    Credential,
    /// Hashing or encoding the payload.
    Payload,
    /// Building the canonical request.
    CanonicalRequest,
    /// Deriving the signing key.
    KeyDerivation,
    /// Computing the final signature.
    Signature,
}

impl fmt::Display for SigningStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SigningStage::Algorithm => write!(f, "algorithm"),
            SigningStage::Credential => write!(f, "credential"),
            SigningStage::Payload => write!(f, "payload"),
            SigningStage::CanonicalRequest => write!(f, "canonical request"),
            SigningStage::KeyDerivation => write!(f, "key derivation"),
            SigningStage::Signature => write!(f, "signature"),
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::HttpStatus => write!(f, "http status error"),
            ErrorKind::Backend => write!(f, "backend error"),
            ErrorKind::Signing => write!(f, "signing error"),
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::RequestInvalid => write!(f, "invalid request"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

impl Error {
    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::HttpStatus { .. } => ErrorKind::HttpStatus,
            Error::Backend { .. } => ErrorKind::Backend,
            Error::Signing { .. } => ErrorKind::Signing,
            Error::ConfigInvalid { .. } => ErrorKind::ConfigInvalid,
            Error::RequestInvalid { .. } => ErrorKind::RequestInvalid,
            Error::Unexpected { .. } => ErrorKind::Unexpected,
        }
    }

    /// Add a source error.
    ///
    /// Kinds that carry no source are returned unchanged.
    pub fn with_source(mut self, err: impl Into<anyhow::Error>) -> Self {
        match &mut self {
            Error::Signing { source, .. }
            | Error::ConfigInvalid { source, .. }
            | Error::RequestInvalid { source, .. }
            | Error::Unexpected { source, .. } => *source = Some(err.into()),
            Error::HttpStatus { .. } | Error::Backend { .. } => {}
        }
        self
    }

    /// Returns the signing stage if this is a signing error.
    pub fn signing_stage(&self) -> Option<SigningStage> {
        match self {
            Error::Signing { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

// Convenience constructors
impl Error {
    /// Create an http status error
    pub fn http_status(status: u16, status_text: impl Into<String>) -> Self {
        Error::HttpStatus {
            status,
            status_text: status_text.into(),
        }
    }

    /// Create a backend error
    pub fn backend(
        action: impl Into<String>,
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::Backend {
            action: action.into(),
            request_id: request_id.into(),
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create a signing error
    pub fn signing(stage: SigningStage, reason: impl Into<String>) -> Self {
        Error::Signing {
            stage,
            reason: reason.into(),
            source: None,
        }
    }

    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Error::ConfigInvalid {
            message: message.into(),
            source: None,
        }
    }

    /// Create a request invalid error
    pub fn request_invalid(message: impl Into<String>) -> Self {
        Error::RequestInvalid {
            message: message.into(),
            source: None,
        }
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Error::Unexpected {
            message: message.into(),
            source: None,
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::request_invalid(err.to_string()).with_source(err)
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::request_invalid(err.to_string()).with_source(err)
    }
}

impl From<http::header::InvalidHeaderName> for Error {
    fn from(err: http::header::InvalidHeaderName) -> Self {
        Self::request_invalid(err.to_string()).with_source(err)
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::request_invalid(err.to_string()).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::request_invalid(err.to_string()).with_source(err)
    }
}
