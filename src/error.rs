//! Error types for palaver.
//!
//! Every failure the chat client can observe is folded into [`Error`]: HTTP
//! failures from the chat endpoint, cancellation of an in-flight request,
//! storage I/O, and (de)serialization of sessions and wire payloads.

use std::error;
use std::fmt;
use std::io;
use std::sync::Arc;
use std::time::Duration;

/// A shareable underlying cause.
type Cause = Arc<dyn error::Error + Send + Sync>;

/// The main error type for palaver.
#[derive(Clone, Debug)]
pub enum Error {
    /// The chat endpoint answered with a status outside 2xx.
    Api {
        /// Status line code.
        status_code: u16,
        /// Response body, verbatim.
        message: String,
    },

    /// No usable credential, or the endpoint refused it.
    Authentication { message: String },

    /// The endpoint did not answer in time.
    Timeout {
        message: String,
        /// The client timeout in effect, when known.
        after: Option<Duration>,
    },

    /// The turn was cancelled; its result must be discarded.
    Abort { message: String },

    /// The endpoint could not be reached.
    Connection {
        message: String,
        source: Option<Cause>,
    },

    /// A wire payload or the sessions file was not valid JSON for its type.
    Serialization {
        message: String,
        source: Option<Cause>,
    },

    /// Reading or writing the sessions file failed.
    Io {
        message: String,
        source: Arc<io::Error>,
    },

    /// reqwest failed for a reason other than connect or timeout.
    HttpClient {
        message: String,
        source: Option<Cause>,
    },

    /// An argument was out of range, or the endpoint rejected the request body.
    Validation {
        message: String,
        /// Name of the offending argument.
        param: Option<String>,
    },

    /// The configured endpoint is not a usable base URL.
    Url {
        message: String,
        source: Option<url::ParseError>,
    },
}

impl Error {
    /// A non-success HTTP status with its body.
    pub fn api(status_code: u16, message: impl Into<String>) -> Self {
        Error::Api {
            status_code,
            message: message.into(),
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Error::Authentication {
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>, after: Option<Duration>) -> Self {
        Error::Timeout {
            message: message.into(),
            after,
        }
    }

    /// A cancelled turn. See [`Error::is_abort`].
    pub fn abort(message: impl Into<String>) -> Self {
        Error::Abort {
            message: message.into(),
        }
    }

    pub fn connection(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Connection {
            message: message.into(),
            source: source.map(Cause::from),
        }
    }

    pub fn serialization(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Serialization {
            message: message.into(),
            source: source.map(Cause::from),
        }
    }

    /// Wraps `source` with a note about what was being attempted.
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Error::Io {
            message: message.into(),
            source: Arc::new(source),
        }
    }

    pub fn http_client(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::HttpClient {
            message: message.into(),
            source: source.map(Cause::from),
        }
    }

    pub fn validation(message: impl Into<String>, param: Option<String>) -> Self {
        Error::Validation {
            message: message.into(),
            param,
        }
    }

    pub fn url(message: impl Into<String>, source: Option<url::ParseError>) -> Self {
        Error::Url {
            message: message.into(),
            source,
        }
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, Error::Authentication { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    /// True for cancelled turns. These are never shown as a failed turn.
    pub fn is_abort(&self) -> bool {
        matches!(self, Error::Abort { .. })
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, Error::Connection { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    /// True when sending the same turn again could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Api { status_code, .. } => {
                matches!(status_code, 408 | 409 | 429 | 500..=599)
            }
            Error::Timeout { .. } | Error::Connection { .. } => true,
            _ => false,
        }
    }

    /// The HTTP status behind an [`Error::Api`].
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    fn cause(&self) -> Option<&Cause> {
        match self {
            Error::Connection { source, .. }
            | Error::Serialization { source, .. }
            | Error::HttpClient { source, .. } => source.as_ref(),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Api {
                status_code,
                message,
            } => write!(f, "chat endpoint returned {status_code}: {message}"),
            Error::Authentication { message } => write!(f, "not authorized: {message}"),
            Error::Timeout {
                message,
                after: Some(after),
            } => write!(f, "timed out after {}s: {message}", after.as_secs()),
            Error::Timeout {
                message,
                after: None,
            } => write!(f, "timed out: {message}"),
            Error::Abort { message } => write!(f, "cancelled: {message}"),
            Error::Connection { message, .. } => write!(f, "cannot reach chat endpoint: {message}"),
            Error::Serialization { message, .. } => write!(f, "malformed JSON: {message}"),
            Error::Io { message, source } => write!(f, "{message}: {source}"),
            Error::HttpClient { message, .. } => write!(f, "HTTP failure: {message}"),
            Error::Validation {
                message,
                param: Some(param),
            } => write!(f, "invalid {param}: {message}"),
            Error::Validation {
                message,
                param: None,
            } => write!(f, "invalid request: {message}"),
            Error::Url { message, .. } => write!(f, "bad endpoint URL: {message}"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source.as_ref()),
            Error::Url {
                source: Some(source),
                ..
            } => Some(source),
            _ => self
                .cause()
                .map(|cause| cause.as_ref() as &(dyn error::Error + 'static)),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::io("I/O failed", err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::serialization(err.to_string(), Some(Box::new(err)))
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::url(err.to_string(), Some(err))
    }
}

/// A specialized Result type for palaver operations.
pub type Result<T> = std::result::Result<T, Error>;
