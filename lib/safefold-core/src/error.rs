//! Error types for safefold.
//!
//! Every failure a fold can observe ends up as an [`Error`]. The fold engine
//! recovers all of them locally except [`Error::Cancelled`], which is a
//! control signal and escapes the fold as [`Cancelled`].

use derive_more::{Display, Error, From};

/// Boxed error accepted from application handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ============================================================================
// Synthesized Errors
// ============================================================================

/// A response arrived with a status code that no mapper covers.
///
/// Passed to the unknown-error handler when the fold has no
/// unmentioned-status handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Error)]
#[display("unmentioned status {code}")]
pub struct UnmentionedStatus {
    /// The HTTP status code of the response.
    pub code: u16,
}

impl UnmentionedStatus {
    /// Create the error for the given status code.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self { code }
    }
}

/// The task driving a fold was cancelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Error)]
#[display("cancelled")]
pub struct Cancelled;

// ============================================================================
// Error Type
// ============================================================================

/// Main error type for safefold operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// I/O failure below the HTTP layer.
    #[display("I/O error: {_0}")]
    #[from]
    Io(std::io::Error),

    /// Invalid request configuration.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// Query string serialization error.
    #[display("query serialization error: {_0}")]
    #[from]
    QuerySerialization(serde_html_form::ser::Error),

    /// Body could not be converted to the requested type.
    #[display("cannot deserialize `{target}` at '{path}': {message}")]
    #[from(skip)]
    Deserialization {
        /// Name of the requested type.
        target: &'static str,
        /// Path to the failing field (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// A typed body was requested but the response carries none.
    #[display("no body in response for status {status}, expected `{target}`")]
    #[from(skip)]
    MissingBody {
        /// HTTP status code of the response.
        status: u16,
        /// Name of the requested type.
        target: &'static str,
    },

    /// No mapper covers the response status.
    #[display("{_0}")]
    #[from]
    UnmentionedStatus(UnmentionedStatus),

    /// An application handler failed while producing its value.
    #[display("handler failed: {_0}")]
    #[from(skip)]
    Handler(#[error(not(source))] BoxError),

    /// Cooperative cancellation; never delivered to an error handler.
    #[display("cancelled")]
    #[from(skip)]
    Cancelled,
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl From<Cancelled> for Error {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}

impl Error {
    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a deserialization error with path context.
    #[must_use]
    pub fn deserialization(
        target: &'static str,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Deserialization {
            target,
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a missing body error.
    #[must_use]
    pub const fn missing_body(status: u16, target: &'static str) -> Self {
        Self::MissingBody { status, target }
    }

    /// Wrap an application failure raised inside a handler.
    #[must_use]
    pub fn handler(error: impl Into<BoxError>) -> Self {
        Self::Handler(error.into())
    }

    /// Returns `true` if this is the cancellation signal.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` if no response could be obtained.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(
            self,
            Self::Connection(_) | Self::Tls(_) | Self::Timeout | Self::Io(_)
        )
    }

    /// Returns `true` if a body was missing or could not be deserialized.
    #[must_use]
    pub const fn is_deserialization(&self) -> bool {
        matches!(self, Self::Deserialization { .. } | Self::MissingBody { .. })
    }

    /// Returns the status code if this is an unmentioned status error.
    #[must_use]
    pub const fn unmentioned_status(&self) -> Option<u16> {
        match self {
            Self::UnmentionedStatus(UnmentionedStatus { code }) => Some(*code),
            _ => None,
        }
    }
}
