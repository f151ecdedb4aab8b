//! Error types raised while consuming the Elance REST API.

use std::error::Error as StdError;
use std::fmt;

use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Boxed cause attached to an [`ApiError`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Message used when the fallback handler fails.
pub const UNSPECIFIED_MESSAGE: &str = "Error consuming REST API.";

/// Classification tag carried by every [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ApiErrorKind {
    /// The server answered with a 4xx status.
    ClientError,
    /// The server answered with a 5xx status.
    ServerError,
    /// Anything else, including failures of the fallback handler.
    Unspecified,
}

impl ApiErrorKind {
    /// Classifies a status code by its class (`status / 100`).
    ///
    /// Returns `None` for codes that are neither client nor server errors.
    #[must_use]
    pub const fn from_status(status: StatusCode) -> Option<Self> {
        match status.as_u16() / 100 {
            4 => Some(Self::ClientError),
            5 => Some(Self::ServerError),
            _ => None,
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ClientError => "client error",
            Self::ServerError => "server error",
            Self::Unspecified => "unspecified",
        };
        f.write_str(name)
    }
}

/// A required argument was absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("argument '{name}' must not be absent")]
pub struct InvalidArgument {
    /// Name of the missing argument.
    pub name: &'static str,
}

/// An error returned by the Elance REST API or raised while consuming it.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    kind: ApiErrorKind,
    message: String,
    status: Option<StatusCode>,
    #[source]
    source: Option<BoxError>,
}

impl ApiError {
    /// Creates an error with the given kind and message and no cause.
    #[must_use]
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            source: None,
        }
    }

    /// Creates an error for a 4xx response.
    #[must_use]
    pub fn client_error(status: StatusCode) -> Self {
        Self::new(
            ApiErrorKind::ClientError,
            format!(
                "The server indicated a client error has occurred and returned the following HTTP status code: {status}"
            ),
        )
        .with_status(status)
    }

    /// Creates an error for a 5xx response.
    #[must_use]
    pub fn server_error(status: StatusCode) -> Self {
        Self::new(
            ApiErrorKind::ServerError,
            format!(
                "The server indicated a server error has occurred and returned the following HTTP status code: {status}"
            ),
        )
        .with_status(status)
    }

    /// Wraps a failure of the fallback handler.
    #[must_use]
    pub fn unspecified<E>(source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::new(ApiErrorKind::Unspecified, UNSPECIFIED_MESSAGE).with_source(source)
    }

    /// Creates the error reported when a required argument is absent.
    #[must_use]
    pub fn invalid_argument(name: &'static str) -> Self {
        let cause = InvalidArgument { name };
        Self::new(ApiErrorKind::Unspecified, format!("Invalid argument: {cause}")).with_source(cause)
    }

    /// Attaches the status code of the response that caused this error.
    #[must_use]
    pub const fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    /// Attaches an underlying cause, replacing any previous one.
    #[must_use]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the classification tag.
    #[must_use]
    pub const fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the response status, if this error was raised for a classified status.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Whether the server reported a client error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.kind == ApiErrorKind::ClientError
    }

    /// Whether the server reported a server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.kind == ApiErrorKind::ServerError
    }

    /// Whether this error reports an absent argument.
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        self.source
            .as_deref()
            .is_some_and(|cause| cause.is::<InvalidArgument>())
    }

    /// Consumes the error and returns its cause, if any.
    #[must_use]
    pub fn into_source(self) -> Option<BoxError> {
        self.source
    }
}
