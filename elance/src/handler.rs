//! The response error handler extension point.
//!
//! An HTTP client consults [`ResponseErrorHandler::has_error`] for every
//! response and, when it answers `true`, passes the buffered response to
//! [`ResponseErrorHandler::handle_error`].
//!
//! [`DefaultResponseErrorHandler`] is the generic implementation: it reports
//! 4xx and 5xx responses as [`HttpResponseError`] and lets success codes
//! through.

use http::{Method, StatusCode};
use url::Url;

use crate::response::ErrorResponse;

/// Decides whether a response is an error and turns it into one.
pub trait ResponseErrorHandler {
    /// Error produced for a response the handler rejects.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Whether a response with this status should be passed to [`Self::handle_error`].
    ///
    /// The default treats 4xx and 5xx as errors.
    fn has_error(&self, status: StatusCode) -> bool {
        status.is_client_error() || status.is_server_error()
    }

    /// Handles a response for which [`Self::has_error`] returned `true`.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] when the response is rejected. `Ok(())` means
    /// the handler accepted the response and the caller may use it.
    fn handle_error(
        &self,
        uri: &Url,
        method: &Method,
        response: &ErrorResponse,
    ) -> Result<(), Self::Error>;
}

impl<H: ResponseErrorHandler + ?Sized> ResponseErrorHandler for &H {
    type Error = H::Error;

    fn has_error(&self, status: StatusCode) -> bool {
        (**self).has_error(status)
    }

    fn handle_error(
        &self,
        uri: &Url,
        method: &Method,
        response: &ErrorResponse,
    ) -> Result<(), Self::Error> {
        (**self).handle_error(uri, method, response)
    }
}

/// Error raised by [`DefaultResponseErrorHandler`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HttpResponseError {
    /// The server answered with a 4xx status.
    #[error("{method} request for '{uri}' resulted in {status} (client error)")]
    Client {
        /// Request URI.
        uri: Url,
        /// Request method.
        method: Method,
        /// Response status.
        status: StatusCode,
    },
    /// The server answered with a 5xx status.
    #[error("{method} request for '{uri}' resulted in {status} (server error)")]
    Server {
        /// Request URI.
        uri: Url,
        /// Request method.
        method: Method,
        /// Response status.
        status: StatusCode,
    },
    /// The status is neither a success nor a client or server error.
    #[error("{method} request for '{uri}' resulted in unknown status code {status}")]
    UnknownStatus {
        /// Request URI.
        uri: Url,
        /// Request method.
        method: Method,
        /// Response status.
        status: StatusCode,
    },
}

impl HttpResponseError {
    /// Returns the status of the rejected response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Client { status, .. }
            | Self::Server { status, .. }
            | Self::UnknownStatus { status, .. } => *status,
        }
    }
}

/// Generic handler used when no service-specific handling applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultResponseErrorHandler;

impl ResponseErrorHandler for DefaultResponseErrorHandler {
    type Error = HttpResponseError;

    fn handle_error(
        &self,
        uri: &Url,
        method: &Method,
        response: &ErrorResponse,
    ) -> Result<(), HttpResponseError> {
        let status = response.status();
        let (uri, method) = (uri.clone(), method.clone());
        if status.is_success() {
            Ok(())
        } else if status.is_client_error() {
            Err(HttpResponseError::Client {
                uri,
                method,
                status,
            })
        } else if status.is_server_error() {
            Err(HttpResponseError::Server {
                uri,
                method,
                status,
            })
        } else {
            Err(HttpResponseError::UnknownStatus {
                uri,
                method,
                status,
            })
        }
    }
}
