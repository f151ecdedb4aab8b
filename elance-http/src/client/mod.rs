//! Reqwest middleware that applies a [`ResponseErrorHandler`] to every response.
//!
//! The [`ErrorHandling`] middleware asks its handler whether a response is an
//! error. If so, the body is buffered and handed to
//! [`ResponseErrorHandler::handle_error`]; a rejection surfaces as
//! [`reqwest_middleware::Error::Middleware`] and can be recovered with
//! [`handler_error`].
//!
//! ```no_run
//! use elance::ApiError;
//! use elance_http::client::{
//!     ErrorHandling, ReqwestWithErrorHandling, ReqwestWithErrorHandlingBuild, handler_error,
//! };
//!
//! # async fn run() {
//! let client = reqwest::Client::new()
//!     .with_error_handler(ErrorHandling::elance())
//!     .build();
//!
//! match client.get("https://api.elance.com/api2/jobs").send().await {
//!     Ok(response) => println!("{}", response.status()),
//!     Err(err) => {
//!         if let Some(api_error) = handler_error::<ApiError>(&err) {
//!             println!("{}: {api_error}", api_error.kind());
//!         }
//!     }
//! }
//! # }
//! ```

mod middleware;

pub use middleware::*;

use elance::ResponseErrorHandler;
use reqwest::{Client, ClientBuilder};
use reqwest_middleware as rqm;

/// Trait for adding error handling to reqwest clients.
///
/// Implemented on [`Client`] and [`ClientBuilder`]. Building from a
/// [`ClientBuilder`] can fail, so its [`ReqwestWithErrorHandlingBuild::build`]
/// returns a `Result`; building from a ready [`Client`] cannot.
pub trait ReqwestWithErrorHandling<A> {
    /// Adds the error handling middleware to the client or builder.
    ///
    /// # Arguments
    ///
    /// * `middleware` - The middleware wrapping the handler that decides which
    ///   responses are errors, usually [`ErrorHandling::elance`]
    ///
    /// # Returns
    ///
    /// A builder that produces a `reqwest-middleware` client through
    /// [`ReqwestWithErrorHandlingBuild`].
    fn with_error_handler<H>(
        self,
        middleware: ErrorHandling<H>,
    ) -> ReqwestWithErrorHandlingBuilder<A, H>;
}

impl ReqwestWithErrorHandling<Self> for Client {
    fn with_error_handler<H>(
        self,
        middleware: ErrorHandling<H>,
    ) -> ReqwestWithErrorHandlingBuilder<Self, H> {
        ReqwestWithErrorHandlingBuilder {
            inner: self,
            middleware,
        }
    }
}

impl ReqwestWithErrorHandling<Self> for ClientBuilder {
    fn with_error_handler<H>(
        self,
        middleware: ErrorHandling<H>,
    ) -> ReqwestWithErrorHandlingBuilder<Self, H> {
        ReqwestWithErrorHandlingBuilder {
            inner: self,
            middleware,
        }
    }
}

/// Builder for creating a reqwest client with the error handling middleware.
#[allow(missing_debug_implementations)] // generic A may not implement Debug
pub struct ReqwestWithErrorHandlingBuilder<A, H> {
    inner: A,
    middleware: ErrorHandling<H>,
}

/// Trait for building the final client from a [`ReqwestWithErrorHandlingBuilder`].
pub trait ReqwestWithErrorHandlingBuild {
    /// The type returned by [`build`](Self::build)
    type BuildResult;
    /// The type returned by [`builder`](Self::builder)
    type BuilderResult;

    /// Builds the client, consuming the builder.
    fn build(self) -> Self::BuildResult;

    /// Returns the underlying reqwest-middleware builder with the middleware added.
    fn builder(self) -> Self::BuilderResult;
}

impl<H> ReqwestWithErrorHandlingBuild for ReqwestWithErrorHandlingBuilder<Client, H>
where
    H: ResponseErrorHandler + Send + Sync + 'static,
{
    type BuildResult = rqm::ClientWithMiddleware;
    type BuilderResult = rqm::ClientBuilder;

    fn build(self) -> Self::BuildResult {
        self.builder().build()
    }

    fn builder(self) -> Self::BuilderResult {
        rqm::ClientBuilder::new(self.inner).with(self.middleware)
    }
}

impl<H> ReqwestWithErrorHandlingBuild for ReqwestWithErrorHandlingBuilder<ClientBuilder, H>
where
    H: ResponseErrorHandler + Send + Sync + 'static,
{
    type BuildResult = Result<rqm::ClientWithMiddleware, reqwest::Error>;
    type BuilderResult = Result<rqm::ClientBuilder, reqwest::Error>;

    fn build(self) -> Self::BuildResult {
        let builder = self.builder()?;
        Ok(builder.build())
    }

    fn builder(self) -> Self::BuilderResult {
        let client = self.inner.build()?;
        Ok(rqm::ClientBuilder::new(client).with(self.middleware))
    }
}

/// Recovers the typed handler error from a middleware error.
///
/// # Arguments
///
/// * `err` - The error returned by a client built with [`ErrorHandling`]
///
/// # Returns
///
/// The handler's error when it is of type `E`. `None` for transport failures,
/// which pass through as [`rqm::Error::Reqwest`], and for errors raised by
/// other middleware.
#[must_use]
pub fn handler_error<E>(err: &rqm::Error) -> Option<&E>
where
    E: std::fmt::Display + std::fmt::Debug + Send + Sync + 'static,
{
    if let rqm::Error::Middleware(inner) = err {
        inner.downcast_ref::<E>()
    } else {
        None
    }
}
