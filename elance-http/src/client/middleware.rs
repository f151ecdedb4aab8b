//! The [`ErrorHandling`] middleware.

use elance::{ElanceErrorHandler, ErrorResponse, ResponseErrorHandler};
use http::{Extensions, Version};
use reqwest::{Request, Response, ResponseBuilderExt, Url};
use reqwest_middleware as rqm;
#[cfg(feature = "telemetry")]
use tracing::{debug, instrument, trace};

/// Middleware that passes error responses to a [`ResponseErrorHandler`].
///
/// Responses for which [`ResponseErrorHandler::has_error`] is `false` are
/// returned untouched. Otherwise the body is buffered and the handler decides:
/// a rejection becomes [`rqm::Error::Middleware`], an acceptance returns an
/// equivalent response carrying the buffered body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorHandling<H> {
    handler: H,
}

impl ErrorHandling<ElanceErrorHandler> {
    /// Creates the middleware around [`ElanceErrorHandler`].
    #[must_use]
    pub const fn elance() -> Self {
        Self::new(ElanceErrorHandler::new())
    }
}

impl<H> ErrorHandling<H> {
    /// Creates the middleware around `handler`.
    #[must_use]
    pub const fn new(handler: H) -> Self {
        Self { handler }
    }

    /// Returns the wrapped handler.
    #[must_use]
    pub const fn handler(&self) -> &H {
        &self.handler
    }
}

/// Runs the next middleware or HTTP client with optional telemetry instrumentation.
#[cfg_attr(
    feature = "telemetry",
    instrument(name = "elance.reqwest.next", skip_all)
)]
async fn run_next(
    next: rqm::Next<'_>,
    req: Request,
    extensions: &mut Extensions,
) -> rqm::Result<Response> {
    next.run(req, extensions).await
}

#[async_trait::async_trait]
impl<H> rqm::Middleware for ErrorHandling<H>
where
    H: ResponseErrorHandler + Send + Sync + 'static,
{
    /// Sends the request and hands an error response to the handler.
    #[cfg_attr(
        feature = "telemetry",
        instrument(name = "elance.reqwest.handle", skip_all, err)
    )]
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: rqm::Next<'_>,
    ) -> rqm::Result<Response> {
        let method = req.method().clone();
        let request_url = req.url().clone();
        let res = run_next(next, req, extensions).await?;

        let status = res.status();
        if !self.handler.has_error(status) {
            #[cfg(feature = "telemetry")]
            trace!(status = ?status, "Not an error response, returning it");
            return Ok(res);
        }

        let response_url = res.url().clone();
        let version = res.version();
        let headers = res.headers().clone();
        let body = res.bytes().await?;
        let response = ErrorResponse::new(status, headers, body.to_vec());

        self.handler
            .handle_error(&request_url, &method, &response)
            .map_err(|e| rqm::Error::Middleware(e.into()))?;

        #[cfg(feature = "telemetry")]
        debug!(status = ?status, url = %response_url, "Handler accepted error response");

        rebuild(response, version, response_url)
    }
}

/// Reassembles a response from its buffered parts.
fn rebuild(response: ErrorResponse, version: Version, url: Url) -> rqm::Result<Response> {
    let (status, headers, body) = response.into_parts();
    let mut rebuilt = http::Response::builder()
        .status(status)
        .version(version)
        .url(url)
        .body(body)
        .map_err(|e| rqm::Error::Middleware(e.into()))?;
    *rebuilt.headers_mut() = headers;
    Ok(Response::from(rebuilt))
}
