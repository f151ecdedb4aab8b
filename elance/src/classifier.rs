//! Error handling for responses from the Elance REST API.
//!
//! [`ElanceErrorHandler`] classifies 4xx and 5xx responses into an
//! [`ApiError`] and defers every other status to a delegate handler. Any error
//! the delegate raises is wrapped as [`ApiErrorKind::Unspecified`] with the
//! delegate's error kept as the cause.

use http::{Method, StatusCode};
use url::Url;

#[cfg(feature = "telemetry")]
use tracing::{debug, trace};

use crate::error::{ApiError, ApiErrorKind};
use crate::handler::{DefaultResponseErrorHandler, ResponseErrorHandler};
use crate::response::ErrorResponse;

/// Turns error responses from the Elance REST API into [`ApiError`]s.
///
/// The delegate is consulted for [`ResponseErrorHandler::has_error`] and for
/// every status outside the 4xx and 5xx classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElanceErrorHandler<D = DefaultResponseErrorHandler> {
    delegate: D,
}

impl ElanceErrorHandler {
    /// Creates a handler that falls back to [`DefaultResponseErrorHandler`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delegate: DefaultResponseErrorHandler,
        }
    }
}

impl<D> ElanceErrorHandler<D> {
    /// Creates a handler that falls back to `delegate`.
    #[must_use]
    pub const fn with_delegate(delegate: D) -> Self {
        Self { delegate }
    }

    /// Returns the fallback handler.
    #[must_use]
    pub const fn delegate(&self) -> &D {
        &self.delegate
    }
}

impl<D: ResponseErrorHandler> ElanceErrorHandler<D> {
    /// Handles a response that may be absent.
    ///
    /// # Errors
    ///
    /// Returns an invalid-argument [`ApiError`] (see [`ApiError::is_invalid_argument`])
    /// when `response` is `None`, otherwise whatever [`Self::handle_error`] returns.
    pub fn handle(
        &self,
        uri: &Url,
        method: &Method,
        response: Option<&ErrorResponse>,
    ) -> Result<(), ApiError> {
        let response = response.ok_or_else(|| ApiError::invalid_argument("response"))?;
        self.handle_error(uri, method, response)
    }
}

impl<D: ResponseErrorHandler> ResponseErrorHandler for ElanceErrorHandler<D> {
    type Error = ApiError;

    fn has_error(&self, status: StatusCode) -> bool {
        self.delegate.has_error(status)
    }

    fn handle_error(
        &self,
        uri: &Url,
        method: &Method,
        response: &ErrorResponse,
    ) -> Result<(), ApiError> {
        let status = response.status();

        #[cfg(feature = "telemetry")]
        debug!(
            %uri,
            %method,
            status = status.as_u16(),
            body = %response.body_text(),
            "Handling error response from Elance"
        );

        match ApiErrorKind::from_status(status) {
            Some(ApiErrorKind::ClientError) => return Err(ApiError::client_error(status)),
            Some(ApiErrorKind::ServerError) => return Err(ApiError::server_error(status)),
            _ => {}
        }

        #[cfg(feature = "telemetry")]
        trace!(status = status.as_u16(), "Status not classified, deferring to delegate");

        self.delegate
            .handle_error(uri, method, response)
            .map_err(ApiError::unspecified)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::error::Error as _;

    use http::HeaderMap;

    use super::*;
    use crate::error::UNSPECIFIED_MESSAGE;
    use crate::handler::HttpResponseError;

    fn uri() -> Url {
        Url::parse("https://api.elance.com/api2/jobs/12345").unwrap()
    }

    fn response(code: u16) -> ErrorResponse {
        ErrorResponse::new(
            StatusCode::from_u16(code).unwrap(),
            HeaderMap::new(),
            b"{\"errors\":[{\"code\":\"1001\"}]}".to_vec(),
        )
    }

    /// Records whether it was called and fails every call.
    #[derive(Default)]
    struct FailingDelegate {
        calls: Cell<usize>,
    }

    impl ResponseErrorHandler for FailingDelegate {
        type Error = HttpResponseError;

        fn handle_error(
            &self,
            uri: &Url,
            method: &Method,
            response: &ErrorResponse,
        ) -> Result<(), HttpResponseError> {
            self.calls.set(self.calls.get() + 1);
            Err(HttpResponseError::UnknownStatus {
                uri: uri.clone(),
                method: method.clone(),
                status: response.status(),
            })
        }
    }

    #[test]
    fn not_found_is_a_client_error() {
        let err = ElanceErrorHandler::new()
            .handle_error(&uri(), &Method::GET, &response(404))
            .unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::ClientError);
        assert!(err.to_string().contains("404"));
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert!(err.source().is_none());
    }

    #[test]
    fn service_unavailable_is_a_server_error() {
        let err = ElanceErrorHandler::new()
            .handle_error(&uri(), &Method::POST, &response(503))
            .unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::ServerError);
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn every_4xx_is_classified_without_the_delegate() {
        let handler = ElanceErrorHandler::with_delegate(FailingDelegate::default());
        for code in 400..=499 {
            let err = handler
                .handle_error(&uri(), &Method::GET, &response(code))
                .unwrap_err();
            assert!(err.is_client_error(), "{code}");
            assert!(err.message().contains(&code.to_string()), "{code}");
        }
        assert_eq!(handler.delegate().calls.get(), 0);
    }

    #[test]
    fn every_5xx_is_classified_without_the_delegate() {
        let handler = ElanceErrorHandler::with_delegate(FailingDelegate::default());
        for code in 500..=599 {
            let err = handler
                .handle_error(&uri(), &Method::PUT, &response(code))
                .unwrap_err();
            assert!(err.is_server_error(), "{code}");
            assert!(err.message().contains(&code.to_string()), "{code}");
        }
        assert_eq!(handler.delegate().calls.get(), 0);
    }

    #[test]
    fn other_codes_go_to_the_delegate_and_are_wrapped() {
        let handler = ElanceErrorHandler::with_delegate(FailingDelegate::default());
        for code in [200, 300, 600] {
            let err = handler
                .handle_error(&uri(), &Method::GET, &response(code))
                .unwrap_err();
            assert_eq!(err.kind(), ApiErrorKind::Unspecified);
            assert_eq!(err.to_string(), UNSPECIFIED_MESSAGE);
            assert_eq!(err.status(), None);

            let cause = err
                .source()
                .and_then(|cause| cause.downcast_ref::<HttpResponseError>())
                .unwrap();
            assert_eq!(cause.status().as_u16(), code);
        }
        assert_eq!(handler.delegate().calls.get(), 3);
    }

    #[test]
    fn success_passes_through_the_default_delegate() {
        let handler = ElanceErrorHandler::new();
        assert!(handler.handle_error(&uri(), &Method::GET, &response(200)).is_ok());
    }

    #[test]
    fn unknown_status_from_the_default_delegate_is_unspecified() {
        let err = ElanceErrorHandler::new()
            .handle_error(&uri(), &Method::GET, &response(302))
            .unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::Unspecified);
        let cause = err.into_source().unwrap();
        assert!(matches!(
            cause.downcast_ref::<HttpResponseError>(),
            Some(HttpResponseError::UnknownStatus { .. })
        ));
    }

    #[test]
    fn absent_response_is_rejected_before_any_handling() {
        let handler = ElanceErrorHandler::with_delegate(FailingDelegate::default());
        let err = handler.handle(&uri(), &Method::GET, None).unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(err.kind(), ApiErrorKind::Unspecified);
        assert_eq!(handler.delegate().calls.get(), 0);

        let present = response(410);
        let err = handler.handle(&uri(), &Method::GET, Some(&present)).unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn has_error_follows_the_delegate() {
        let handler = ElanceErrorHandler::new();
        assert!(handler.has_error(StatusCode::TOO_MANY_REQUESTS));
        assert!(handler.has_error(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(!handler.has_error(StatusCode::CREATED));
    }

    #[cfg(feature = "telemetry")]
    #[test]
    fn logs_handled_responses_with_a_lossy_body() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let handler = ElanceErrorHandler::new();
            let garbled = ErrorResponse::new(
                StatusCode::BAD_REQUEST,
                HeaderMap::new(),
                vec![b'{', 0xFF, b'}'],
            );
            let err = handler
                .handle_error(&uri(), &Method::GET, &garbled)
                .unwrap_err();
            assert!(err.is_client_error());

            assert!(handler.handle_error(&uri(), &Method::GET, &response(204)).is_ok());
        });
    }
}
