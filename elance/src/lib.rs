#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Error classification for the Elance REST API.
//!
//! An HTTP client calls a [`ResponseErrorHandler`] once it has decided that a
//! response represents an error. This crate provides that extension point, a
//! generic [`DefaultResponseErrorHandler`], and the Elance-specific
//! [`ElanceErrorHandler`] which turns 4xx and 5xx responses into an
//! [`ApiError`] tagged with an [`ApiErrorKind`].
//!
//! ```
//! use elance::{ApiErrorKind, ElanceErrorHandler, ErrorResponse, ResponseErrorHandler};
//! use http::{HeaderMap, Method, StatusCode};
//! use url::Url;
//!
//! let handler = ElanceErrorHandler::new();
//! let uri = Url::parse("https://api.elance.com/api2/jobs").unwrap();
//! let response = ErrorResponse::new(StatusCode::NOT_FOUND, HeaderMap::new(), Vec::new());
//!
//! let err = handler.handle_error(&uri, &Method::GET, &response).unwrap_err();
//! assert_eq!(err.kind(), ApiErrorKind::ClientError);
//! assert!(err.to_string().contains("404"));
//! ```
//!
//! # Modules
//!
//! - [`classifier`] - The Elance error handler
//! - [`error`] - Domain error types
//! - [`handler`] - The handler extension point and the default handler
//! - [`response`] - The buffered response a handler inspects
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing events for handled responses

pub mod classifier;
pub mod error;
pub mod handler;
pub mod response;

pub use classifier::ElanceErrorHandler;
pub use error::{ApiError, ApiErrorKind, InvalidArgument};
pub use handler::{DefaultResponseErrorHandler, HttpResponseError, ResponseErrorHandler};
pub use response::ErrorResponse;
