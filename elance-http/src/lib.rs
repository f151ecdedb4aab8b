#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! HTTP client integration for Elance REST API error handling.
//!
//! Installs an [`elance::ResponseErrorHandler`] on a `reqwest` client as a
//! `reqwest-middleware` middleware, so every error response is turned into a
//! typed error before it reaches the caller.
//!
//! # Modules
//!
//! - [`client`] - Middleware and client builder extension (feature: `client`)
//!
//! # Feature Flags
//!
//! - `client` - reqwest middleware (enabled by default)
//! - `telemetry` - Enables tracing instrumentation

#[cfg(feature = "client")]
pub mod client;
