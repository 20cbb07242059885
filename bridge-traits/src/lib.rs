//! # Host Bridge Traits
//!
//! Capability traits the site core needs from its host.
//!
//! ## Overview
//!
//! The content layer never talks to the network or to a logging backend
//! directly. It goes through the traits in this crate, so a desktop build can
//! plug in `reqwest` while tests plug in mocks and a browser build can plug in
//! `fetch`.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - Single-shot async HTTP requests with a per-request deadline
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Status |
//! |----------|---------------------|--------|
//! | Desktop / server | `bridge-desktop` | ✅ |
//! | Tests    | `mockall` mocks     | ✅ |
//! | Web      | TBD                 | 📋 Planned |
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Platform
//! implementations should map their native failures onto the closest variant,
//! in particular keeping timeouts (`BridgeError::Timeout`) distinct from
//! connection failures (`BridgeError::ConnectionFailed`), because callers
//! report them differently.
//!
//! ## Example
//!
//! ```ignore
//! use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct MyHttpClient {
//!     client: reqwest::Client,
//! }
//!
//! #[async_trait]
//! impl HttpClient for MyHttpClient {
//!     async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
//!         todo!()
//!     }
//! }
//! ```

pub mod error;
pub mod http;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use time::{Clock, ConsoleLogger, FixedClock, LogEntry, LogLevel, LoggerSink, SystemClock};
