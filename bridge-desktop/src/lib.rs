//! # Desktop Bridge Implementations
//!
//! Native implementations of the bridge traits for desktop and server hosts
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest` with rustls
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::ReqwestHttpClient;
//! use std::sync::Arc;
//!
//! let http_client = Arc::new(ReqwestHttpClient::try_new()?);
//! let config = SiteConfig::builder().http_client(http_client).build()?;
//! ```

mod http;

pub use http::ReqwestHttpClient;
