//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the site core:
//! - Configuration management (API base URL, feature switch, timeouts)
//! - The generic API call layer and its error taxonomy
//! - Logging and tracing infrastructure
//! - Event bus system
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that the content, auth and
//! service crates depend on. It fixes how requests are issued (one attempt,
//! fixed deadline, JSON headers, optional bearer token), how failures are
//! classified, and how state changes are broadcast.

pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use api::{ApiClient, ApiError, TokenSource};
pub use config::{ApiConfig, Endpoints, SiteConfig};
pub use error::{Error, Result};
