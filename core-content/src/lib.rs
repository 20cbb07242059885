//! # Core Content
//!
//! Data layer for the site's public content: projects, blog posts, team
//! members, videos and documents.
//!
//! ## Overview
//!
//! Every content type goes through the same pipeline:
//!
//! 1. [`ResourceFetcher`] requests the collection through the shared
//!    [`ApiClient`](core_runtime::ApiClient).
//! 2. [`Envelope`] unwraps whichever response shape the endpoint used.
//! 3. The [`transform`] functions turn each wire record into a view model,
//!    filling defaults and resolving media URLs.
//! 4. When anything fails, or the API is switched off, the bundled
//!    [`fallback`] dataset is served instead, and the reason is kept in
//!    [`FetchState::error_message`].
//!
//! The per-type differences (endpoint, envelope keys, transform, fallback)
//! live in the zero-sized [`kind`] types.
//!
//! ## Usage
//!
//! ```ignore
//! use core_content::{kind::Videos, ResourceFetcher, ResourceId};
//!
//! let videos = ResourceFetcher::<Videos>::new(api, clock);
//! let state = videos.load().await;
//! if state.is_using_fallback {
//!     println!("showing sample videos: {:?}", state.error_message);
//! }
//! videos.record_engagement(&ResourceId::from(7)).await;
//! ```

pub mod envelope;
pub mod error;
pub mod fallback;
pub mod fetcher;
pub mod grouping;
pub mod id;
pub mod kind;
pub mod models;
pub mod raw;
pub mod transform;

pub use envelope::Envelope;
pub use error::{ContentError, FailureKind, Result};
pub use fetcher::{DetailState, FetchState, ResourceFetcher};
pub use grouping::{group_documents, DocumentGroup};
pub use id::ResourceId;
pub use kind::{Blogs, Documents, Projects, ResourceKind, Team, TrackedKind, Videos};
pub use models::{BlogPost, ContentItem, Document, Engageable, Project, TeamMember, Video};
pub use transform::TransformContext;
