//! Resource kinds
//!
//! One zero-sized type per resource, carrying everything the generic
//! fetcher needs: where to fetch, how the body may be wrapped, how to turn a
//! wire record into a view model, and which dataset to fall back to.

use crate::error::Result;
use crate::fallback;
use crate::models::{BlogPost, ContentItem, Document, Engageable, Project, TeamMember, Video};
use crate::raw::{RawBlogPost, RawDocument, RawProject, RawTeamMember, RawVideo};
use crate::transform::{self, TransformContext};
use core_runtime::Endpoints;
use serde::de::DeserializeOwned;

pub trait ResourceKind: Send + Sync + 'static {
    /// Plural name used in logs, events and error messages.
    const NAME: &'static str;
    /// Singular display label, e.g. `"Project"`.
    const LABEL: &'static str;
    /// Collection keys accepted by [`Envelope::resolve`](crate::envelope::Envelope::resolve).
    const ENVELOPE_KEYS: &'static [&'static str];
    /// Record keys accepted by [`resolve_single`](crate::envelope::resolve_single).
    const SINGULAR_KEYS: &'static [&'static str];

    type Raw: DeserializeOwned + Send;
    type Item: ContentItem;

    fn endpoint(endpoints: &Endpoints) -> &str;

    fn transform(raw: Self::Raw, ctx: &TransformContext) -> Result<Self::Item>;

    fn fallback() -> &'static [Self::Item];
}

/// A kind whose records carry a server-side engagement counter.
pub trait TrackedKind: ResourceKind
where
    Self::Item: Engageable,
{
    /// Path segment appended to `<endpoint>/<id>/`.
    const ACTION: &'static str;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Projects;

impl ResourceKind for Projects {
    const NAME: &'static str = "projects";
    const LABEL: &'static str = "Project";
    const ENVELOPE_KEYS: &'static [&'static str] = &["projects"];
    const SINGULAR_KEYS: &'static [&'static str] = &["project"];

    type Raw = RawProject;
    type Item = Project;

    fn endpoint(endpoints: &Endpoints) -> &str {
        &endpoints.projects
    }

    fn transform(raw: RawProject, ctx: &TransformContext) -> Result<Project> {
        transform::project(raw, ctx)
    }

    fn fallback() -> &'static [Project] {
        &fallback::PROJECTS
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Blogs;

impl ResourceKind for Blogs {
    const NAME: &'static str = "blogs";
    const LABEL: &'static str = "Blog post";
    const ENVELOPE_KEYS: &'static [&'static str] = &["blogs", "posts"];
    const SINGULAR_KEYS: &'static [&'static str] = &["blog", "post"];

    type Raw = RawBlogPost;
    type Item = BlogPost;

    fn endpoint(endpoints: &Endpoints) -> &str {
        &endpoints.blogs
    }

    fn transform(raw: RawBlogPost, ctx: &TransformContext) -> Result<BlogPost> {
        transform::blog_post(raw, ctx)
    }

    fn fallback() -> &'static [BlogPost] {
        &fallback::BLOG_POSTS
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Team;

impl ResourceKind for Team {
    const NAME: &'static str = "team";
    const LABEL: &'static str = "Team member";
    const ENVELOPE_KEYS: &'static [&'static str] = &["team", "members"];
    const SINGULAR_KEYS: &'static [&'static str] = &["member"];

    type Raw = RawTeamMember;
    type Item = TeamMember;

    fn endpoint(endpoints: &Endpoints) -> &str {
        &endpoints.team
    }

    fn transform(raw: RawTeamMember, ctx: &TransformContext) -> Result<TeamMember> {
        transform::team_member(raw, ctx)
    }

    fn fallback() -> &'static [TeamMember] {
        &fallback::TEAM
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Videos;

impl ResourceKind for Videos {
    const NAME: &'static str = "videos";
    const LABEL: &'static str = "Video";
    const ENVELOPE_KEYS: &'static [&'static str] = &["videos"];
    const SINGULAR_KEYS: &'static [&'static str] = &["video"];

    type Raw = RawVideo;
    type Item = Video;

    fn endpoint(endpoints: &Endpoints) -> &str {
        &endpoints.videos
    }

    fn transform(raw: RawVideo, ctx: &TransformContext) -> Result<Video> {
        transform::video(raw, ctx)
    }

    fn fallback() -> &'static [Video] {
        &fallback::VIDEOS
    }
}

impl TrackedKind for Videos {
    const ACTION: &'static str = "view";
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Documents;

impl ResourceKind for Documents {
    const NAME: &'static str = "documents";
    const LABEL: &'static str = "Document";
    const ENVELOPE_KEYS: &'static [&'static str] = &["resources", "documents"];
    const SINGULAR_KEYS: &'static [&'static str] = &["resource", "document"];

    type Raw = RawDocument;
    type Item = Document;

    fn endpoint(endpoints: &Endpoints) -> &str {
        &endpoints.documents
    }

    fn transform(raw: RawDocument, ctx: &TransformContext) -> Result<Document> {
        transform::document(raw, ctx)
    }

    fn fallback() -> &'static [Document] {
        &fallback::DOCUMENTS
    }
}

impl TrackedKind for Documents {
    const ACTION: &'static str = "download";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_follow_configuration() {
        let endpoints = Endpoints::default();
        assert_eq!(Projects::endpoint(&endpoints), "/projects");
        assert_eq!(Blogs::endpoint(&endpoints), "/blog");
        assert_eq!(Team::endpoint(&endpoints), "/team");
        assert_eq!(Videos::endpoint(&endpoints), "/media/videos");
        assert_eq!(Documents::endpoint(&endpoints), "/media/documents");
    }

    #[test]
    fn test_tracking_actions() {
        assert_eq!(Videos::ACTION, "view");
        assert_eq!(Documents::ACTION, "download");
    }
}
