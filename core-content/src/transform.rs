//! View-Model Transformer
//!
//! Turns one wire record into one view model. Each function either returns a
//! complete view model or an error; the fetcher drops records that error, so
//! a half-built record never reaches the presentation layer.
//!
//! ## Rules
//!
//! - Both spellings of a field are accepted; the snake_case one wins.
//! - Blank strings count as absent.
//! - Missing title: `"Untitled <Kind>"`. Missing description:
//!   `"No description available"`. Missing counters: `0`. Missing category:
//!   `"uncategorized"`.
//! - Relative media URLs are resolved against the API base URL.
//! - Timestamps render as `"March 15, 2023"` (en-US, UTC).

use crate::error::{ContentError, Result};
use crate::id::ResourceId;
use crate::models::{BlogPost, Document, Project, ResourceRecord, TeamMember, Video};
use crate::raw::{RawBlogPost, RawDocument, RawProject, RawTeamMember, RawVideo};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use core_runtime::ApiConfig;

pub const NO_DESCRIPTION: &str = "No description available";
pub const UNCATEGORIZED: &str = "uncategorized";
pub const UNKNOWN_DATE: &str = "Unknown Date";

pub const VIDEO_THUMBNAIL_PLACEHOLDER: &str = "/placeholder.svg?height=300&width=400";
pub const DOCUMENT_THUMBNAIL_PLACEHOLDER: &str = "/placeholder.svg?height=200&width=300";
const DEFAULT_DURATION: &str = "00:00";
const DEFAULT_FILE_TYPE: &str = "PDF";
const DEFAULT_FILE_SIZE: &str = "Unknown";
const DEFAULT_AUTHOR: &str = "RNADW Team";
const UNNAMED_MEMBER: &str = "Unnamed Team Member";
const DEFAULT_POSITION: &str = "Team Member";
const EXCERPT_CHARS: usize = 150;

/// Prefixes that mark a URL as already absolute.
const ABSOLUTE_PREFIXES: &[&str] = &["http://", "https://", "//", "data:", "blob:"];

/// Settings the transformer needs from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformContext {
    pub base_url: String,
}

impl TransformContext {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(config.base_url.clone())
    }

    /// Resolves a media URL against the base URL unless it is already absolute.
    pub fn media_url(&self, url: &str) -> String {
        let url = url.trim();
        if ABSOLUTE_PREFIXES.iter().any(|prefix| url.starts_with(prefix)) {
            return url.to_string();
        }

        format!(
            "{}/{}",
            self.base_url.trim().trim_end_matches('/'),
            url.trim_start_matches('/')
        )
    }

    fn optional_media_url(&self, url: Option<String>) -> Option<String> {
        url.map(|u| self.media_url(&u))
    }
}

/// First value that is present and not blank.
fn first_present<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
}

fn untitled(label: &str) -> String {
    format!("Untitled {}", label)
}

fn require_id(
    resource: &'static str,
    primary: Option<ResourceId>,
    secondary: Option<ResourceId>,
) -> Result<ResourceId> {
    primary.or(secondary).ok_or(ContentError::MissingField {
        resource,
        field: "id",
    })
}

/// Parses the timestamp formats the backend is known to send, as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Long-form en-US date, e.g. `"March 15, 2023"`.
pub fn long_date(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%B %-d, %Y").to_string()
}

/// Display label and parsed timestamp for an optional source date.
///
/// Absent or blank → `"Unknown Date"`; unparseable → the raw string.
pub fn date_label(raw: Option<&str>) -> (String, Option<DateTime<Utc>>) {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => (UNKNOWN_DATE.to_string(), None),
        Some(text) => match parse_timestamp(text) {
            Some(timestamp) => (long_date(&timestamp), Some(timestamp)),
            None => (text.to_string(), None),
        },
    }
}

/// `excerpt`, else the first 150 characters of `content` followed by `...`.
pub fn derive_excerpt(excerpt: Option<String>, content: &str) -> String {
    if let Some(excerpt) = excerpt {
        return excerpt;
    }

    let mut chars = content.chars();
    let head: String = chars.by_ref().take(EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head.trim_end())
    } else {
        head
    }
}

pub fn video(raw: RawVideo, ctx: &TransformContext) -> Result<Video> {
    let id = require_id("videos", raw.id, raw.object_id)?;
    let source_url = first_present([raw.url, raw.video_url_snake, raw.video_url_camel]).ok_or(
        ContentError::MissingField {
            resource: "videos",
            field: "url",
        },
    )?;
    let (date_label, created_at) =
        date_label(first_present([raw.created_at, raw.created_at_camel]).as_deref());

    Ok(Video {
        record: ResourceRecord {
            id,
            title: first_present([raw.title]).unwrap_or_else(|| untitled("Video")),
            description: first_present([raw.description])
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            category: first_present([raw.category]).unwrap_or_else(|| UNCATEGORIZED.to_string()),
            date_label,
            created_at,
        },
        thumbnail: first_present([raw.thumbnail_url, raw.thumbnail_url_camel, raw.thumbnail])
            .map(|url| ctx.media_url(&url))
            .unwrap_or_else(|| VIDEO_THUMBNAIL_PLACEHOLDER.to_string()),
        video_url: ctx.media_url(&source_url),
        duration: first_present([raw.duration]).unwrap_or_else(|| DEFAULT_DURATION.to_string()),
        views: raw.views.unwrap_or(0),
    })
}

pub fn document(raw: RawDocument, ctx: &TransformContext) -> Result<Document> {
    let id = require_id("documents", raw.id, raw.object_id)?;
    let (date_label, created_at) =
        date_label(first_present([raw.created_at, raw.created_at_camel]).as_deref());

    let file_url = ctx
        .optional_media_url(first_present([raw.file_url, raw.file_url_camel]))
        .unwrap_or_default();
    let preview_url = ctx
        .optional_media_url(first_present([raw.preview_url, raw.preview_url_camel]))
        .unwrap_or_else(|| file_url.clone());

    Ok(Document {
        record: ResourceRecord {
            id,
            title: first_present([raw.title]).unwrap_or_else(|| untitled("Document")),
            description: first_present([raw.description])
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            category: first_present([raw.category]).unwrap_or_else(|| UNCATEGORIZED.to_string()),
            date_label,
            created_at,
        },
        file_type: first_present([raw.file_type]).unwrap_or_else(|| DEFAULT_FILE_TYPE.to_string()),
        size: first_present([raw.size]).unwrap_or_else(|| DEFAULT_FILE_SIZE.to_string()),
        thumbnail: ctx
            .optional_media_url(first_present([raw.thumbnail_url, raw.thumbnail_url_camel]))
            .unwrap_or_else(|| DOCUMENT_THUMBNAIL_PLACEHOLDER.to_string()),
        downloads: raw.downloads.unwrap_or(0),
        file_url,
        preview_url,
    })
}

pub fn project(raw: RawProject, ctx: &TransformContext) -> Result<Project> {
    let id = require_id("projects", raw.object_id, raw.id)?;
    let (date_label, created_at) =
        date_label(first_present([raw.created_at, raw.created_at_camel, raw.date]).as_deref());
    let updated_at = first_present([raw.updated_at, raw.updated_at_camel])
        .as_deref()
        .and_then(parse_timestamp);

    let description = first_present([raw.description, raw.summary]);
    let content = first_present([raw.content, raw.details, description.clone()])
        .unwrap_or_default();

    Ok(Project {
        record: ResourceRecord {
            id,
            title: first_present([raw.title]).unwrap_or_else(|| untitled("Project")),
            description: description.unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            category: first_present([raw.category]).unwrap_or_else(|| UNCATEGORIZED.to_string()),
            date_label,
            created_at,
        },
        content,
        image: ctx.optional_media_url(first_present([raw.image, raw.thumbnail])),
        author: first_present([raw.author]),
        tags: raw.tags.unwrap_or_default(),
        status: first_present([raw.status]),
        featured: raw.featured.unwrap_or(false),
        updated_at,
    })
}

pub fn blog_post(raw: RawBlogPost, ctx: &TransformContext) -> Result<BlogPost> {
    let id = require_id("blogs", raw.object_id, raw.id)?;
    let (date_label, created_at) =
        date_label(first_present([raw.created_at, raw.created_at_camel]).as_deref());

    let content = first_present([raw.content]).unwrap_or_default();
    let excerpt = derive_excerpt(first_present([raw.excerpt.clone()]), &content);
    let description = first_present([raw.description, raw.excerpt])
        .unwrap_or_else(|| NO_DESCRIPTION.to_string());

    Ok(BlogPost {
        record: ResourceRecord {
            id,
            title: first_present([raw.title]).unwrap_or_else(|| untitled("Blog Post")),
            description,
            category: first_present([raw.category]).unwrap_or_else(|| UNCATEGORIZED.to_string()),
            date_label,
            created_at,
        },
        content,
        author: first_present([raw.author]).unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
        excerpt,
        image: ctx.optional_media_url(first_present([raw.image])),
    })
}

pub fn team_member(raw: RawTeamMember, ctx: &TransformContext) -> Result<TeamMember> {
    let id = require_id("team", raw.object_id, raw.id)?;

    Ok(TeamMember {
        id,
        name: first_present([raw.name]).unwrap_or_else(|| UNNAMED_MEMBER.to_string()),
        position: first_present([raw.position, raw.role])
            .unwrap_or_else(|| DEFAULT_POSITION.to_string()),
        bio: first_present([raw.bio]),
        image: ctx.optional_media_url(first_present([raw.image, raw.image_url, raw.image_url_camel])),
        email: first_present([raw.email, raw.social.and_then(|s| s.email)]),
    })
}
