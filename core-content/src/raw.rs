//! Wire types
//!
//! Records as the backend sends them. Endpoints disagree on casing
//! (`created_at` vs `createdAt`, `file_url` vs `fileUrl`), so both spellings
//! are captured in separate fields and reconciled by the transformer.
//!
//! Scalar fields are decoded leniently: a counter may arrive as `12`, `"12"`
//! or `null`, and a title may be `null`. Only a malformed identifier makes a
//! record undecodable.

use crate::id::ResourceId;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// String-like scalar, or `None` for null and non-scalar values.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// Non-negative count from a number or numeric string.
pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

pub(crate) fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => Some(b),
        Value::String(s) => match s.trim() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

/// Tags as an array of strings or a comma-separated string.
pub(crate) fn lenient_tags<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags: Vec<String> = match Value::deserialize(deserializer)? {
        Value::Array(values) => values
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Value::String(s) => s.split(',').map(str::to_string).collect(),
        _ => return Ok(None),
    };

    Ok(Some(
        tags.into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
    ))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVideo {
    pub id: Option<ResourceId>,
    #[serde(rename = "_id")]
    pub object_id: Option<ResourceId>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
    #[serde(default, rename = "video_url", deserialize_with = "lenient_string")]
    pub video_url_snake: Option<String>,
    #[serde(default, rename = "videoUrl", deserialize_with = "lenient_string")]
    pub video_url_camel: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub thumbnail_url: Option<String>,
    #[serde(default, rename = "thumbnailUrl", deserialize_with = "lenient_string")]
    pub thumbnail_url_camel: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: Option<String>,
    #[serde(default, rename = "createdAt", deserialize_with = "lenient_string")]
    pub created_at_camel: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub views: Option<u64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDocument {
    pub id: Option<ResourceId>,
    #[serde(rename = "_id")]
    pub object_id: Option<ResourceId>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub file_url: Option<String>,
    #[serde(default, rename = "fileUrl", deserialize_with = "lenient_string")]
    pub file_url_camel: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub preview_url: Option<String>,
    #[serde(default, rename = "previewUrl", deserialize_with = "lenient_string")]
    pub preview_url_camel: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub thumbnail_url: Option<String>,
    #[serde(default, rename = "thumbnailUrl", deserialize_with = "lenient_string")]
    pub thumbnail_url_camel: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub file_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub size: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: Option<String>,
    #[serde(default, rename = "createdAt", deserialize_with = "lenient_string")]
    pub created_at_camel: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub downloads: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProject {
    /// Database id; preferred over `id` when both are present
    #[serde(rename = "_id")]
    pub object_id: Option<ResourceId>,
    pub id: Option<ResourceId>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub details: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
    /// Free-form date such as `"2024"`
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub featured: Option<bool>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: Option<String>,
    #[serde(default, rename = "createdAt", deserialize_with = "lenient_string")]
    pub created_at_camel: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub updated_at: Option<String>,
    #[serde(default, rename = "updatedAt", deserialize_with = "lenient_string")]
    pub updated_at_camel: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBlogPost {
    #[serde(rename = "_id")]
    pub object_id: Option<ResourceId>,
    pub id: Option<ResourceId>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub excerpt: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: Option<String>,
    #[serde(default, rename = "createdAt", deserialize_with = "lenient_string")]
    pub created_at_camel: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSocial {
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTeamMember {
    #[serde(rename = "_id")]
    pub object_id: Option<ResourceId>,
    pub id: Option<ResourceId>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub position: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image_url: Option<String>,
    #[serde(default, rename = "imageUrl", deserialize_with = "lenient_string")]
    pub image_url_camel: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default)]
    pub social: Option<RawSocial>,
}
