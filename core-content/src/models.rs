//! View models
//!
//! Canonical shapes handed to the presentation layer, independent of how the
//! backend happens to spell its fields. Serialized in camelCase.

use crate::id::ResourceId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A record the fetcher can hold and look up by id.
pub trait ContentItem: Clone + Debug + Send + Sync + Serialize + 'static {
    fn id(&self) -> &ResourceId;
}

/// A record with a view or download counter.
pub trait Engageable: ContentItem {
    fn engagement_count(&self) -> u64;
    fn engagement_mut(&mut self) -> &mut u64;
}

/// Fields shared by every titled content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    pub id: ResourceId,
    pub title: String,
    pub description: String,
    pub category: String,
    /// Display date, e.g. `"March 15, 2023"`
    pub date_label: String,
    /// Parsed source timestamp, when the source had a parseable one
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    #[serde(flatten)]
    pub record: ResourceRecord,
    pub thumbnail: String,
    pub video_url: String,
    pub duration: String,
    pub views: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(flatten)]
    pub record: ResourceRecord,
    /// File format label, e.g. `"PDF"`
    #[serde(rename = "type")]
    pub file_type: String,
    pub size: String,
    pub thumbnail: String,
    pub downloads: u64,
    pub file_url: String,
    pub preview_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(flatten)]
    pub record: ResourceRecord,
    /// Long-form body
    pub content: String,
    pub image: Option<String>,
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub status: Option<String>,
    pub featured: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    #[serde(flatten)]
    pub record: ResourceRecord,
    pub content: String,
    pub author: String,
    pub excerpt: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: ResourceId,
    pub name: String,
    pub position: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub email: Option<String>,
}

macro_rules! impl_content_item {
    ($($ty:ty),*) => {
        $(
            impl ContentItem for $ty {
                fn id(&self) -> &ResourceId {
                    &self.record.id
                }
            }
        )*
    };
}

impl_content_item!(Video, Document, Project, BlogPost);

impl ContentItem for TeamMember {
    fn id(&self) -> &ResourceId {
        &self.id
    }
}

impl Engageable for Video {
    fn engagement_count(&self) -> u64 {
        self.views
    }

    fn engagement_mut(&mut self) -> &mut u64 {
        &mut self.views
    }
}

impl Engageable for Document {
    fn engagement_count(&self) -> u64 {
        self.downloads
    }

    fn engagement_mut(&mut self) -> &mut u64 {
        &mut self.downloads
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video() -> Video {
        Video {
            record: ResourceRecord {
                id: ResourceId::from(7),
                title: "Sign Language Basics".to_string(),
                description: "No description available".to_string(),
                category: "education".to_string(),
                date_label: "March 15, 2023".to_string(),
                created_at: None,
            },
            thumbnail: "https://api.example.org/api/x.jpg".to_string(),
            video_url: "https://api.example.org/api/v.mp4".to_string(),
            duration: "00:00".to_string(),
            views: 3,
        }
    }

    #[test]
    fn test_video_serializes_flat_camel_case() {
        let json = serde_json::to_value(video()).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["title"], "Sign Language Basics");
        assert_eq!(json["dateLabel"], "March 15, 2023");
        assert_eq!(json["videoUrl"], "https://api.example.org/api/v.mp4");
        assert!(json.get("record").is_none());
    }

    #[test]
    fn test_engagement_counter() {
        let mut item = video();
        *item.engagement_mut() += 1;
        assert_eq!(item.engagement_count(), 4);
        assert_eq!(item.id(), &ResourceId::from(7));
    }
}
