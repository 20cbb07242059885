//! Blog authoring for signed-in admins
//!
//! Writes go straight to the backend; there is no offline queue and no
//! fallback. After a successful write the shared blog fetcher is refreshed so
//! every observer sees the new list.

use crate::error::{CoreError, Result};
use crate::submissions::check_accepted;
use core_auth::{AdminUser, SessionContext};
use core_content::transform::derive_excerpt;
use core_content::{BlogPost, Blogs, ResourceFetcher, ResourceId};
use core_runtime::events::{ContentChange, ContentEvent, CoreEvent, EventBus};
use core_runtime::ApiClient;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// A new blog post as entered in the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogDraft {
    pub title: String,
    pub content: String,
    /// Derived from `content` when blank
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// Defaults to the signed-in admin's display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub published: bool,
}

impl BlogDraft {
    /// A published draft with the three required fields.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            excerpt: None,
            author: None,
            category: category.into(),
            tags: Vec::new(),
            image: None,
            published: true,
        }
    }

    /// Validated request body for `user`.
    fn prepare(&self, user: &AdminUser) -> Result<Self> {
        require("title", &self.title)?;
        require("content", &self.content)?;
        require("category", &self.category)?;

        Ok(Self {
            title: self.title.trim().to_string(),
            content: self.content.clone(),
            excerpt: Some(derive_excerpt(non_blank(&self.excerpt), &self.content)),
            author: Some(
                non_blank(&self.author).unwrap_or_else(|| user.display_name().to_string()),
            ),
            category: self.category.trim().to_string(),
            tags: clean_tags(&self.tags),
            image: non_blank(&self.image),
            published: self.published,
        })
    }
}

/// Partial update; only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

impl BlogUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn prepare(&self) -> Result<Self> {
        if self.is_empty() {
            return Err(CoreError::Validation("no changes to save".to_string()));
        }
        for (field, value) in [
            ("title", &self.title),
            ("content", &self.content),
            ("category", &self.category),
        ] {
            if let Some(value) = value {
                require(field, value)?;
            }
        }

        let mut update = self.clone();
        update.tags = self.tags.as_deref().map(clean_tags);
        Ok(update)
    }
}

/// Create, update and delete blog posts as the signed-in admin.
#[derive(Debug, Clone)]
pub struct BlogAdmin {
    api: ApiClient,
    session: SessionContext,
    blogs: Arc<ResourceFetcher<Blogs>>,
    event_bus: EventBus,
}

impl BlogAdmin {
    /// `api` must carry `session` as its token source.
    pub fn new(
        api: ApiClient,
        session: SessionContext,
        blogs: Arc<ResourceFetcher<Blogs>>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            api,
            session,
            blogs,
            event_bus,
        }
    }

    /// `POST /blog`
    ///
    /// Returns the created post when the backend echoes it back.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create(&self, draft: &BlogDraft) -> Result<Option<BlogPost>> {
        let user = self.session.require_user().await?;
        let body = draft.prepare(&user)?;

        let path = self.api.config().endpoints.blogs.clone();
        let response = self.write(self.api.post_json(&path, &body).await)?;

        let post = match self.blogs.parse_record(response) {
            Ok(post) => Some(post),
            Err(error) => {
                debug!(error = %error, "Created post not echoed back");
                None
            }
        };
        info!(author = %user.id, "Blog post created");
        self.changed(
            post.as_ref().map(|post| post.record.id.to_string()),
            ContentChange::Created,
        )
        .await;
        Ok(post)
    }

    /// `PUT /blog/<id>`
    #[instrument(skip(self, id, changes), fields(id = %id))]
    pub async fn update(&self, id: &ResourceId, changes: &BlogUpdate) -> Result<Option<BlogPost>> {
        self.session.require_user().await?;
        let body = changes.prepare()?;

        let response = self.write(self.api.put_json(&self.record_path(id), &body).await)?;
        let post = self.blogs.parse_record(response).ok();

        info!("Blog post updated");
        self.changed(Some(id.to_string()), ContentChange::Updated)
            .await;
        Ok(post)
    }

    /// `DELETE /blog/<id>`
    #[instrument(skip(self, id), fields(id = %id))]
    pub async fn delete(&self, id: &ResourceId) -> Result<()> {
        self.session.require_user().await?;

        self.write(self.api.delete(&self.record_path(id)).await)?;

        info!("Blog post deleted");
        self.changed(Some(id.to_string()), ContentChange::Deleted)
            .await;
        Ok(())
    }

    fn record_path(&self, id: &ResourceId) -> String {
        format!(
            "{}/{}",
            self.api.config().endpoints.blogs.trim_end_matches('/'),
            id
        )
    }

    fn write(&self, result: std::result::Result<Value, core_runtime::ApiError>) -> Result<Value> {
        let body = result.and_then(|body| check_accepted(&body).map(|()| body));
        body.map_err(|error| {
            warn!(error = %error, "Blog write failed");
            CoreError::Api(error)
        })
    }

    async fn changed(&self, id: Option<String>, change: ContentChange) {
        let _ = self
            .event_bus
            .emit(CoreEvent::Content(ContentEvent::Changed {
                resource: "blogs".to_string(),
                id,
                change,
            }));
        self.blogs.refresh().await;
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn clean_tags(tags: &[String]) -> Vec<String> {
    tags.iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
