//! Core service façade and bootstrap helpers.
//!
//! This crate wires a [`SiteConfig`] (API settings, host HTTP client, clock)
//! into the shared site core: one [`ResourceFetcher`] per content type, the
//! admin [`SessionContext`], blog authoring, form submissions and the event
//! bus. Desktop hosts enable the `desktop-shims` feature to get a `reqwest`
//! client injected automatically.
//!
//! ```ignore
//! use core_service::SiteService;
//!
//! let site = SiteService::from_env()?;
//! site.mount_all().await;
//! for video in site.videos().snapshot().items {
//!     println!("{} ({} views)", video.record.title, video.views);
//! }
//! ```

pub mod authoring;
pub mod error;
pub mod submissions;

pub use authoring::{BlogAdmin, BlogDraft, BlogUpdate};
pub use error::{CoreError, Result};
pub use submissions::{ContactMessage, SubmissionService, Suggestion};

pub use core_auth::{AdminUser, AuthError, Credentials, Session, SessionContext};
pub use core_content::{
    BlogPost, DetailState, Document, DocumentGroup, FetchState, Project, ResourceFetcher,
    ResourceId, TeamMember, Video,
};
pub use core_runtime::config::{ApiConfig, SiteConfig};
pub use core_runtime::events::{CoreEvent, EventBus};

use core_content::{Blogs, Documents, Projects, ResourceKind, Team, Videos};
use core_runtime::ApiClient;
use std::sync::Arc;
use tracing::info;

/// Primary façade exposed to host applications.
///
/// Cloning is cheap; clones share fetchers, session and event bus.
#[derive(Clone)]
pub struct SiteService {
    config: Arc<SiteConfig>,
    event_bus: EventBus,
    session: SessionContext,
    projects: Arc<ResourceFetcher<Projects>>,
    blogs: Arc<ResourceFetcher<Blogs>>,
    team: Arc<ResourceFetcher<Team>>,
    videos: Arc<ResourceFetcher<Videos>>,
    documents: Arc<ResourceFetcher<Documents>>,
    submissions: SubmissionService,
    blog_admin: BlogAdmin,
}

impl SiteService {
    /// Validates `config` and builds every fetcher.
    ///
    /// Content and submission requests carry the admin bearer token while a
    /// session is active; login requests never do.
    pub fn new(config: SiteConfig) -> Result<Self> {
        config.validate()?;

        let event_bus = EventBus::new(config.event_buffer_size);
        let anonymous = ApiClient::from_site_config(&config);
        let session = SessionContext::new(
            anonymous.clone(),
            Arc::clone(&config.clock),
            event_bus.clone(),
        )
        .with_demo_credentials(config.demo_credentials.clone());
        let api = anonymous.with_token_source(Arc::new(session.clone()));

        info!(
            base_url = %config.api.base_url,
            use_api = config.api.use_api,
            "Site core initialized"
        );

        let blogs = fetcher(&api, &config, &event_bus);
        let blog_admin = BlogAdmin::new(
            api.clone(),
            session.clone(),
            Arc::clone(&blogs),
            event_bus.clone(),
        );

        Ok(Self {
            projects: fetcher(&api, &config, &event_bus),
            blogs,
            team: fetcher(&api, &config, &event_bus),
            videos: fetcher(&api, &config, &event_bus),
            documents: fetcher(&api, &config, &event_bus),
            submissions: SubmissionService::new(api, event_bus.clone()),
            blog_admin,
            config: Arc::new(config),
            event_bus,
            session,
        })
    }

    /// Builds from `SITE_*` environment variables with the default HTTP
    /// client.
    #[cfg(feature = "desktop-shims")]
    pub fn from_env() -> Result<Self> {
        let api = ApiConfig::from_env()?;
        Self::new(SiteConfig::builder().api(api).build()?)
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn events(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn projects(&self) -> &ResourceFetcher<Projects> {
        &self.projects
    }

    pub fn blogs(&self) -> &ResourceFetcher<Blogs> {
        &self.blogs
    }

    pub fn team(&self) -> &ResourceFetcher<Team> {
        &self.team
    }

    pub fn videos(&self) -> &ResourceFetcher<Videos> {
        &self.videos
    }

    pub fn documents(&self) -> &ResourceFetcher<Documents> {
        &self.documents
    }

    /// Current documents grouped for the resources page.
    pub fn document_groups(&self) -> Vec<DocumentGroup> {
        self.documents.groups()
    }

    pub fn submissions(&self) -> &SubmissionService {
        &self.submissions
    }

    /// Blog writes for the signed-in admin.
    pub fn blog_admin(&self) -> &BlogAdmin {
        &self.blog_admin
    }

    /// Mounts every fetcher concurrently; already-mounted ones are skipped.
    pub async fn mount_all(&self) {
        futures::join!(
            self.projects.mount(),
            self.blogs.mount(),
            self.team.mount(),
            self.videos.mount(),
            self.documents.mount(),
        );
    }

    /// Reloads every content type concurrently.
    pub async fn refresh_all(&self) {
        futures::join!(
            self.projects.refresh(),
            self.blogs.refresh(),
            self.team.refresh(),
            self.videos.refresh(),
            self.documents.refresh(),
        );
    }

    /// Signs in through the backend, or offline when demo credentials are
    /// configured and the API is switched off.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let session = if !self.config.api.use_api && self.config.demo_credentials.is_some() {
            self.session.demo_login(credentials).await?
        } else {
            self.session.login(credentials).await?
        };
        Ok(session)
    }

    pub async fn logout(&self) {
        self.session.logout().await;
    }
}

impl std::fmt::Debug for SiteService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteService")
            .field("config", &self.config)
            .field("session", &self.session)
            .finish()
    }
}

fn fetcher<K: ResourceKind>(
    api: &ApiClient,
    config: &SiteConfig,
    event_bus: &EventBus,
) -> Arc<ResourceFetcher<K>> {
    Arc::new(
        ResourceFetcher::new(api.clone(), Arc::clone(&config.clock)).with_events(event_bus.clone()),
    )
}
