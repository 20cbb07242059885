//! # Resource Fetcher
//!
//! Fetch-with-fallback engine, instantiated once per resource kind.
//!
//! ## Overview
//!
//! A [`ResourceFetcher`] owns the [`FetchState`] for one kind and keeps it
//! current. A load either yields live records or substitutes the kind's
//! bundled fallback dataset; it never fails outward. The state is published
//! through a `tokio::sync::watch` channel so any number of observers can
//! follow it.
//!
//! ```text
//! load()
//!   ├─ switch off ───────────────────────────────┐
//!   ├─ GET <base><endpoint> (bounded by timeout) │
//!   │    ├─ error / timeout / non-2xx ───────────┤
//!   │    └─ body                                 │
//!   │         ├─ unknown envelope / empty ───────┤
//!   │         └─ records → transform each        ▼
//!   │              └─ live items            fallback items
//!   └─ is_loading = false
//! ```
//!
//! ## Stale results
//!
//! Every load takes a generation number. When a newer load has started by
//! the time an older one settles, the older result is discarded instead of
//! overwriting the newer state.

use crate::envelope::{resolve_single, Envelope};
use crate::error::{ContentError, FailureKind, Result};
use crate::grouping::{group_documents, DocumentGroup};
use crate::id::ResourceId;
use crate::kind::{Documents, ResourceKind, TrackedKind};
use crate::models::{ContentItem, Engageable};
use crate::transform::TransformContext;
use bridge_traits::time::Clock;
use chrono::{DateTime, Utc};
use core_runtime::events::{ContentEvent, CoreEvent, EventBus};
use core_runtime::ApiClient;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// Observable result of the latest fetch cycle for one kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchState<T> {
    pub items: Vec<T>,
    /// True only while a load is in flight
    pub is_loading: bool,
    /// Why live data could not be used; `None` in offline mode
    pub error_message: Option<String>,
    /// True iff `items` came from the fallback dataset
    pub is_using_fallback: bool,
    pub failure: Option<FailureKind>,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl<T> FetchState<T> {
    /// State before the first load: loading, no items.
    pub fn initial() -> Self {
        Self {
            items: Vec::new(),
            is_loading: true,
            error_message: None,
            is_using_fallback: false,
            failure: None,
            loaded_at: None,
        }
    }
}

impl<T: ContentItem> FetchState<T> {
    pub fn find(&self, id: &ResourceId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }
}

/// Result of a single-item lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailState<T> {
    pub item: Option<T>,
    pub error_message: Option<String>,
    pub is_using_fallback: bool,
}

pub struct ResourceFetcher<K: ResourceKind> {
    api: ApiClient,
    clock: Arc<dyn Clock>,
    events: Option<EventBus>,
    ctx: TransformContext,
    state: watch::Sender<FetchState<K::Item>>,
    generation: AtomicU64,
    mounted: AtomicBool,
    _kind: PhantomData<K>,
}

impl<K: ResourceKind> std::fmt::Debug for ResourceFetcher<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ResourceFetcher")
            .field("resource", &K::NAME)
            .field("items", &state.items.len())
            .field("is_loading", &state.is_loading)
            .field("is_using_fallback", &state.is_using_fallback)
            .finish()
    }
}

impl<K: ResourceKind> ResourceFetcher<K> {
    pub fn new(api: ApiClient, clock: Arc<dyn Clock>) -> Self {
        let ctx = TransformContext::from_config(api.config());
        let (state, _) = watch::channel(FetchState::initial());

        Self {
            api,
            clock,
            events: None,
            ctx,
            state,
            generation: AtomicU64::new(0),
            mounted: AtomicBool::new(false),
            _kind: PhantomData,
        }
    }

    /// Publishes load and engagement events on `events`.
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn resource(&self) -> &'static str {
        K::NAME
    }

    /// Current state.
    pub fn snapshot(&self) -> FetchState<K::Item> {
        self.state.borrow().clone()
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<FetchState<K::Item>> {
        self.state.subscribe()
    }

    /// Runs one fetch cycle and returns the state it produced.
    ///
    /// The returned state is also published unless a newer load started in
    /// the meantime.
    #[instrument(skip(self), fields(resource = K::NAME))]
    pub async fn load(&self) -> FetchState<K::Item> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|state| {
            state.is_loading = true;
            state.error_message = None;
        });
        self.emit(ContentEvent::LoadStarted {
            resource: K::NAME.to_string(),
        });

        let next = match self.fetch_items().await {
            Ok(items) => {
                info!(count = items.len(), "Loaded live content");
                FetchState {
                    items,
                    is_loading: false,
                    error_message: None,
                    is_using_fallback: false,
                    failure: None,
                    loaded_at: Some(self.clock.now()),
                }
            }
            Err(error) => {
                let error_message = if error.is_disabled() {
                    debug!("API disabled, serving fallback content");
                    None
                } else {
                    warn!(error = %error, "Serving fallback content");
                    Some(error.to_string())
                };

                FetchState {
                    items: K::fallback().to_vec(),
                    is_loading: false,
                    error_message,
                    is_using_fallback: true,
                    failure: Some(error.kind()),
                    loaded_at: Some(self.clock.now()),
                }
            }
        };

        if self.generation.load(Ordering::SeqCst) == generation {
            self.state.send_replace(next.clone());
            self.emit(ContentEvent::Loaded {
                resource: K::NAME.to_string(),
                count: next.items.len(),
                using_fallback: next.is_using_fallback,
                error: next.error_message.clone(),
            });
        } else {
            debug!(generation, "Newer load in flight, discarding result");
        }

        next
    }

    /// Re-runs the fetch cycle.
    pub async fn refresh(&self) -> FetchState<K::Item> {
        self.load().await
    }

    /// First-use entry point. Loads once; later calls return `false` without
    /// touching the network.
    pub async fn mount(&self) -> bool {
        if self.mounted.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.load().await;
        true
    }

    /// Fetches one record by id, falling back to the bundled dataset.
    #[instrument(skip(self, id), fields(resource = K::NAME, id = %id))]
    pub async fn load_one(&self, id: &ResourceId) -> DetailState<K::Item> {
        let detail = match self.fetch_one(id).await {
            Ok(item) => DetailState {
                item: Some(item),
                error_message: None,
                is_using_fallback: false,
            },
            Err(error) => {
                let item = K::fallback().iter().find(|item| item.id() == id).cloned();
                let error_message = match &item {
                    None => Some(format!("{} not found", K::LABEL)),
                    Some(_) if error.is_disabled() => None,
                    Some(_) => Some(error.to_string()),
                };
                if !error.is_disabled() {
                    warn!(error = %error, found = item.is_some(), "Looking up fallback record");
                }

                DetailState {
                    item,
                    error_message,
                    is_using_fallback: true,
                }
            }
        };

        self.emit(ContentEvent::DetailLoaded {
            resource: K::NAME.to_string(),
            id: id.to_string(),
            found: detail.item.is_some(),
            using_fallback: detail.is_using_fallback,
        });
        detail
    }

    async fn fetch_items(&self) -> Result<Vec<K::Item>> {
        let body = self.api.get_json(self.endpoint()).await?;
        let records = Envelope::resolve(body, K::ENVELOPE_KEYS, K::NAME)?.into_items();
        if records.is_empty() {
            return Err(ContentError::Empty { resource: K::NAME });
        }

        let total = records.len();
        let items: Vec<K::Item> = records
            .into_iter()
            .filter_map(|record| match self.decode(record) {
                Ok(item) => Some(item),
                Err(error) => {
                    warn!(error = %error, "Dropping record");
                    None
                }
            })
            .collect();

        if items.is_empty() {
            return Err(ContentError::NoValidRecords { resource: K::NAME });
        }
        if items.len() < total {
            debug!(kept = items.len(), total, "Some records were dropped");
        }
        Ok(items)
    }

    /// Turns a single-record response body (bare, keyed or under `data`)
    /// into a view model.
    pub fn parse_record(&self, body: Value) -> Result<K::Item> {
        let record = resolve_single(body, K::SINGULAR_KEYS, K::NAME)?;
        self.decode(record)
    }

    async fn fetch_one(&self, id: &ResourceId) -> Result<K::Item> {
        let path = format!("{}/{}", self.endpoint().trim_end_matches('/'), id);
        let body = self.api.get_json(&path).await?;
        self.parse_record(body)
    }

    fn decode(&self, record: Value) -> Result<K::Item> {
        let raw: K::Raw =
            serde_json::from_value(record).map_err(|e| ContentError::InvalidRecord {
                resource: K::NAME,
                message: e.to_string(),
            })?;
        K::transform(raw, &self.ctx)
    }

    fn endpoint(&self) -> &str {
        K::endpoint(&self.api.config().endpoints)
    }

    fn emit(&self, event: ContentEvent) {
        if let Some(events) = &self.events {
            events.emit(CoreEvent::Content(event)).ok();
        }
    }
}

impl<K> ResourceFetcher<K>
where
    K: TrackedKind,
    K::Item: Engageable,
{
    /// Counts a view or download.
    ///
    /// Sends a best-effort tracking request when live data is shown and the
    /// API is enabled, then increments the local counter by one whatever the
    /// request's outcome. Returns `false` when no record has this id.
    #[instrument(skip(self, id), fields(resource = K::NAME, id = %id, action = K::ACTION))]
    pub async fn record_engagement(&self, id: &ResourceId) -> bool {
        let using_fallback = {
            let state = self.state.borrow();
            if state.find(id).is_none() {
                debug!("No record with this id");
                return false;
            }
            state.is_using_fallback
        };

        let mut tracked = false;
        if !using_fallback && self.api.is_enabled() {
            let path = format!(
                "{}/{}/{}",
                self.endpoint().trim_end_matches('/'),
                id,
                K::ACTION
            );
            match self.api.post_empty(&path).await {
                Ok(_) => tracked = true,
                Err(error) => warn!(error = %error, "Tracking request failed"),
            }
        }

        let mut matched = false;
        self.state.send_if_modified(|state| {
            match state.items.iter_mut().find(|item| item.id() == id) {
                Some(item) => {
                    let count = item.engagement_mut();
                    *count = count.saturating_add(1);
                    matched = true;
                    true
                }
                None => false,
            }
        });

        if matched {
            self.emit(ContentEvent::EngagementRecorded {
                resource: K::NAME.to_string(),
                id: id.to_string(),
                action: K::ACTION.to_string(),
                tracked,
            });
        }
        matched
    }
}

impl ResourceFetcher<Documents> {
    /// Current documents bucketed by category.
    pub fn groups(&self) -> Vec<DocumentGroup> {
        group_documents(&self.state.borrow().items)
    }
}
