//! # Event Bus System
//!
//! Broadcasts state changes of the site core using `tokio::sync::broadcast`,
//! so a host UI (or a log shipper) can react without polling every fetcher.
//!
//! ## Overview
//!
//! - **Event Types**: [`CoreEvent`] wraps one enum per domain
//! - **EventBus**: Central broadcast channel for publishing events
//! - **EventStream**: Wrapper for consuming events with filtering
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     emit      ┌───────────┐
//! │ Auth session ├──────────────>│           │
//! └──────────────┘               │           │     subscribe    ┌────────────┐
//!                                │ EventBus  ├─────────────────>│ Subscriber │
//! ┌──────────────┐     emit      │ (broadcast│                  └────────────┘
//! │  Fetchers    ├──────────────>│  channel) │
//! └──────────────┘               │           │     subscribe    ┌────────────┐
//! ┌──────────────┐     emit      │           ├─────────────────>│ Subscriber │
//! │ Submissions  ├──────────────>│           │                  └────────────┘
//! └──────────────┘               └───────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{ContentEvent, CoreEvent, EventBus};
//!
//! let event_bus = EventBus::new(100);
//! let mut subscriber = event_bus.subscribe();
//!
//! event_bus
//!     .emit(CoreEvent::Content(ContentEvent::LoadStarted {
//!         resource: "videos".to_string(),
//!     }))
//!     .ok();
//!
//! assert!(subscriber.try_recv().is_ok());
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: the subscriber fell behind and missed `n`
//!   events. Non-fatal; keep receiving.
//! - **`RecvError::Closed`**: every sender was dropped. Treat it as shutdown.
//!
//! Emitting with no subscribers returns an error; publishers in this
//! workspace ignore it with `.ok()`.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event published through the bus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    Auth(AuthEvent),
    Content(ContentEvent),
    Submission(SubmissionEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Auth(e) => e.description(),
            CoreEvent::Content(e) => e.description(),
            CoreEvent::Submission(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Auth(AuthEvent::AuthError { .. }) => EventSeverity::Error,
            CoreEvent::Submission(SubmissionEvent::Failed { .. }) => EventSeverity::Error,
            CoreEvent::Content(ContentEvent::Loaded {
                using_fallback: true,
                error: Some(_),
                ..
            }) => EventSeverity::Warning,
            CoreEvent::Auth(AuthEvent::SignedIn { .. }) => EventSeverity::Info,
            CoreEvent::Content(ContentEvent::Loaded { .. }) => EventSeverity::Info,
            CoreEvent::Content(ContentEvent::Changed { .. }) => EventSeverity::Info,
            CoreEvent::Submission(SubmissionEvent::Sent { .. }) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Authentication Events
// ============================================================================

/// Events emitted by the admin session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum AuthEvent {
    /// Login request in flight.
    SigningIn { email: String },
    SignedIn {
        user_id: String,
        role: String,
        /// `true` when the offline demo login was used
        demo: bool,
    },
    SignedOut { user_id: Option<String> },
    AuthError {
        message: String,
        /// Whether trying again could succeed (network trouble vs. bad credentials)
        recoverable: bool,
    },
}

impl AuthEvent {
    fn description(&self) -> &str {
        match self {
            AuthEvent::SigningIn { .. } => "Authentication in progress",
            AuthEvent::SignedIn { .. } => "User signed in successfully",
            AuthEvent::SignedOut { .. } => "User signed out",
            AuthEvent::AuthError { .. } => "Authentication error",
        }
    }
}

// ============================================================================
// Content Events
// ============================================================================

/// Events emitted by resource fetchers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum ContentEvent {
    /// A collection load began.
    LoadStarted { resource: String },
    /// A collection load settled, live or fallback.
    Loaded {
        resource: String,
        count: usize,
        using_fallback: bool,
        /// Failure that caused the fallback, if any
        error: Option<String>,
    },
    /// A single-item lookup settled.
    DetailLoaded {
        resource: String,
        id: String,
        found: bool,
        using_fallback: bool,
    },
    /// A view or download was counted locally.
    EngagementRecorded {
        resource: String,
        id: String,
        action: String,
        /// Whether the tracking request reached the backend
        tracked: bool,
    },
    /// An admin created, updated or deleted a record.
    Changed {
        resource: String,
        /// Absent when the backend did not echo the created record
        id: Option<String>,
        change: ContentChange,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentChange {
    Created,
    Updated,
    Deleted,
}

impl ContentEvent {
    fn description(&self) -> &str {
        match self {
            ContentEvent::LoadStarted { .. } => "Content load started",
            ContentEvent::Loaded {
                using_fallback: false,
                ..
            } => "Content loaded from API",
            ContentEvent::Loaded { .. } => "Content served from fallback data",
            ContentEvent::DetailLoaded { .. } => "Content item loaded",
            ContentEvent::EngagementRecorded { .. } => "Engagement recorded",
            ContentEvent::Changed { .. } => "Content changed",
        }
    }
}

// ============================================================================
// Submission Events
// ============================================================================

/// Events emitted when visitors submit forms.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum SubmissionEvent {
    Sent { form: String },
    Failed { form: String, message: String },
}

impl SubmissionEvent {
    fn description(&self) -> &str {
        match self {
            SubmissionEvent::Sent { .. } => "Form submitted",
            SubmissionEvent::Failed { .. } => "Form submission failed",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central broadcast channel for [`CoreEvent`]s.
///
/// Cloning is cheap; every clone publishes into the same channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus.
    ///
    /// `capacity` is the number of events buffered per subscriber before it
    /// starts receiving `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers reached, or an error when there are none.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a receiver for all future events. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A `broadcast::Receiver` with an optional predicate.
///
/// ```rust
/// use core_runtime::events::{CoreEvent, EventBus, EventStream};
///
/// let event_bus = EventBus::new(100);
/// let content_only = EventStream::new(event_bus.subscribe())
///     .filter(|event| matches!(event, CoreEvent::Content(_)));
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` will be returned by `recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, event: &CoreEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next event that passes the filter.
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n` events.
    /// Returns `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive an event without waiting.
    ///
    /// Returns `None` if no matching event is currently queued.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(resource: &str, count: usize, using_fallback: bool) -> CoreEvent {
        CoreEvent::Content(ContentEvent::Loaded {
            resource: resource.to_string(),
            count,
            using_fallback,
            error: using_fallback.then(|| "HTTP 500: Internal Server Error".to_string()),
        })
    }

    #[tokio::test]
    async fn test_event_bus_subscription() {
        let bus = EventBus::new(10);
        assert_eq!(bus.subscriber_count(), 0);

        let _sub1 = bus.subscribe();
        let _sub2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[tokio::test]
    async fn test_event_emission_no_subscribers() {
        let bus = EventBus::new(10);
        let event = CoreEvent::Auth(AuthEvent::SignedOut { user_id: None });

        assert!(bus.emit(event).is_err());
    }

    #[tokio::test]
    async fn test_multiple_subscribers_receive_same_event() {
        let bus = EventBus::new(10);
        let mut sub1 = bus.subscribe();
        let mut sub2 = bus.subscribe();

        let event = loaded("videos", 10, false);
        assert_eq!(bus.emit(event.clone()).unwrap(), 2);

        assert_eq!(sub1.recv().await.unwrap(), event);
        assert_eq!(sub2.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_event_stream_with_filter() {
        let bus = EventBus::new(10);
        let mut stream =
            EventStream::new(bus.subscribe()).filter(|event| matches!(event, CoreEvent::Auth(_)));

        bus.emit(loaded("projects", 6, true)).ok();

        let auth_event = CoreEvent::Auth(AuthEvent::SignedIn {
            user_id: "1".to_string(),
            role: "admin".to_string(),
            demo: false,
        });
        bus.emit(auth_event.clone()).ok();

        assert_eq!(stream.recv().await.unwrap(), auth_event);
    }

    #[tokio::test]
    async fn test_lagged_subscriber() {
        let bus = EventBus::new(2);
        let mut sub = bus.subscribe();

        for i in 0..5 {
            bus.emit(loaded("team", i, false)).ok();
        }

        let result = sub.recv().await;
        assert!(matches!(result, Err(RecvError::Lagged(_))));
    }

    #[test]
    fn test_event_severity() {
        let error_event = CoreEvent::Auth(AuthEvent::AuthError {
            message: "Invalid credentials".to_string(),
            recoverable: false,
        });
        assert_eq!(error_event.severity(), EventSeverity::Error);

        assert_eq!(loaded("videos", 10, true).severity(), EventSeverity::Warning);
        assert_eq!(loaded("videos", 10, false).severity(), EventSeverity::Info);

        let started = CoreEvent::Content(ContentEvent::LoadStarted {
            resource: "videos".to_string(),
        });
        assert_eq!(started.severity(), EventSeverity::Debug);

        let changed = CoreEvent::Content(ContentEvent::Changed {
            resource: "blogs".to_string(),
            id: Some("b1".to_string()),
            change: ContentChange::Deleted,
        });
        assert_eq!(changed.severity(), EventSeverity::Info);
        assert_eq!(changed.description(), "Content changed");
        assert_eq!(serde_json::to_value(&changed).unwrap()["payload"]["change"], "deleted");
    }

    #[test]
    fn test_event_description() {
        assert_eq!(loaded("blogs", 2, false).description(), "Content loaded from API");
        assert_eq!(
            loaded("blogs", 2, true).description(),
            "Content served from fallback data"
        );
    }

    #[tokio::test]
    async fn test_concurrent_publishers() {
        let bus = EventBus::new(100);
        let mut sub = bus.subscribe();

        let bus1 = bus.clone();
        let bus2 = bus.clone();

        let handle1 = tokio::spawn(async move {
            for i in 0..10 {
                bus1.emit(loaded("videos", i, false)).ok();
            }
        });

        let handle2 = tokio::spawn(async move {
            for i in 0..10 {
                bus2.emit(CoreEvent::Content(ContentEvent::EngagementRecorded {
                    resource: "documents".to_string(),
                    id: i.to_string(),
                    action: "download".to_string(),
                    tracked: false,
                }))
                .ok();
            }
        });

        handle1.await.ok();
        handle2.await.ok();

        let mut count = 0;
        while sub.try_recv().is_ok() {
            count += 1;
        }
        assert_eq!(count, 20);
    }

    #[test]
    fn test_event_serialization() {
        let event = loaded("documents", 5, true);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Content");
        assert_eq!(json["payload"]["event"], "Loaded");
        assert_eq!(json["payload"]["resource"], "documents");

        let deserialized: CoreEvent = serde_json::from_value(json).unwrap();
        assert_eq!(deserialized, event);
    }

    #[tokio::test]
    async fn test_try_recv() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe());
        assert!(stream.try_recv().is_none());

        let event = CoreEvent::Submission(SubmissionEvent::Sent {
            form: "contact".to_string(),
        });
        bus.emit(event.clone()).ok();

        assert_eq!(stream.try_recv().unwrap().unwrap(), event);
    }
}
