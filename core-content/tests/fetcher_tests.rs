//! Fetch cycle tests against a mocked HTTP client.

use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{BridgeError, FixedClock, HttpClient, HttpMethod, HttpRequest, HttpResponse};
use chrono::{TimeZone, Utc};
use core_content::fallback;
use core_content::{
    Documents, FailureKind, Projects, ResourceFetcher, ResourceId, ResourceKind, Team, Videos,
};
use core_runtime::events::{ContentEvent, CoreEvent, EventBus};
use core_runtime::{ApiClient, ApiConfig};
use mockall::mock;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

const BASE: &str = "https://api.example.org/api";

mock! {
    HttpClient {}

    #[async_trait]
    impl HttpClient for HttpClient {
        async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
    }
}

/// Answers requests in order, each after its own delay.
struct ScriptedClient {
    replies: Mutex<VecDeque<(Duration, HttpResponse)>>,
}

impl ScriptedClient {
    fn new(replies: Vec<(Duration, HttpResponse)>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
        }
    }
}

#[async_trait]
impl HttpClient for ScriptedClient {
    async fn execute(&self, _request: HttpRequest) -> BridgeResult<HttpResponse> {
        let reply = self.replies.lock().await.pop_front();
        match reply {
            Some((delay, response)) => {
                tokio::time::sleep(delay).await;
                Ok(response)
            }
            None => Err(BridgeError::OperationFailed("no scripted reply".to_string())),
        }
    }
}

fn api_config(use_api: bool) -> ApiConfig {
    ApiConfig {
        base_url: BASE.to_string(),
        use_api,
        ..ApiConfig::default()
    }
}

fn fetcher<K: ResourceKind>(use_api: bool, http: impl HttpClient + 'static) -> ResourceFetcher<K> {
    let clock = FixedClock(Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap());
    ResourceFetcher::new(ApiClient::new(api_config(use_api), Arc::new(http)), Arc::new(clock))
}

fn json_response(status: u16, body: serde_json::Value) -> HttpResponse {
    HttpResponse::new(status, body.to_string())
}

fn is_get(request: &HttpRequest) -> bool {
    request.method == HttpMethod::Get
}

#[tokio::test]
async fn test_load_always_settles() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .returning(|_| Err(BridgeError::ConnectionFailed("refused".to_string())));
    let fetcher = fetcher::<Team>(true, http);

    let state = fetcher.load().await;
    assert!(!state.is_loading);
    assert!(!fetcher.snapshot().is_loading);
    assert_eq!(state.failure, Some(FailureKind::Transport));
}

#[tokio::test]
async fn test_disabled_switch_never_touches_network() {
    let mut http = MockHttpClient::new();
    http.expect_execute().times(0);
    let fetcher = fetcher::<Projects>(false, http);

    let state = fetcher.load().await;
    assert!(state.is_using_fallback);
    assert_eq!(state.error_message, None);
    assert_eq!(state.failure, Some(FailureKind::Disabled));
    assert_eq!(state.items, fallback::PROJECTS.as_slice());

    let state = fetcher.refresh().await;
    assert!(state.is_using_fallback);
}

#[tokio::test]
async fn test_server_error_serves_fallback_dataset() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .times(1)
        .returning(|_| Ok(json_response(500, json!({ "message": "Database unavailable" }))));
    let fetcher = fetcher::<Videos>(true, http);

    let state = fetcher.load().await;
    assert!(state.is_using_fallback);
    assert_eq!(state.items, fallback::VIDEOS.as_slice());
    assert_eq!(state.error_message.as_deref(), Some("Database unavailable"));
    assert_eq!(state.failure, Some(FailureKind::Http));
}

#[tokio::test]
async fn test_status_line_used_without_body_message() {
    let mut http = MockHttpClient::new();
    http.expect_execute().returning(|_| {
        let mut response = HttpResponse::new(503, "");
        response.status_text = Some("Service Unavailable".to_string());
        Ok(response)
    });
    let fetcher = fetcher::<Projects>(true, http);

    let state = fetcher.load().await;
    assert_eq!(
        state.error_message.as_deref(),
        Some("HTTP 503: Service Unavailable")
    );
}

#[tokio::test]
async fn test_empty_success_is_shape_failure() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .returning(|_| Ok(json_response(200, json!({ "success": true, "data": [] }))));
    let fetcher = fetcher::<Documents>(true, http);

    let state = fetcher.load().await;
    assert!(state.is_using_fallback);
    assert_eq!(state.items, fallback::DOCUMENTS.as_slice());
    assert_eq!(state.failure, Some(FailureKind::Shape));
    assert_eq!(
        state.error_message.as_deref(),
        Some("No documents found in API response")
    );
}

#[tokio::test]
async fn test_unrecognized_envelope_is_shape_failure() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .returning(|_| Ok(json_response(200, json!({ "videos": [{ "id": 1 }] }))));
    let fetcher = fetcher::<Documents>(true, http);

    let state = fetcher.load().await;
    assert!(state.is_using_fallback);
    assert_eq!(
        state.error_message.as_deref(),
        Some("Unexpected response format from documents endpoint")
    );
}

#[tokio::test]
async fn test_live_records_replace_fallback() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .withf(|request| request.url == format!("{}/media/documents", BASE))
        .returning(|_| {
            Ok(json_response(
                200,
                json!({
                    "success": true,
                    "data": { "resources": [{
                        "id": "doc-1",
                        "title": "Annual Report",
                        "created_at": "2023-03-15T00:00:00Z",
                        "file_url": "/files/report.pdf",
                        "fileUrl": "/files/ignored.pdf",
                        "category": "english"
                    }] }
                }),
            ))
        });
    let fetcher = fetcher::<Documents>(true, http);

    let state = fetcher.load().await;
    assert!(!state.is_using_fallback);
    assert_eq!(state.error_message, None);
    assert_eq!(state.failure, None);
    assert_eq!(state.items.len(), 1);

    let document = &state.items[0];
    assert_eq!(document.record.date_label, "March 15, 2023");
    assert_eq!(document.file_url, format!("{}/files/report.pdf", BASE));
    assert_eq!(document.downloads, 0);
}

#[tokio::test]
async fn test_video_with_missing_fields() {
    let mut http = MockHttpClient::new();
    http.expect_execute().returning(|_| {
        Ok(json_response(
            200,
            json!([{ "id": 7, "title": null, "thumbnail_url": "/x.jpg", "url": "/v.mp4" }]),
        ))
    });
    let fetcher = fetcher::<Videos>(true, http);

    let state = fetcher.load().await;
    let video = &state.items[0];
    assert_eq!(video.record.id, ResourceId::from(7));
    assert_eq!(video.record.title, "Untitled Video");
    assert_eq!(video.thumbnail, format!("{}/x.jpg", BASE));
    assert_eq!(video.video_url, format!("{}/v.mp4", BASE));
    assert_eq!(video.views, 0);
}

#[tokio::test]
async fn test_bad_records_are_dropped_individually() {
    let mut http = MockHttpClient::new();
    http.expect_execute().returning(|_| {
        Ok(json_response(
            200,
            json!({ "videos": [
                { "id": 1, "url": "/ok.mp4" },
                { "id": 2 },
                { "id": { "nested": true }, "url": "/bad-id.mp4" }
            ] }),
        ))
    });
    let fetcher = fetcher::<Videos>(true, http);

    let state = fetcher.load().await;
    assert!(!state.is_using_fallback);
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].record.id, ResourceId::from(1));
}

#[tokio::test]
async fn test_all_records_invalid_falls_back() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .returning(|_| Ok(json_response(200, json!([{ "id": 2 }]))));
    let fetcher = fetcher::<Videos>(true, http);

    let state = fetcher.load().await;
    assert!(state.is_using_fallback);
    assert_eq!(
        state.error_message.as_deref(),
        Some("No valid videos found in API response")
    );
}

#[tokio::test(start_paused = true)]
async fn test_timeout_serves_fallback() {
    let http = ScriptedClient::new(vec![(
        Duration::from_secs(30),
        json_response(200, json!([{ "id": 1, "url": "/late.mp4" }])),
    )]);
    let fetcher = fetcher::<Videos>(true, http);

    let state = fetcher.load().await;
    assert!(state.is_using_fallback);
    assert_eq!(state.failure, Some(FailureKind::Timeout));
    assert_eq!(
        state.error_message.as_deref(),
        Some("Request timeout - API took too long to respond")
    );
}

#[tokio::test]
async fn test_engagement_counts_despite_failed_tracking() {
    let mut http = MockHttpClient::new();
    http.expect_execute().withf(is_get).returning(|_| {
        Ok(json_response(
            200,
            json!({ "success": true, "data": [{ "id": 7, "url": "/v.mp4", "views": 41 }] }),
        ))
    });
    http.expect_execute()
        .withf(|request| {
            request.method == HttpMethod::Post
                && request.url == format!("{}/media/videos/7/view", BASE)
        })
        .times(1)
        .returning(|_| Err(BridgeError::ConnectionFailed("reset".to_string())));
    let fetcher = fetcher::<Videos>(true, http);
    fetcher.load().await;

    assert!(fetcher.record_engagement(&ResourceId::from(7)).await);
    assert_eq!(fetcher.snapshot().items[0].views, 42);
}

#[tokio::test]
async fn test_engagement_saturates_oversized_counter() {
    let mut http = MockHttpClient::new();
    http.expect_execute().withf(is_get).returning(|_| {
        Ok(HttpResponse::new(
            200,
            r#"[{ "id": 1, "url": "/v.mp4", "views": 1e30 }]"#,
        ))
    });
    http.expect_execute()
        .withf(|request| request.method == HttpMethod::Post)
        .times(1)
        .returning(|_| Ok(HttpResponse::new(204, "")));
    let fetcher = fetcher::<Videos>(true, http);
    fetcher.load().await;
    assert_eq!(fetcher.snapshot().items[0].views, u64::MAX);

    assert!(fetcher.record_engagement(&ResourceId::from(1)).await);
    assert_eq!(fetcher.snapshot().items[0].views, u64::MAX);
}

#[tokio::test]
async fn test_engagement_in_fallback_mode_sends_nothing() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .withf(is_get)
        .times(1)
        .returning(|_| Ok(json_response(500, json!({}))));
    let fetcher = fetcher::<Documents>(true, http);
    fetcher.load().await;

    let id = ResourceId::from(3);
    assert!(fetcher.record_engagement(&id).await);
    assert!(fetcher.record_engagement(&id).await);

    let state = fetcher.snapshot();
    assert_eq!(state.find(&id).map(|d| d.downloads), Some(752));
    assert_eq!(fallback::DOCUMENTS[2].downloads, 750);
}

#[tokio::test]
async fn test_engagement_ids_compare_strictly() {
    let fetcher = fetcher::<Videos>(false, MockHttpClient::new());
    fetcher.load().await;

    assert!(!fetcher.record_engagement(&ResourceId::from("7")).await);
    assert_eq!(fetcher.snapshot().items[6].views, fallback::VIDEOS[6].views);
}

#[tokio::test]
async fn test_document_groups_keep_unknown_categories() {
    let mut http = MockHttpClient::new();
    http.expect_execute().returning(|_| {
        Ok(json_response(
            200,
            json!({ "resources": [
                { "id": 1, "title": "Alphabet", "category": "posters" },
                { "id": 2, "title": "Misc", "category": "unknown-category" }
            ] }),
        ))
    });
    let fetcher = fetcher::<Documents>(true, http);
    fetcher.load().await;

    let groups = fetcher.groups();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].title, "Sign Language Posters");
    assert_eq!(groups[1].title, "Other Resources");
    assert_eq!(groups[1].documents[0].record.title, "Misc");
}

#[tokio::test(start_paused = true)]
async fn test_stale_load_does_not_overwrite_newer_result() {
    let http = ScriptedClient::new(vec![
        (
            Duration::from_secs(5),
            json_response(200, json!([{ "_id": "old", "title": "Stale" }])),
        ),
        (
            Duration::from_secs(1),
            json_response(200, json!([{ "_id": "new", "title": "Fresh" }])),
        ),
    ]);
    let fetcher = fetcher::<Projects>(true, http);

    let (first, second) = tokio::join!(fetcher.load(), fetcher.refresh());
    assert_eq!(first.items[0].record.title, "Stale");
    assert_eq!(second.items[0].record.title, "Fresh");

    let state = fetcher.snapshot();
    assert!(!state.is_loading);
    assert_eq!(state.items[0].record.title, "Fresh");
}

#[tokio::test]
async fn test_mount_loads_once() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .times(1)
        .returning(|_| Ok(json_response(200, json!([{ "_id": "p1", "title": "Clinic" }]))));
    let fetcher = fetcher::<Projects>(true, http);

    assert!(fetcher.mount().await);
    assert!(!fetcher.mount().await);
    assert_eq!(fetcher.snapshot().items.len(), 1);
}

#[tokio::test]
async fn test_subscribers_see_loading_transitions() {
    let fetcher = fetcher::<Team>(false, MockHttpClient::new());
    let mut states = fetcher.subscribe();
    assert!(states.borrow().is_loading);

    fetcher.load().await;
    assert!(states.has_changed().unwrap());
    let state = states.borrow_and_update().clone();
    assert!(!state.is_loading);
    assert_eq!(state.items.len(), fallback::TEAM.len());
}

#[tokio::test]
async fn test_load_one_prefers_live_record() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .withf(|request| request.url == format!("{}/projects/p1", BASE))
        .returning(|_| {
            Ok(json_response(
                200,
                json!({ "success": true, "data": { "project": { "_id": "p1", "title": "Live" } } }),
            ))
        });
    let fetcher = fetcher::<Projects>(true, http);

    let detail = fetcher.load_one(&ResourceId::from("p1")).await;
    assert!(!detail.is_using_fallback);
    assert_eq!(detail.item.map(|p| p.record.title).as_deref(), Some("Live"));
}

#[tokio::test]
async fn test_load_one_falls_back_by_id() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .returning(|_| Ok(json_response(404, json!({ "error": "Project not found" }))));
    let fetcher = fetcher::<Projects>(true, http);

    let detail = fetcher.load_one(&ResourceId::from(3)).await;
    assert!(detail.is_using_fallback);
    assert_eq!(
        detail.item.as_ref().map(|p| p.record.title.as_str()),
        Some("Economic Empowerment Initiative")
    );
    assert_eq!(detail.error_message.as_deref(), Some("Project not found"));

    let detail = fetcher.load_one(&ResourceId::from(99)).await;
    assert!(detail.item.is_none());
    assert_eq!(detail.error_message.as_deref(), Some("Project not found"));
}

#[tokio::test]
async fn test_events_report_fallback_loads() {
    let bus = EventBus::new(16);
    let mut events = bus.subscribe();
    let fetcher = fetcher::<Videos>(false, MockHttpClient::new()).with_events(bus);

    fetcher.load().await;

    assert_eq!(
        events.recv().await.unwrap(),
        CoreEvent::Content(ContentEvent::LoadStarted {
            resource: "videos".to_string()
        })
    );
    assert_eq!(
        events.recv().await.unwrap(),
        CoreEvent::Content(ContentEvent::Loaded {
            resource: "videos".to_string(),
            count: 10,
            using_fallback: true,
            error: None,
        })
    );
}
