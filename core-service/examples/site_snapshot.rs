//! Loads every content type once and prints what the site would show.
//!
//! Run with:
//! ```bash
//! # Offline: bundled sample content only
//! cargo run -p core-service --example site_snapshot
//!
//! # Against a local backend, JSON logs
//! SITE_USE_API=true SITE_API_URL=http://localhost:5000/api SITE_LOG_FORMAT=json \
//!     cargo run -p core-service --example site_snapshot
//! ```

use core_runtime::events::CoreEvent;
use core_runtime::logging::{init_logging, LoggingConfig};
use core_service::{FetchState, SiteService};
use tracing::info;

fn summary<T>(name: &str, state: &FetchState<T>) {
    let source = if state.is_using_fallback {
        "fallback"
    } else {
        "live"
    };
    println!("{:<10} {:>3} items ({})", name, state.items.len(), source);
    if let Some(message) = &state.error_message {
        println!("           notice: {}", message);
    }
}

#[tokio::main]
async fn main() -> core_service::Result<()> {
    init_logging(LoggingConfig::from_env())?;

    let site = SiteService::from_env()?;
    let mut events = site.events().subscribe();

    site.mount_all().await;

    summary("projects", &site.projects().snapshot());
    summary("blogs", &site.blogs().snapshot());
    summary("team", &site.team().snapshot());
    summary("videos", &site.videos().snapshot());
    summary("documents", &site.documents().snapshot());

    for group in site.document_groups() {
        println!(
            "{} {} ({} documents)",
            group.icon,
            group.title,
            group.documents.len()
        );
    }

    while let Ok(event) = events.try_recv() {
        if let CoreEvent::Content(content) = event {
            info!(event = ?content, "Content event");
        }
    }

    Ok(())
}
