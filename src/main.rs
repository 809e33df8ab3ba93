use anyhow::Result;
use chrono::{DateTime, Utc};
use groupboard::core::config::Config;
use groupboard::core::mime::{LINK_MIME, MimeRegistry};
use groupboard::core::model::{ContentRecord, GroupMembershipRecord, UserRecord};
use groupboard::logging;
use groupboard::render::MarkupSink;
use groupboard::services::directory::InMemoryDirectory;
use groupboard::widget::Widget;
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let (_guard, log_handle) = logging::init();

    let cfg = match std::env::args().nth(1) {
        Some(path) => Config::from_file(Path::new(&path))?,
        None => Config::default(),
    };
    cfg.validate()?;
    logging::apply_level(&log_handle, &cfg.log_level)?;
    tracing::info!("Starting groupboard demo host");

    let registry = Arc::new(MimeRegistry::with_defaults());
    let directory = Arc::new(sample_directory()?);
    let sink = Arc::new(MarkupSink::new());

    let overlay: Arc<dyn Fn() + Send + Sync> =
        Arc::new(|| tracing::info!("Create-group overlay requested"));
    let on_load = Box::new(|name: &str| tracing::info!("Widget loaded: {}", name));

    let mut widget = Widget::new(
        directory,
        sink.clone(),
        registry,
        cfg,
        overlay,
        on_load,
    );
    widget.init().await;

    for (group_id, regions) in sink.snapshot() {
        println!("== {} ==", group_id);
        if let Some(base) = &regions.base {
            println!("base:    {}", base);
        }
        println!("manager: {}", regions.manager.as_deref().unwrap_or("<empty>"));
        println!("content: {}", regions.latest_content.as_deref().unwrap_or("<empty>"));
    }

    Ok(())
}

/// Demo fixtures: three groups exercising the full, the manager-less, and the
/// content-less paths.
fn sample_directory() -> Result<InMemoryDirectory> {
    let group = |id: &str, name: &str| GroupMembershipRecord {
        groupid: id.to_string(),
        display_name: name.to_string(),
        description: None,
    };
    let user = |id: &str, name: &str| UserRecord {
        userid: id.to_string(),
        name: name.to_string(),
    };

    Ok(InMemoryDirectory::new()
        .with_group(group("rust-study", "Rust Study Group"))
        .with_group(group("archery", "Archery Club"))
        .with_group(group("book-club", "Book Club"))
        .with_member("rust-study", "Manager", user("ada", "Ada Lovelace"))
        .with_member("book-club", "Manager", user("grace", "Grace Hopper"))
        .with_user(user("linus", "Linus Torvalds"))
        .with_user(user("grace", "Grace Hopper"))
        .with_content(
            "rust-study",
            ContentRecord {
                filename: "ownership and borrowing workshop notes.pdf".to_string(),
                content_id: "c-workshop".to_string(),
                mime_type: Some("application/pdf".to_string()),
                size_bytes: Some(182_272),
                created_for: Some("linus".to_string()),
                last_modified: "2026-08-21T14:30:00Z".parse::<DateTime<Utc>>()?,
            },
        )
        .with_content(
            "rust-study",
            ContentRecord {
                filename: "intro slides.pdf".to_string(),
                content_id: "c-intro".to_string(),
                mime_type: Some("application/pdf".to_string()),
                size_bytes: Some(90_112),
                created_for: Some("linus".to_string()),
                last_modified: "2026-07-02T09:00:00Z".parse::<DateTime<Utc>>()?,
            },
        )
        .with_content(
            "archery",
            ContentRecord {
                filename: "range-booking.example.org".to_string(),
                content_id: "c-range".to_string(),
                mime_type: Some(LINK_MIME.to_string()),
                size_bytes: None,
                created_for: Some("grace".to_string()),
                last_modified: "2026-08-10T18:00:00Z".parse::<DateTime<Utc>>()?,
            },
        ))
}
