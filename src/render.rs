use crate::core::model::{AuthorInfo, ContentDisplayItem, GroupMembershipRecord, MemberInfo};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::warn;

/// Render seam between the orchestrator and the host's template engine. Each
/// call targets one named region scoped to a single group, so concurrent
/// sub-renders for different groups cannot touch each other's output.
/// Calls are synchronous and side-effect-only.
pub trait RenderSink: Send + Sync {
    /// Base slice: group name plus empty manager and content placeholders.
    fn render_group_base(&self, group: &GroupMembershipRecord);

    /// Manager sub-section for one group.
    fn render_manager(&self, group: &GroupMembershipRecord, manager: &MemberInfo);

    /// Latest-content sub-section for one group; author always accompanies
    /// the content item.
    fn render_latest_content(
        &self,
        group: &GroupMembershipRecord,
        content: &ContentDisplayItem,
        author: &AuthorInfo,
    );
}

/// Rendered regions for one group. `None` means the placeholder was never
/// filled, which is a valid terminal state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupRegions {
    pub base: Option<String>,
    pub manager: Option<String>,
    pub latest_content: Option<String>,
}

/// DOM-like sink producing markup strings into per-group regions.
#[derive(Debug, Default)]
pub struct MarkupSink {
    regions: Mutex<HashMap<String, GroupRegions>>,
}

impl MarkupSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn regions_for(&self, group_id: &str) -> Option<GroupRegions> {
        match self.regions.lock() {
            Ok(regions) => regions.get(group_id).cloned(),
            Err(e) => {
                warn!("Render region store poisoned: {}", e);
                None
            }
        }
    }

    /// All regions, sorted by group id for stable output.
    pub fn snapshot(&self) -> Vec<(String, GroupRegions)> {
        let mut all: Vec<_> = match self.regions.lock() {
            Ok(regions) => regions.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            Err(e) => {
                warn!("Render region store poisoned: {}", e);
                Vec::new()
            }
        };
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    fn update<F: FnOnce(&mut GroupRegions)>(&self, group_id: &str, apply: F) {
        match self.regions.lock() {
            Ok(mut regions) => apply(regions.entry(group_id.to_string()).or_default()),
            Err(e) => warn!("Render region store poisoned: {}", e),
        }
    }
}

impl RenderSink for MarkupSink {
    fn render_group_base(&self, group: &GroupMembershipRecord) {
        let markup = format!(
            "<li class=\"groupboard_item\" data-group=\"{}\">\
             <h3>{}</h3>\
             <div class=\"groupboard_manager\"></div>\
             <div class=\"groupboard_content\"></div>\
             </li>",
            group.groupid, group.display_name
        );
        self.update(&group.groupid, |regions| regions.base = Some(markup));
    }

    fn render_manager(&self, group: &GroupMembershipRecord, manager: &MemberInfo) {
        let markup = format!(
            "<a href=\"/~{}\">{}</a>",
            manager.member_id, manager.member_name
        );
        self.update(&group.groupid, |regions| regions.manager = Some(markup));
    }

    fn render_latest_content(
        &self,
        group: &GroupMembershipRecord,
        content: &ContentDisplayItem,
        author: &AuthorInfo,
    ) {
        let size = if content.size.is_empty() {
            String::new()
        } else {
            format!(" {}", content.size)
        };
        let markup = format!(
            "<a href=\"{}\"><img src=\"{}\" alt=\"{}\"/>{}</a>{} \
             <span class=\"groupboard_author\"><a href=\"/~{}\">{}</a></span>",
            content.path,
            content.type_icon,
            content.type_label,
            content.name,
            size,
            author.author_id,
            author.author_name
        );
        self.update(&group.groupid, |regions| {
            regions.latest_content = Some(markup)
        });
    }
}

/// Capture sink recording render calls in arrival order. Used by the test
/// suite to assert ordering guarantees.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<RenderEvent>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    Base(String),
    Manager(String),
    LatestContent(String),
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RenderEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(e) => {
                warn!("Recording sink poisoned: {}", e);
                Vec::new()
            }
        }
    }

    fn record(&self, event: RenderEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl RenderSink for RecordingSink {
    fn render_group_base(&self, group: &GroupMembershipRecord) {
        self.record(RenderEvent::Base(group.groupid.clone()));
    }

    fn render_manager(&self, group: &GroupMembershipRecord, _manager: &MemberInfo) {
        self.record(RenderEvent::Manager(group.groupid.clone()));
    }

    fn render_latest_content(
        &self,
        group: &GroupMembershipRecord,
        _content: &ContentDisplayItem,
        _author: &AuthorInfo,
    ) {
        self.record(RenderEvent::LatestContent(group.groupid.clone()));
    }
}
