use crate::core::config::Config;
use crate::core::format::format_content_item;
use crate::core::mime::MimeRegistry;
use crate::core::model::{AuthorInfo, ContentDisplayItem};
use crate::services::directory::Directory;
use std::sync::Arc;
use tracing::debug;

/// Resolves a group's most recently modified shared content item together
/// with its author. The pair is all-or-nothing: the content sub-section never
/// renders author-less.
pub struct ContentResolver<D> {
    directory: Arc<D>,
    registry: Arc<MimeRegistry>,
    items_per_query: usize,
    name_budget_px: u32,
    glyph_width_px: u32,
}

impl<D: Directory> ContentResolver<D> {
    pub fn new(directory: Arc<D>, registry: Arc<MimeRegistry>, config: &Config) -> Self {
        Self {
            directory,
            registry,
            items_per_query: config.items_per_query,
            name_budget_px: config.name_budget_px(),
            glyph_width_px: config.glyph_width_px,
        }
    }

    pub async fn resolve_latest(&self, group_id: &str) -> Option<(ContentDisplayItem, AuthorInfo)> {
        let results = match self
            .directory
            .latest_content(group_id, self.items_per_query)
            .await
        {
            Ok(results) => results,
            Err(e) => {
                debug!("Content search failed for group {}: {}", group_id, e);
                return None;
            }
        };

        let raw = results.into_iter().next()?;
        let item = format_content_item(&raw, &self.registry, self.name_budget_px, self.glyph_width_px);

        // Dependent lookup: the item is only worth rendering with its author.
        let created_for = match raw.created_for.as_deref() {
            Some(user_id) => user_id,
            None => {
                debug!("Content {} has no created-for user; skipping", raw.content_id);
                return None;
            }
        };
        match self.directory.user(created_for).await {
            Ok(user) => Some((
                item,
                AuthorInfo {
                    author_id: user.userid,
                    author_name: user.name,
                },
            )),
            Err(e) => {
                debug!("Author lookup failed for content {}: {}", raw.content_id, e);
                None
            }
        }
    }
}
