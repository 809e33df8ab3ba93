use crate::core::config::Config;
use crate::core::mime::MimeRegistry;
use crate::core::model::{
    AuthorInfo, ContentDisplayItem, GroupMembershipRecord, GroupViewModel, MemberInfo,
};
use crate::render::RenderSink;
use crate::services::content::ContentResolver;
use crate::services::directory::Directory;
use crate::services::members::MemberResolver;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Trips when the owning widget tears down. In-flight transport calls still
/// complete; their results just no longer reach the sink.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Resolver result routed back to the orchestrator. `index` is the group's
/// slot in the view-model list, fixed at fan-out time.
enum GroupUpdate {
    Manager {
        index: usize,
        manager: MemberInfo,
    },
    LatestContent {
        index: usize,
        content: ContentDisplayItem,
        author: AuthorInfo,
    },
}

/// Drives the per-group resolvers and folds their results into the view
/// models. Sole owner and sole writer of the view-model list; resolvers only
/// return data. Each group's base slice renders synchronously before its
/// resolvers launch, and every sub-section renders the moment its update
/// lands. There is no cross-group barrier.
pub struct Orchestrator<D> {
    directory: Arc<D>,
    sink: Arc<dyn RenderSink>,
    registry: Arc<MimeRegistry>,
    config: Config,
    cancel: CancelToken,
    groups: Vec<GroupViewModel>,
}

impl<D: Directory> Orchestrator<D> {
    pub fn new(
        directory: Arc<D>,
        sink: Arc<dyn RenderSink>,
        registry: Arc<MimeRegistry>,
        config: Config,
        cancel: CancelToken,
    ) -> Self {
        Self {
            directory,
            sink,
            registry,
            config,
            cancel,
            groups: Vec::new(),
        }
    }

    pub fn groups(&self) -> &[GroupViewModel] {
        &self.groups
    }

    pub async fn run(&mut self, memberships: Vec<GroupMembershipRecord>) {
        if memberships.is_empty() {
            debug!("No group memberships; nothing to render");
            return;
        }
        info!("Aggregating {} group memberships", memberships.len());

        let (tx, mut rx) = mpsc::unbounded_channel::<GroupUpdate>();
        let mut tasks = JoinSet::new();

        for record in memberships {
            // Base slice first: instant feedback before any lookup lands.
            self.sink.render_group_base(&record);
            let index = self.groups.len();
            self.groups.push(GroupViewModel::new(record.clone()));

            let members = MemberResolver::new(self.directory.clone(), &self.config.manager_role);
            let member_tx = tx.clone();
            let member_group = record.groupid.clone();
            tasks.spawn(async move {
                if let Some(manager) = members.resolve_manager(&member_group).await {
                    let _ = member_tx.send(GroupUpdate::Manager { index, manager });
                }
            });

            let contents =
                ContentResolver::new(self.directory.clone(), self.registry.clone(), &self.config);
            let content_tx = tx.clone();
            let content_group = record.groupid;
            tasks.spawn(async move {
                if let Some((content, author)) = contents.resolve_latest(&content_group).await {
                    let _ = content_tx.send(GroupUpdate::LatestContent {
                        index,
                        content,
                        author,
                    });
                }
            });
        }
        drop(tx);

        // Updates arrive in completion order, interleaved across groups. The
        // channel closes once every resolver task has finished.
        while let Some(update) = rx.recv().await {
            if self.cancel.is_cancelled() {
                debug!("Widget torn down; dropping remaining updates");
                break;
            }
            self.apply(update);
        }

        if self.cancel.is_cancelled() {
            tasks.abort_all();
        }
        while tasks.join_next().await.is_some() {}
    }

    fn apply(&mut self, update: GroupUpdate) {
        match update {
            GroupUpdate::Manager { index, manager } => {
                let Some(vm) = self.groups.get_mut(index) else {
                    warn!("Manager update for unknown group slot {}", index);
                    return;
                };
                if vm.set_manager(manager.clone()) {
                    self.sink.render_manager(&vm.group, &manager);
                } else {
                    warn!("Duplicate manager update ignored for group {}", vm.group.groupid);
                }
            }
            GroupUpdate::LatestContent {
                index,
                content,
                author,
            } => {
                let Some(vm) = self.groups.get_mut(index) else {
                    warn!("Content update for unknown group slot {}", index);
                    return;
                };
                if vm.set_latest_content(content.clone(), author.clone()) {
                    self.sink.render_latest_content(&vm.group, &content, &author);
                } else {
                    warn!("Duplicate content update ignored for group {}", vm.group.groupid);
                }
            }
        }
    }
}
