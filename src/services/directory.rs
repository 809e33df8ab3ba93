use crate::core::model::{ContentRecord, GroupMembershipRecord, UserRecord};
use anyhow::{Result, bail};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::time::Duration;

/// Host collaborators the panel consumes: the identity store's membership
/// list, the group roster lookup, the user profile lookup, and the pooled
/// content search. Lookups are plain futures so callers can fan them out with
/// per-group tasks instead of nested callbacks.
pub trait Directory: Send + Sync + 'static {
    /// Current user's group memberships. Local to the session, no round-trip.
    fn memberships(&self) -> Vec<GroupMembershipRecord>;

    /// Group roster filtered to one role, in the host's roster order.
    fn members(
        &self,
        group_id: &str,
        role: &str,
    ) -> impl Future<Output = Result<Vec<UserRecord>>> + Send;

    /// Profile lookup by user id.
    fn user(&self, user_id: &str) -> impl Future<Output = Result<UserRecord>> + Send;

    /// Pooled content associated with a group, most recently modified first,
    /// at most `items` results.
    fn latest_content(
        &self,
        group_id: &str,
        items: usize,
    ) -> impl Future<Output = Result<Vec<ContentRecord>>> + Send;
}

/// In-memory directory for the demo host and the test suite. Failure and
/// latency injection cover the degraded paths the panel has to absorb.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    memberships: Vec<GroupMembershipRecord>,
    // group id -> role -> roster, order preserved
    rosters: HashMap<String, HashMap<String, Vec<UserRecord>>>,
    users: HashMap<String, UserRecord>,
    content: HashMap<String, Vec<ContentRecord>>,
    fail_members: HashSet<String>,
    fail_content: HashSet<String>,
    fail_users: HashSet<String>,
    latency: Option<Duration>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(mut self, group: GroupMembershipRecord) -> Self {
        self.memberships.push(group);
        self
    }

    pub fn with_member(mut self, group_id: &str, role: &str, member: UserRecord) -> Self {
        self.rosters
            .entry(group_id.to_string())
            .or_default()
            .entry(role.to_string())
            .or_default()
            .push(member);
        self
    }

    pub fn with_user(mut self, user: UserRecord) -> Self {
        self.users.insert(user.userid.clone(), user);
        self
    }

    pub fn with_content(mut self, group_id: &str, record: ContentRecord) -> Self {
        self.content
            .entry(group_id.to_string())
            .or_default()
            .push(record);
        self
    }

    /// Member lookups for this group fail outright.
    pub fn failing_members(mut self, group_id: &str) -> Self {
        self.fail_members.insert(group_id.to_string());
        self
    }

    /// Content lookups for this group fail outright.
    pub fn failing_content(mut self, group_id: &str) -> Self {
        self.fail_content.insert(group_id.to_string());
        self
    }

    /// Profile lookups for this user fail outright.
    pub fn failing_user(mut self, user_id: &str) -> Self {
        self.fail_users.insert(user_id.to_string());
        self
    }

    /// Adds a simulated round-trip delay to every async lookup.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    async fn round_trip(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl Directory for InMemoryDirectory {
    fn memberships(&self) -> Vec<GroupMembershipRecord> {
        self.memberships.clone()
    }

    async fn members(&self, group_id: &str, role: &str) -> Result<Vec<UserRecord>> {
        self.round_trip().await;
        if self.fail_members.contains(group_id) {
            bail!("member lookup unavailable for group {}", group_id);
        }
        Ok(self
            .rosters
            .get(group_id)
            .and_then(|roles| roles.get(role))
            .cloned()
            .unwrap_or_default())
    }

    async fn user(&self, user_id: &str) -> Result<UserRecord> {
        self.round_trip().await;
        if self.fail_users.contains(user_id) {
            bail!("profile lookup unavailable for user {}", user_id);
        }
        match self.users.get(user_id) {
            Some(user) => Ok(user.clone()),
            None => bail!("no such user: {}", user_id),
        }
    }

    async fn latest_content(&self, group_id: &str, items: usize) -> Result<Vec<ContentRecord>> {
        self.round_trip().await;
        if self.fail_content.contains(group_id) {
            bail!("content search unavailable for group {}", group_id);
        }
        let mut results = self.content.get(group_id).cloned().unwrap_or_default();
        results.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        results.truncate(items);
        Ok(results)
    }
}
