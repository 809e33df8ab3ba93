use crate::core::model::MemberInfo;
use crate::services::directory::Directory;
use std::sync::Arc;
use tracing::debug;

/// Resolves a group's manager from its roster. Zero matches and transport
/// failures are both normal empty states, not errors.
pub struct MemberResolver<D> {
    directory: Arc<D>,
    role: String,
}

impl<D: Directory> MemberResolver<D> {
    pub fn new(directory: Arc<D>, role: impl Into<String>) -> Self {
        Self {
            directory,
            role: role.into(),
        }
    }

    /// First roster match wins. The roster order supplied by the directory is
    /// authoritative; the tie-break between multiple managers is unspecified.
    pub async fn resolve_manager(&self, group_id: &str) -> Option<MemberInfo> {
        match self.directory.members(group_id, &self.role).await {
            Ok(roster) => roster.into_iter().next().map(|user| MemberInfo {
                member_id: user.userid,
                member_name: user.name,
            }),
            Err(e) => {
                debug!("Manager lookup failed for group {}: {}", group_id, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::directory::InMemoryDirectory;
    use crate::core::model::UserRecord;

    fn user(id: &str, name: &str) -> UserRecord {
        UserRecord {
            userid: id.to_string(),
            name: name.to_string(),
        }
    }

    // --- Manager Resolution Tests ---

    #[tokio::test]
    async fn test_first_manager_wins() {
        let directory = Arc::new(
            InMemoryDirectory::new()
                .with_member("g1", "Manager", user("u1", "Ada"))
                .with_member("g1", "Manager", user("u2", "Grace")),
        );
        let resolver = MemberResolver::new(directory, "Manager");

        let manager = resolver.resolve_manager("g1").await.expect("manager resolved");
        assert_eq!(manager.member_id, "u1");
        assert_eq!(manager.member_name, "Ada");
    }

    #[tokio::test]
    async fn test_zero_managers_is_absent_not_error() {
        let directory = Arc::new(
            InMemoryDirectory::new().with_member("g1", "Member", user("u1", "Ada")),
        );
        let resolver = MemberResolver::new(directory, "Manager");

        assert!(resolver.resolve_manager("g1").await.is_none());
    }

    #[tokio::test]
    async fn test_lookup_failure_is_absent_not_error() {
        let directory = Arc::new(InMemoryDirectory::new().failing_members("g1"));
        let resolver = MemberResolver::new(directory, "Manager");

        assert!(resolver.resolve_manager("g1").await.is_none());
    }
}
