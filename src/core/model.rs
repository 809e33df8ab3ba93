use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One group the current user belongs to, as reported by the identity store.
/// Immutable for the duration of a render cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMembershipRecord {
    pub groupid: String,
    pub display_name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A user as returned by roster and profile lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub userid: String,
    pub name: String,
}

/// The group's manager, derived from the roster filtered to the manager role.
/// At most one per group; first roster match wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberInfo {
    pub member_id: String,
    pub member_name: String,
}

/// Author of a content item, resolved from its "created for" user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorInfo {
    pub author_id: String,
    pub author_name: String,
}

/// Raw pooled-content search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub filename: String,
    pub content_id: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub size_bytes: Option<u64>,
    /// User id the item was created for; the content author.
    #[serde(default)]
    pub created_for: Option<String>,
    pub last_modified: DateTime<Utc>,
}

/// Render-ready projection of a content record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDisplayItem {
    pub name: String,
    pub path: String,
    pub type_label: String,
    pub type_icon: String,
    /// Parenthesised human size, or empty when the byte length is unknown.
    pub size: String,
}

/// Per-group aggregate handed to the render sink. Partial population is the
/// normal steady state: each optional field is filled independently, exactly
/// once. Fields are never cleared or overwritten, only extended.
#[derive(Debug, Clone)]
pub struct GroupViewModel {
    pub group: GroupMembershipRecord,
    pub manager: Option<MemberInfo>,
    pub latest_content: Option<ContentDisplayItem>,
    pub author: Option<AuthorInfo>,
}

impl GroupViewModel {
    pub fn new(group: GroupMembershipRecord) -> Self {
        Self {
            group,
            manager: None,
            latest_content: None,
            author: None,
        }
    }

    /// Write-once. Returns false if a manager was already recorded.
    pub fn set_manager(&mut self, manager: MemberInfo) -> bool {
        if self.manager.is_some() {
            return false;
        }
        self.manager = Some(manager);
        true
    }

    /// Write-once. Content and author arrive together so the content
    /// sub-section can never render author-less.
    pub fn set_latest_content(&mut self, content: ContentDisplayItem, author: AuthorInfo) -> bool {
        if self.latest_content.is_some() || self.author.is_some() {
            return false;
        }
        self.latest_content = Some(content);
        self.author = Some(author);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(id: &str) -> GroupMembershipRecord {
        GroupMembershipRecord {
            groupid: id.to_string(),
            display_name: format!("Group {}", id),
            description: None,
        }
    }

    fn manager(id: &str) -> MemberInfo {
        MemberInfo {
            member_id: id.to_string(),
            member_name: format!("User {}", id),
        }
    }

    fn content(name: &str) -> ContentDisplayItem {
        ContentDisplayItem {
            name: name.to_string(),
            path: "/p/c1".to_string(),
            type_label: "Document".to_string(),
            type_icon: "/img/doc.png".to_string(),
            size: String::new(),
        }
    }

    fn author(id: &str) -> AuthorInfo {
        AuthorInfo {
            author_id: id.to_string(),
            author_name: format!("User {}", id),
        }
    }

    // --- Extend-Only View Model Tests ---

    #[test]
    fn test_new_view_model_is_unpopulated() {
        let vm = GroupViewModel::new(group("g1"));
        assert!(vm.manager.is_none());
        assert!(vm.latest_content.is_none());
        assert!(vm.author.is_none());
    }

    #[test]
    fn test_set_manager_is_write_once() {
        let mut vm = GroupViewModel::new(group("g1"));
        assert!(vm.set_manager(manager("u1")), "First write should succeed");
        assert!(
            !vm.set_manager(manager("u2")),
            "Second write should be refused"
        );
        assert_eq!(vm.manager.as_ref().map(|m| m.member_id.as_str()), Some("u1"));
    }

    #[test]
    fn test_set_latest_content_is_write_once() {
        let mut vm = GroupViewModel::new(group("g1"));
        assert!(vm.set_latest_content(content("report"), author("u1")));
        assert!(
            !vm.set_latest_content(content("other"), author("u2")),
            "Second write should be refused"
        );
        assert_eq!(
            vm.latest_content.as_ref().map(|c| c.name.as_str()),
            Some("report")
        );
        assert_eq!(vm.author.as_ref().map(|a| a.author_id.as_str()), Some("u1"));
    }

    #[test]
    fn test_manager_and_content_are_independent() {
        let mut vm = GroupViewModel::new(group("g1"));
        assert!(vm.set_latest_content(content("report"), author("u1")));
        assert!(
            vm.set_manager(manager("u2")),
            "Content arriving first must not block the manager write"
        );
    }
}
