//! Push event payloads as delivered by the source-hosting platform.

mod validator;

pub use validator::*;

use serde::Deserialize;

/// Outer shape of a push event. Commits stay untyped until the push has
/// passed the branch check; only the first one is ever decoded.
#[derive(Debug, Clone, Deserialize)]
pub struct PushEvent {
    #[serde(rename = "ref", default)]
    pub git_ref: String,
    #[serde(default)]
    pub commits: Vec<serde_json::Value>,
}

impl PushEvent {
    /// Last path segment of the ref (refs/heads/3.12 -> 3.12)
    pub fn branch(&self) -> &str {
        self.git_ref.rsplit('/').next().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Commit {
    pub id: String,
    pub url: String,
    pub message: String,
    pub timestamp: String,
    pub author: Person,
    pub committer: Person,
    #[serde(default)]
    pub added: Vec<String>,
    #[serde(default)]
    pub removed: Vec<String>,
    #[serde(default)]
    pub modified: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Person {
    pub name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_from_ref() {
        let event: PushEvent =
            serde_json::from_str(r#"{"ref": "refs/heads/3.12", "commits": []}"#).unwrap();
        assert_eq!(event.branch(), "3.12");
    }

    #[test]
    fn test_branch_without_slashes() {
        let event: PushEvent = serde_json::from_str(r#"{"ref": "main"}"#).unwrap();
        assert_eq!(event.branch(), "main");
        assert!(event.commits.is_empty());
    }

    #[test]
    fn test_event_accepts_partial_commits() {
        let event: PushEvent = serde_json::from_str(
            r#"{"ref": "refs/heads/feature/x", "commits": [{"id": "abc"}, {}]}"#,
        )
        .unwrap();
        assert_eq!(event.branch(), "x");
        assert_eq!(event.commits.len(), 2);
    }

    #[test]
    fn test_commit_file_lists_default_to_empty() {
        let commit: Commit = serde_json::from_str(
            r#"{
                "id": "abc123",
                "url": "https://github.com/python/cpython/commit/abc123",
                "message": "Fix bug",
                "timestamp": "2017-02-10T12:00:00Z",
                "author": {"name": "Jane Doe", "email": "jane@example.com"},
                "committer": {"name": "GitHub", "email": "noreply@github.com"},
                "distinct": true
            }"#,
        )
        .unwrap();

        assert!(commit.added.is_empty());
        assert!(commit.removed.is_empty());
        assert!(commit.modified.is_empty());
        assert_eq!(commit.committer.name, "GitHub");
    }
}
