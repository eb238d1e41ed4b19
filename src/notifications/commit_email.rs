//! Formatting of the per-commit notification email.

use super::EmailMessage;
use crate::config::MailConfig;
use crate::push::Commit;

/// Committer name GitHub records for "Squash and merge" commits
const SQUASH_MERGE_COMMITTER: &str = "GitHub";

/// One line per changed file, grouped as Added, Deleted, Modified.
pub fn diff_stat(commit: &Commit) -> String {
    let groups = [
        ("A", &commit.added),
        ("D", &commit.removed),
        ("M", &commit.modified),
    ];

    groups
        .iter()
        .filter(|(_, files)| !files.is_empty())
        .map(|(status, files)| {
            files
                .iter()
                .map(|file| format!("{} {}", status, file))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Display name for the From header.
///
/// Squash merges made through the web UI are committed by GitHub itself; the
/// author is the person who actually wrote the change.
pub fn sender_name(commit: &Commit) -> &str {
    if commit.committer.name == SQUASH_MERGE_COMMITTER {
        &commit.author.name
    } else {
        &commit.committer.name
    }
}

/// First line of the commit message
pub fn subject_line(message: &str) -> &str {
    message.split('\n').next().unwrap_or_default()
}

/// Render the plain text body
pub fn render_body(commit: &Commit, branch: &str, diff_stat: &str, unified_diff: &str) -> String {
    format!(
        r#"{url}
commit: {id}
branch: {branch}
author: {author_name} <{author_email}>
committer: {committer_name} <{committer_email}>
date: {timestamp}
summary:

{message}

files:
{diff_stat}

{unified_diff}
"#,
        url = commit.url,
        id = commit.id,
        branch = branch,
        author_name = commit.author.name,
        author_email = commit.author.email,
        committer_name = commit.committer.name,
        committer_email = commit.committer.email,
        timestamp = commit.timestamp,
        message = commit.message,
        diff_stat = diff_stat,
        unified_diff = unified_diff,
    )
}

/// Assemble the notification for one commit
pub fn build_commit_email(
    commit: &Commit,
    branch: &str,
    unified_diff: &str,
    mail: &MailConfig,
) -> EmailMessage {
    let stat = diff_stat(commit);

    EmailMessage {
        from_name: sender_name(commit).to_string(),
        from_address: mail.sender.clone(),
        to: mail.recipient.clone(),
        subject: subject_line(&commit.message).to_string(),
        body: render_body(commit, branch, &stat, unified_diff),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::push::Person;

    fn commit() -> Commit {
        Commit {
            id: "2fe2b1f".to_string(),
            url: "https://github.com/python/cpython/commit/2fe2b1f".to_string(),
            message: "Fix bug\n\nDetails here".to_string(),
            timestamp: "2017-02-10T12:00:00Z".to_string(),
            author: Person {
                name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string(),
            },
            committer: Person {
                name: "John Smith".to_string(),
                email: "john@example.com".to_string(),
            },
            added: vec!["a.py".to_string()],
            removed: vec![],
            modified: vec!["b.py".to_string(), "c.py".to_string()],
        }
    }

    #[test]
    fn test_diff_stat_groups_in_order() {
        assert_eq!(diff_stat(&commit()), "A a.py\nM b.py\nM c.py");
    }

    #[test]
    fn test_diff_stat_all_categories() {
        let mut commit = commit();
        commit.removed = vec!["old.py".to_string()];
        assert_eq!(diff_stat(&commit), "A a.py\nD old.py\nM b.py\nM c.py");
    }

    #[test]
    fn test_diff_stat_empty() {
        let mut commit = commit();
        commit.added.clear();
        commit.modified.clear();
        assert_eq!(diff_stat(&commit), "");
    }

    #[test]
    fn test_sender_name_uses_committer() {
        assert_eq!(sender_name(&commit()), "John Smith");
    }

    #[test]
    fn test_sender_name_squash_merge_uses_author() {
        let mut commit = commit();
        commit.committer.name = "GitHub".to_string();
        assert_eq!(sender_name(&commit), "Jane Doe");
    }

    #[test]
    fn test_sender_name_match_is_exact() {
        let mut commit = commit();
        commit.committer.name = "github".to_string();
        assert_eq!(sender_name(&commit), "github");
    }

    #[test]
    fn test_subject_line() {
        assert_eq!(subject_line("Fix bug\n\nDetails here"), "Fix bug");
        assert_eq!(subject_line("Single line"), "Single line");
        assert_eq!(subject_line(""), "");
    }

    #[test]
    fn test_render_body_layout() {
        let commit = commit();
        let body = render_body(&commit, "main", "A a.py", "+x\n-y\n");
        let expected = "\
https://github.com/python/cpython/commit/2fe2b1f
commit: 2fe2b1f
branch: main
author: Jane Doe <jane@example.com>
committer: John Smith <john@example.com>
date: 2017-02-10T12:00:00Z
summary:

Fix bug

Details here

files:
A a.py

+x
-y

";
        assert_eq!(body, expected);
    }

    #[test]
    fn test_build_commit_email() {
        let mail = MailConfig {
            sender: "noreply@python.org".to_string(),
            recipient: "checkins@python.org".to_string(),
        };
        let mut commit = commit();
        commit.committer.name = "GitHub".to_string();

        let email = build_commit_email(&commit, "3.6", "+x\n-y\n", &mail);

        assert_eq!(email.from_name, "Jane Doe");
        assert_eq!(email.from_address, "noreply@python.org");
        assert_eq!(email.to, "checkins@python.org");
        assert_eq!(email.subject, "Fix bug");
        assert!(email.body.contains("branch: 3.6"));
        assert!(email.body.contains("A a.py\nM b.py\nM c.py"));
    }
}
