//! Request checks that run before any outbound traffic.
//!
//! Rejections carry the HTTP status and text returned to the caller. They are
//! ordinary outcomes, not failures, and are never logged as errors.

use axum::http::StatusCode;
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use super::{Commit, PushEvent};

/// Media type reported when the request has no Content-Type header
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

lazy_static! {
    /// Branches that produce commit emails: release branches (3.12) and the trunk
    static ref ALLOWED_BRANCH_REGEX: Regex = Regex::new(r"^(\d+\.\d+|main|master)$").unwrap();
}

/// Early exit with a fixed status and human-readable text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub status: StatusCode,
    pub message: String,
}

impl Rejection {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn unsupported_media_type(content_type: &str) -> Self {
        Self::new(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            format!("can only accept application/json, not {}", content_type),
        )
    }

    pub fn no_commits() -> Self {
        Self::new(StatusCode::NO_CONTENT, "There is no commit to be processed.")
    }

    pub fn invalid_branch() -> Self {
        Self::new(StatusCode::NO_CONTENT, "Invalid branch name.")
    }
}

#[derive(Error, Debug)]
pub enum PushError {
    #[error("push rejected: {}", .0.message)]
    Rejected(Rejection),

    #[error("malformed push payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl From<Rejection> for PushError {
    fn from(rejection: Rejection) -> Self {
        PushError::Rejected(rejection)
    }
}

/// A push that passed every check
#[derive(Debug, Clone)]
pub struct ValidatedPush {
    pub branch: String,
    /// First commit of the push; the rest are ignored
    pub commit: Commit,
}

/// Check content type, commit list and branch, in that order.
///
/// Only the first commit is decoded, and only once the branch is allowed.
pub fn validate_push(content_type: Option<&str>, body: &[u8]) -> Result<ValidatedPush, PushError> {
    let mime = media_type(content_type.unwrap_or(DEFAULT_CONTENT_TYPE));
    if !mime.eq_ignore_ascii_case("application/json") {
        return Err(Rejection::unsupported_media_type(mime).into());
    }

    let event: PushEvent = serde_json::from_slice(body)?;

    let branch = event.branch().to_string();
    let first = match event.commits.into_iter().next() {
        Some(first) => first,
        None => return Err(Rejection::no_commits().into()),
    };

    if !is_allowed_branch(&branch) {
        return Err(Rejection::invalid_branch().into());
    }

    let commit: Commit = serde_json::from_value(first)?;

    Ok(ValidatedPush { branch, commit })
}

pub fn is_allowed_branch(branch: &str) -> bool {
    ALLOWED_BRANCH_REGEX.is_match(branch)
}

/// Strip parameters such as `; charset=utf-8`
fn media_type(content_type: &str) -> &str {
    content_type.split(';').next().unwrap_or_default().trim()
}
