//! Provider-agnostic data model for pull requests and review comments.
//!
//! These types are the "normalized output" of the provider layer and are
//! consumed by the review pipeline, the deduplication index, and the
//! publisher.

use serde::{Deserialize, Serialize};

/// A unique reference to a pull request.
///
/// * `repo`   – "owner/name", as provided by `GITHUB_REPOSITORY`;
/// * `number` – the PR number from the workflow event payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestId {
    pub repo: String,
    pub number: u64,
}

/// High-level metadata for a pull request.
///
/// `head_sha` binds inline comments to the commit they were computed for.
#[derive(Debug, Clone)]
pub struct PullRequestMeta {
    pub title: String,
    pub state: String,
    pub head_sha: String,
    pub web_url: String,
}

/// One changed file of a pull request.
///
/// `patch` is the unified-diff text as returned by the changed-files
/// listing; it is `None` for binary or otherwise patch-less entries.
#[derive(Debug, Clone)]
pub struct ChangedFile {
    pub path: String,
    pub status: String,
    pub patch: Option<String>,
}

/// A review comment already present on the pull request.
///
/// `position` is `None` when the provider has outdated the comment (its
/// anchor no longer maps onto the current diff).
#[derive(Debug, Clone)]
pub struct ExistingComment {
    pub path: String,
    pub position: Option<u64>,
    pub body: String,
}
