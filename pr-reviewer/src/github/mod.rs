//! GitHub provider (REST v3) for PR metadata, changed files, and comments.
//!
//! Endpoints used:
//! - GET  /repos/{repo}/pulls/{number}
//! - GET  /repos/{repo}/pulls/{number}/files     (field "patch" is unified diff)
//! - GET  /repos/{repo}/pulls/{number}/comments
//! - POST /repos/{repo}/pulls/{number}/comments  (inline, anchored by position)
//! - POST /repos/{repo}/issues/{number}/comments (general summary note)
//!
//! The files listing is paginated; we follow RFC-5988 `Link` headers until
//! no `rel="next"` target remains.

pub mod types;
pub use types::*;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::errors::{ConfigError, ReviewResult};

/// Thin GitHub REST client bound to one token and API base.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    base_api: String, // e.g. "https://api.github.com"
    token: String,
}

impl GitHubClient {
    /// Constructs a client, validating the token and API base up front.
    pub fn new(base_api: String, token: String) -> ReviewResult<Self> {
        if token.trim().is_empty() {
            return Err(ConfigError::MissingToken.into());
        }
        if !(base_api.starts_with("http://") || base_api.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(base_api).into());
        }
        let http = Client::builder().user_agent("pr-review-bot/0.1").build()?;
        Ok(Self {
            http,
            base_api: base_api.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Fetches PR metadata; includes the head SHA used to anchor comments.
    pub async fn get_meta(&self, id: &PullRequestId) -> ReviewResult<PullRequestMeta> {
        let url = format!("{}/repos/{}/pulls/{}", self.base_api, id.repo, id.number);
        let resp: GitHubPr = self
            .http
            .get(url)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github.v3+json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(PullRequestMeta {
            title: resp.title,
            state: resp.state,
            head_sha: resp.head.sha,
            web_url: resp.html_url,
        })
    }

    /// Lists all changed files with their unified-diff patches, following
    /// `Link` pagination.
    pub async fn list_changed_files(&self, id: &PullRequestId) -> ReviewResult<Vec<ChangedFile>> {
        let mut url = format!(
            "{}/repos/{}/pulls/{}/files?per_page=100",
            self.base_api, id.repo, id.number
        );
        let mut out = Vec::new();

        loop {
            let resp = self
                .http
                .get(&url)
                .header("Authorization", format!("token {}", self.token))
                .header("Accept", "application/vnd.github.v3+json")
                .send()
                .await?
                .error_for_status()?;

            let next = resp
                .headers()
                .get(reqwest::header::LINK)
                .and_then(|v| v.to_str().ok())
                .and_then(next_link);

            let page: Vec<GitHubPrFile> = resp.json().await?;
            out.extend(page.into_iter().map(|f| ChangedFile {
                path: f.filename,
                status: f.status,
                patch: f.patch,
            }));

            match next {
                Some(n) => {
                    debug!("fetching next page of changed files: {n}");
                    url = n;
                }
                None => break,
            }
        }

        Ok(out)
    }

    /// Lists existing review comments on the pull request.
    pub async fn list_review_comments(
        &self,
        id: &PullRequestId,
    ) -> ReviewResult<Vec<ExistingComment>> {
        let url = format!(
            "{}/repos/{}/pulls/{}/comments?per_page=100",
            self.base_api, id.repo, id.number
        );
        let raw: Vec<GitHubReviewComment> = self
            .http
            .get(url)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github.v3+json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(raw
            .into_iter()
            .map(|c| ExistingComment {
                path: c.path,
                position: c.position,
                body: c.body,
            })
            .collect())
    }

    /// Creates an inline review comment anchored by diff position.
    pub async fn create_review_comment(
        &self,
        id: &PullRequestId,
        commit_id: &str,
        path: &str,
        position: u32,
        body: &str,
    ) -> ReviewResult<()> {
        #[derive(serde::Serialize)]
        struct Req<'a> {
            body: &'a str,
            commit_id: &'a str,
            path: &'a str,
            position: u32,
        }

        let url = format!(
            "{}/repos/{}/pulls/{}/comments",
            self.base_api, id.repo, id.number
        );
        self.http
            .post(url)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github.v3+json")
            .json(&Req {
                body,
                commit_id,
                path,
                position,
            })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Creates a general (non-inline) comment on the pull request.
    pub async fn create_issue_comment(&self, id: &PullRequestId, body: &str) -> ReviewResult<()> {
        #[derive(serde::Serialize)]
        struct Req<'a> {
            body: &'a str,
        }

        let url = format!(
            "{}/repos/{}/issues/{}/comments",
            self.base_api, id.repo, id.number
        );
        self.http
            .post(url)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github.v3+json")
            .json(&Req { body })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Extracts the `rel="next"` target from an RFC-5988 `Link` header.
fn next_link(link_header: &str) -> Option<String> {
    for link in link_header.split(',') {
        let mut parts = link.split(';');
        let url = parts.next()?.trim();
        let is_next = parts.any(|p| p.trim() == r#"rel="next""#);
        if is_next {
            return Some(
                url.trim_start_matches('<')
                    .trim_end_matches('>')
                    .to_string(),
            );
        }
    }
    None
}

/// --- GitHub response shapes (subset of fields we actually use) ---

#[derive(Debug, Deserialize)]
struct GitHubPr {
    title: String,
    state: String,
    html_url: String,
    head: GitHubRef,
}

#[derive(Debug, Deserialize)]
struct GitHubRef {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct GitHubPrFile {
    filename: String,
    status: String,
    #[serde(default)]
    patch: Option<String>, // unified diff; None for binary/too large
}

#[derive(Debug, Deserialize)]
struct GitHubReviewComment {
    path: String,
    #[serde(default)]
    position: Option<u64>,
    body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_link_finds_rel_next() {
        let header = r#"<https://api.github.com/repos/o/r/pulls/1/files?page=2>; rel="next", <https://api.github.com/repos/o/r/pulls/1/files?page=4>; rel="last""#;
        assert_eq!(
            next_link(header).as_deref(),
            Some("https://api.github.com/repos/o/r/pulls/1/files?page=2")
        );
    }

    #[test]
    fn next_link_returns_none_without_next() {
        let header = r#"<https://api.github.com/x?page=1>; rel="prev""#;
        assert_eq!(next_link(header), None);
        assert_eq!(next_link(""), None);
    }

    #[test]
    fn client_rejects_empty_token_and_bad_base() {
        assert!(GitHubClient::new("https://api.github.com".into(), "".into()).is_err());
        assert!(GitHubClient::new("api.github.com".into(), "t".into()).is_err());
        assert!(GitHubClient::new("https://api.github.com".into(), "t".into()).is_ok());
    }
}
