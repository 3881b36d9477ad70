//! Publisher: posts surviving inline comments and the aggregated summary.
//!
//! - Inline comments are anchored by (path, diff position) at the PR's head
//!   commit and posted strictly one at a time; a failed post is logged and
//!   skipped, never fatal.
//! - One general summary note is posted afterwards with per-file sections,
//!   a timestamp footer, and an optional about-section/signature.
//! - Dry-run: compute and log actions without calling the API.

use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::config::model::CommentStyling;
use crate::errors::ReviewResult;
use crate::github::{GitHubClient, PullRequestId};
use crate::review::ReviewOutcome;

/// Configuration for the publishing step.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    /// If true, do not actually send anything; just log what would be posted.
    pub dry_run: bool,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            dry_run: env_bool("PR_REVIEWER_DRY_RUN", false),
        }
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

/// Result of one publishing run.
#[derive(Debug, Clone, Default)]
pub struct PublishReport {
    /// Inline comments successfully posted (or counted in dry-run).
    pub posted_inline: usize,
    /// Inline comments that failed to post and were skipped.
    pub failed_inline: usize,
    /// Whether the summary note went out (or would have, in dry-run).
    pub summary_posted: bool,
}

/// Posts all surviving comments and the summary note for a run.
pub async fn publish(
    client: &GitHubClient,
    id: &PullRequestId,
    head_sha: &str,
    outcomes: &[ReviewOutcome],
    styling: &CommentStyling,
    cfg: &PublishConfig,
) -> ReviewResult<PublishReport> {
    let mut report = PublishReport::default();

    for outcome in outcomes {
        for comment in &outcome.comments {
            if cfg.dry_run {
                info!(
                    "dry-run: would post comment at {}:{}",
                    comment.path, comment.position
                );
                report.posted_inline += 1;
                continue;
            }
            match client
                .create_review_comment(id, head_sha, &comment.path, comment.position, &comment.body)
                .await
            {
                Ok(()) => {
                    info!("posted comment at {}:{}", comment.path, comment.position);
                    report.posted_inline += 1;
                }
                Err(e) => {
                    // One failed post never suppresses the rest of the run.
                    error!(
                        "failed to post comment at {}:{}: {e}",
                        comment.path, comment.position
                    );
                    report.failed_inline += 1;
                }
            }
        }
    }

    let combined = combined_summary(outcomes);
    let note = render_summary_note(styling, &combined, report.posted_inline, Utc::now());
    if cfg.dry_run {
        info!("dry-run: would post summary note ({} chars)", note.len());
        report.summary_posted = true;
    } else {
        client.create_issue_comment(id, &note).await?;
        report.summary_posted = true;
    }

    info!(
        "publish done: posted={} failed={} summary={}",
        report.posted_inline, report.failed_inline, report.summary_posted
    );
    Ok(report)
}

/// Joins the per-file summaries into one document, one section per file.
pub fn combined_summary(outcomes: &[ReviewOutcome]) -> String {
    outcomes
        .iter()
        .map(|o| format!("### {}\n{}", o.path, o.summary))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Renders the aggregated summary note.
pub fn render_summary_note(
    styling: &CommentStyling,
    summary_text: &str,
    comment_count: usize,
    now: DateTime<Utc>,
) -> String {
    let timestamp = now.format("%Y-%m-%d %H:%M:%S UTC");
    let mut body = format!(
        "# 🔍 AI Code Review Summary\n\n{summary_text}\n\n---\n*Generated at {timestamp} • {comment_count} inline comments added*\n"
    );

    let about = "This automated review provides suggestions to improve code quality and maintainability.\nSuggestions are recommendations only - use your judgment about which to implement.\n\nTo customize this review, add a `.github/pr_review_config.yml` file to your repository.";
    if styling.details_section {
        body.push_str(&format!(
            "\n<details>\n<summary>ℹ️ About this review</summary>\n{about}\n</details>\n"
        ));
    } else {
        body.push_str(&format!("\n{about}\n"));
    }

    if let Some(signature) = &styling.signature {
        body.push_str(&format!("\n{signature}\n"));
    }

    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn outcome(path: &str, summary: &str) -> ReviewOutcome {
        ReviewOutcome {
            path: path.to_string(),
            patch: String::new(),
            comments: Vec::new(),
            summary: summary.to_string(),
        }
    }

    #[test]
    fn combined_summary_has_one_section_per_file() {
        let s = combined_summary(&[outcome("a.py", "Fine."), outcome("b.js", "Risky.")]);
        assert!(s.contains("### a.py\nFine."));
        assert!(s.contains("### b.js\nRisky."));
    }

    #[test]
    fn summary_note_carries_count_timestamp_and_details() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let note = render_summary_note(&CommentStyling::default(), "body", 3, now);
        assert!(note.contains("3 inline comments added"));
        assert!(note.contains("2025-06-01 12:00:00 UTC"));
        assert!(note.contains("<details>"));
    }

    #[test]
    fn signature_and_details_toggle() {
        let styling = CommentStyling {
            details_section: false,
            signature: Some("— review bot".to_string()),
            ..CommentStyling::default()
        };
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let note = render_summary_note(&styling, "body", 0, now);
        assert!(!note.contains("<details>"));
        assert!(note.ends_with("— review bot\n"));
    }
}
