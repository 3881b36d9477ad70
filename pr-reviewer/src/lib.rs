//! Public entry for the PR review pipeline.
//!
//! Single high-level function to run the whole pipeline for a pull request.
//!
//! 1) **Step 1 — Provider I/O**
//!    - Fetch PR metadata to get `head_sha`
//!    - Fetch the changed-files listing (unified diffs) with pagination
//!    - Fetch prior review comments and build the deduplication index
//!
//! 2) **Step 2 — Config resolution**
//!    - Merge the optional override document onto defaults
//!    - Compile file filters and prompt instruction fragments
//!
//! 3) **Step 3 — Per-file review (strictly sequential)**
//!    - Filter files, detect language, build the prompt, call the model
//!    - Join annotations onto diff anchors, classify, render, dedup
//!    - A file's failure is logged into its own summary and never aborts
//!      the remaining files
//!
//! Publishing (step 4) is a separate call in [`publish`] so callers can
//! inspect outcomes, or dry-run, before anything goes out.
//!
//! The pipeline uses `tracing` for debug logging and avoids `async-trait`
//! and heap trait objects; collaborator calls are plain `async fn`s awaited
//! one at a time.

pub mod classify;
pub mod config;
pub mod dedup;
pub mod diff;
pub mod errors;
pub mod extract;
pub mod github;
pub mod lang;
pub mod publish;
pub mod review;

use std::time::Instant;

use llm_service::OpenAiService;
use tracing::{debug, error, info, warn};

use config::ConfigResolver;
use dedup::ExistingCommentIndex;
use errors::ReviewResult;
use github::{GitHubClient, PullRequestId, PullRequestMeta};
use review::ReviewOutcome;

/// Final output of steps 1–3 (input for publishing).
#[derive(Debug, Clone)]
pub struct ReviewRun {
    /// PR metadata; `head_sha` anchors every posted comment.
    pub meta: PullRequestMeta,
    /// One outcome per reviewed file, in input file order.
    pub outcomes: Vec<ReviewOutcome>,
    /// Styling resolved during the run, reused by the publisher.
    pub styling: config::model::CommentStyling,
}

/// Run steps **1–3** for a single pull request and return the outcomes.
///
/// # Logging
/// Emits `DEBUG` logs per sub-stage:
/// - `step1: meta/files/comments fetch`
/// - `step2: config resolution`
/// - `step3: per-file review (files=N)`
///
/// # Errors
/// Only step 1's metadata and file listing are fatal — without them there is
/// nothing to review. Everything downstream is file-scoped and degrades into
/// the affected file's summary.
pub async fn run_review(
    client: &GitHubClient,
    id: &PullRequestId,
    llm: &OpenAiService,
) -> ReviewResult<ReviewRun> {
    // ---------------------------
    // Step 1: provider I/O
    // ---------------------------
    let t0 = Instant::now();
    debug!("step1: fetch meta to obtain head_sha");
    let meta = client.get_meta(id).await?;
    debug!("step1: meta ok, head_sha={}", meta.head_sha);

    debug!("step1: fetch changed files");
    let files = client.list_changed_files(id).await?;
    debug!("step1: files fetched, count={}", files.len());

    debug!("step1: fetch existing review comments");
    let existing = match client.list_review_comments(id).await {
        Ok(comments) => ExistingCommentIndex::from_comments(&comments),
        Err(e) => {
            // Without the index every anchor looks new; that only risks a
            // duplicate, not a wrong comment.
            warn!("step1: failed to fetch existing comments: {e}");
            ExistingCommentIndex::default()
        }
    };
    debug!(
        "step1: done in {} ms (files={}, prior bot comments={})",
        t0.elapsed().as_millis(),
        files.len(),
        existing.len()
    );

    // ---------------------------
    // Step 2: config resolution
    // ---------------------------
    let cfg = ConfigResolver::resolve();
    debug!(
        "step2: config resolved (mode={:?}, threshold={:?})",
        cfg.config().review_mode,
        cfg.config().comment_threshold
    );

    // ---------------------------------
    // Step 3: per-file review, in order
    // ---------------------------------
    let t3 = Instant::now();
    let mut outcomes: Vec<ReviewOutcome> = Vec::new();

    for file in &files {
        let Some(patch) = file.patch.as_deref() else {
            info!("skipping {} (no patch)", file.path);
            continue;
        };
        if !cfg.should_review_file(&file.path) {
            info!("skipping {} (filtered out)", file.path);
            continue;
        }

        let language = lang::language_for_path(&file.path);
        let prompt = review::prompt::build_review_prompt(&file.path, language, patch, &cfg);

        let t_one = Instant::now();
        let outcome = match llm.generate(&prompt, None).await {
            Ok(raw) => review::process_model_response(&cfg, &existing, &file.path, patch, &raw),
            Err(e) => {
                error!("step3: review failed for {}: {e}", file.path);
                review::failed_outcome(&file.path, patch, &e.to_string())
            }
        };
        debug!(
            "step3: {} reviewed, comments={} ({} ms)",
            file.path,
            outcome.comments.len(),
            t_one.elapsed().as_millis()
        );
        outcomes.push(outcome);
    }

    let total_comments: usize = outcomes.iter().map(|o| o.comments.len()).sum();
    info!(
        "step3: done files={} outcomes={} comments={} in {} ms",
        files.len(),
        outcomes.len(),
        total_comments,
        t3.elapsed().as_millis()
    );

    Ok(ReviewRun {
        meta,
        outcomes,
        styling: cfg.config().comment_styling.clone(),
    })
}

// -----------------------------------------------------------------------------
// Convenience re-exports for downstream users
// -----------------------------------------------------------------------------

pub use config::ConfigResolver as ReviewerConfigResolver;
pub use github::GitHubClient as ReviewerGitHubClient;
pub use publish::{PublishConfig, PublishReport};
pub use review::{PositionedComment, ReviewOutcome as ReviewerOutcome};
