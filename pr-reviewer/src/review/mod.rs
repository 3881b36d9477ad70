//! Per-file review orchestration.
//!
//! Joins the model's annotations onto the patch's anchored lines by
//! added-line ordinal, classifies and renders each comment, and filters the
//! result through the deduplication gate. Everything in this module is a
//! pure transformation over its inputs; the model call happens upstream.

pub mod prompt;

use tracing::debug;

use crate::classify;
use crate::config::ConfigResolver;
use crate::dedup::{self, ExistingCommentIndex};
use crate::diff;
use crate::extract;

/// A rendered comment addressed the way the review API expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedComment {
    pub path: String,
    /// 1-based offset from the most recent hunk header.
    pub position: u32,
    pub body: String,
}

/// Final per-file artifact handed to the publisher.
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    pub path: String,
    pub patch: String,
    /// Comments that survived the deduplication gate, ordered by ordinal.
    pub comments: Vec<PositionedComment>,
    pub summary: String,
}

/// Turns one raw model response into a [`ReviewOutcome`].
///
/// Extraction failures degrade to an empty comment set; a missing, empty, or
/// unhelpful summary is replaced by the generic per-file phrase.
pub fn process_model_response(
    cfg: &ConfigResolver,
    existing: &ExistingCommentIndex,
    path: &str,
    patch: &str,
    raw_response: &str,
) -> ReviewOutcome {
    let (comments_text, summary) = extract::split_response(raw_response);
    let summary = normalize_summary(path, summary);

    let annotations = extract::extract_annotations(comments_text);
    let anchors = diff::index_patch(patch);
    debug!(
        "{path}: {} annotation(s) against {} added line(s)",
        annotations.len(),
        anchors.len()
    );

    let styling = &cfg.config().comment_styling;
    let mut candidates = Vec::new();
    for anchor in &anchors {
        let Some(text) = annotations.get(&anchor.ordinal) else {
            continue;
        };
        if cfg.is_ignored_line(&anchor.content) {
            debug!("{path}: skipping ignored line at ordinal {}", anchor.ordinal);
            continue;
        }
        let text = classify::strip_boilerplate(text);
        let category = classify::classify(text);
        candidates.push(PositionedComment {
            path: path.to_string(),
            position: anchor.position,
            body: classify::render_comment(styling, category, text, &anchor.content),
        });
    }

    let comments = dedup::filter_new(existing, candidates);

    ReviewOutcome {
        path: path.to_string(),
        patch: patch.to_string(),
        comments,
        summary,
    }
}

/// Builds the outcome for a file whose review failed entirely.
///
/// Failure is file-scoped: the error lands in this file's summary and
/// processing of other files continues.
pub fn failed_outcome(path: &str, patch: &str, error: &str) -> ReviewOutcome {
    ReviewOutcome {
        path: path.to_string(),
        patch: patch.to_string(),
        comments: Vec::new(),
        summary: format!("❌ Error during review: {error}"),
    }
}

/// Replaces a missing or unhelpful summary with the generic per-file phrase.
fn normalize_summary(path: &str, summary: Option<&str>) -> String {
    match summary {
        Some(s) if !s.is_empty() && !s.to_lowercase().starts_with("no summary") => s.to_string(),
        _ => fallback_summary(path),
    }
}

fn fallback_summary(path: &str) -> String {
    format!(
        "**{path}** appears to have minor changes that don't require significant feedback. \
         The code looks generally well-structured and follows best practices."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReviewConfig;
    use crate::github::types::ExistingComment;

    const PATCH: &str = "\
@@ -1,3 +1,4 @@
 import sys
+import io
 def main():
+    run()
@@ -10,2 +11,4 @@
 def run():
-    x = 1
+    x = compute()
+    y = x + 1  # TODO drop
+    print(y)";

    fn resolver() -> ConfigResolver {
        ConfigResolver::new(ReviewConfig::default())
    }

    #[test]
    fn joins_annotations_onto_hunk_relative_positions() {
        let raw = "1: unused import?\n5: avoid printing directly\n\nSummary:\nSmall cleanup.";
        let outcome = process_model_response(
            &resolver(),
            &ExistingCommentIndex::default(),
            "src/app.py",
            PATCH,
            raw,
        );

        // Ordinal 1 is position 2 of hunk 1; ordinal 5 restarts in hunk 2.
        assert_eq!(outcome.comments.len(), 2);
        assert_eq!(outcome.comments[0].position, 2);
        assert_eq!(outcome.comments[1].position, 5);
        assert_eq!(outcome.summary, "Small cleanup.");
        assert!(outcome.comments[0].body.contains("unused import?"));
    }

    #[test]
    fn ignored_line_markers_suppress_comments() {
        // Ordinal 4 targets the line carrying a TODO marker.
        let raw = "4: magic number";
        let outcome = process_model_response(
            &resolver(),
            &ExistingCommentIndex::default(),
            "src/app.py",
            PATCH,
            raw,
        );
        assert!(outcome.comments.is_empty());
    }

    #[test]
    fn existing_anchor_is_deduplicated() {
        let existing = ExistingCommentIndex::from_comments(&[ExistingComment {
            path: "src/app.py".to_string(),
            position: Some(2),
            body: "💡 **AI Review:** older remark".to_string(),
        }]);
        let outcome =
            process_model_response(&resolver(), &existing, "src/app.py", PATCH, "1: repeat");
        assert!(outcome.comments.is_empty());
    }

    #[test]
    fn missing_summary_falls_back_to_generic_phrase() {
        let outcome = process_model_response(
            &resolver(),
            &ExistingCommentIndex::default(),
            "src/app.py",
            PATCH,
            "free-form prose with no markers at all",
        );
        assert!(outcome.comments.is_empty());
        assert!(outcome.summary.starts_with("**src/app.py**"));
    }

    #[test]
    fn unhelpful_summary_falls_back_too() {
        let outcome = process_model_response(
            &resolver(),
            &ExistingCommentIndex::default(),
            "src/app.py",
            PATCH,
            "Summary:\nNo summary provided.",
        );
        assert!(outcome.summary.starts_with("**src/app.py**"));
    }
}
