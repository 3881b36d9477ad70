//! Idempotent re-posting guard keyed by (file path, diff position).
//!
//! Prior comments are loaded once per run, filtered down to the bot's own
//! (recognized by [`BOT_MARKER`] in the body), and indexed by their exact
//! anchor. A candidate comment whose anchor is already occupied is dropped
//! regardless of body text: idempotence wins over freshness.

use std::collections::HashMap;

use tracing::debug;

use crate::github::types::ExistingComment;
use crate::review::PositionedComment;

/// Substring identifying the bot's own prior comments.
pub const BOT_MARKER: &str = "AI Review";

/// Membership index over the bot's previously posted comments.
///
/// Read-only once built; the gate only tests membership.
#[derive(Debug, Default, Clone)]
pub struct ExistingCommentIndex {
    by_anchor: HashMap<String, String>,
}

impl ExistingCommentIndex {
    /// Builds the index from previously fetched review comments.
    ///
    /// Only comments carrying [`BOT_MARKER`] participate; comments whose
    /// position the provider has outdated (`position: None`) are skipped.
    pub fn from_comments(comments: &[ExistingComment]) -> Self {
        let by_anchor = comments
            .iter()
            .filter(|c| c.body.contains(BOT_MARKER))
            .filter_map(|c| {
                c.position
                    .map(|p| (composite_key(&c.path, p as u32), c.body.clone()))
            })
            .collect();
        Self { by_anchor }
    }

    /// Whether a comment already exists at this exact anchor.
    pub fn contains(&self, path: &str, position: u32) -> bool {
        self.by_anchor.contains_key(&composite_key(path, position))
    }

    pub fn len(&self) -> usize {
        self.by_anchor.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_anchor.is_empty()
    }
}

fn composite_key(path: &str, position: u32) -> String {
    format!("{path}:{position}")
}

/// Drops candidates whose (path, position) anchor is already occupied.
pub fn filter_new(
    index: &ExistingCommentIndex,
    candidates: Vec<PositionedComment>,
) -> Vec<PositionedComment> {
    let before = candidates.len();
    let kept: Vec<PositionedComment> = candidates
        .into_iter()
        .filter(|c| !index.contains(&c.path, c.position))
        .collect();
    if kept.len() < before {
        debug!("deduplication dropped {} comment(s)", before - kept.len());
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing(path: &str, position: Option<u64>, body: &str) -> ExistingComment {
        ExistingComment {
            path: path.to_string(),
            position,
            body: body.to_string(),
        }
    }

    fn candidate(path: &str, position: u32, body: &str) -> PositionedComment {
        PositionedComment {
            path: path.to_string(),
            position,
            body: body.to_string(),
        }
    }

    #[test]
    fn occupied_anchor_is_suppressed_regardless_of_text() {
        let index = ExistingCommentIndex::from_comments(&[existing(
            "src/app.py",
            Some(4),
            "💡 **AI Review:** old text",
        )]);
        let kept = filter_new(
            &index,
            vec![
                candidate("src/app.py", 4, "completely different text"),
                candidate("src/app.py", 9, "new anchor"),
            ],
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].position, 9);
    }

    #[test]
    fn foreign_comments_do_not_occupy_anchors() {
        let index = ExistingCommentIndex::from_comments(&[existing(
            "src/app.py",
            Some(4),
            "a human wrote this",
        )]);
        assert!(index.is_empty());
        assert!(!index.contains("src/app.py", 4));
    }

    #[test]
    fn outdated_comments_are_skipped() {
        let index = ExistingCommentIndex::from_comments(&[existing(
            "src/app.py",
            None,
            "💡 **AI Review:** outdated",
        )]);
        assert_eq!(index.len(), 0);
    }
}
