//! Dual-counter indexer over unified-diff patch text.
//!
//! A review comment needs two independent addresses for the same added line:
//! - the **added-line ordinal** — the Nth `+` line across the whole patch,
//!   never reset; this is how the model is told to address lines;
//! - the **diff position** — the offset from the most recent `@@` hunk
//!   header, reset at every hunk; this is the anchor the review API expects.
//!
//! Both counters are produced by one walk over the same lines so they can be
//! joined by line identity downstream.

/// One added line of a patch with both of its addresses and its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchoredLine {
    /// 1-based count of added lines across the entire patch.
    pub ordinal: u32,
    /// 1-based offset from the current hunk header.
    pub position: u32,
    /// Line content without the leading `+` marker.
    pub content: String,
}

/// Walks a unified-diff text and returns an entry per added line.
///
/// Rules:
/// - `@@` hunk headers reset the position counter and are not content;
/// - lines before the first hunk header (`---`/`+++` file headers, any other
///   prelude) count toward neither counter;
/// - `+++ ` is the to-file header marker, never an added line;
/// - every other in-hunk line (removed, context, `\ No newline` markers)
///   advances the position counter only.
///
/// A patch with zero hunks yields an empty table. Input without a trailing
/// newline needs no special handling.
pub fn index_patch(patch: &str) -> Vec<AnchoredLine> {
    let mut out = Vec::new();
    let mut ordinal = 0u32;
    let mut position = 0u32;
    let mut in_hunk = false;

    for line in patch.lines() {
        if line.starts_with("@@") {
            position = 0;
            in_hunk = true;
            continue;
        }
        if !in_hunk {
            // Skip prelude (file headers, index lines) until the first '@@'.
            continue;
        }

        position += 1;
        if let Some(rest) = line.strip_prefix('+') {
            if !line.starts_with("+++ ") {
                ordinal += 1;
                out.push(AnchoredLine {
                    ordinal,
                    position,
                    content: rest.to_string(),
                });
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_HUNKS: &str = "\
@@ -1,3 +1,4 @@
 use std::fmt;
+use std::io;
 fn main() {
+    run();
@@ -10,2 +11,4 @@
 fn run() {
-    let x = 1;
+    let x = compute();
+    let y = x + 1;
+    print(y);
 }";

    #[test]
    fn ordinals_are_contiguous_and_count_added_lines() {
        let anchors = index_patch(TWO_HUNKS);
        let added = TWO_HUNKS
            .lines()
            .filter(|l| l.starts_with('+') && !l.starts_with("+++ "))
            .count();
        assert_eq!(anchors.len(), added);
        for (i, a) in anchors.iter().enumerate() {
            assert_eq!(a.ordinal, i as u32 + 1);
        }
    }

    #[test]
    fn position_resets_at_each_hunk_and_increases_within() {
        let anchors = index_patch(TWO_HUNKS);
        // Hunk 1: added lines at positions 2 and 4.
        assert_eq!(anchors[0].position, 2);
        assert_eq!(anchors[1].position, 4);
        // Hunk 2 restarts at 1 regardless of hunk 1's length.
        assert_eq!(anchors[2].position, 3);
        assert_eq!(anchors[3].position, 4);
        assert_eq!(anchors[4].position, 5);

        let mut last_hunk_positions = anchors[2..].iter().map(|a| a.position);
        let mut prev = last_hunk_positions.next().unwrap();
        for p in last_hunk_positions {
            assert!(p > prev);
            prev = p;
        }
    }

    #[test]
    fn two_hunk_patch_yields_ordinals_one_to_five() {
        let ordinals: Vec<u32> = index_patch(TWO_HUNKS).iter().map(|a| a.ordinal).collect();
        assert_eq!(ordinals, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn file_headers_count_toward_neither_counter() {
        let patch = "\
--- a/src/lib.rs
+++ b/src/lib.rs
@@ -1,1 +1,2 @@
 line
+added";
        let anchors = index_patch(patch);
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].ordinal, 1);
        assert_eq!(anchors[0].position, 2);
        assert_eq!(anchors[0].content, "added");
    }

    #[test]
    fn zero_hunks_yields_empty_table() {
        assert!(index_patch("").is_empty());
        assert!(index_patch("Binary files a/x and b/x differ").is_empty());
    }

    #[test]
    fn missing_trailing_newline_is_fine() {
        let anchors = index_patch("@@ -1 +1 @@\n+only");
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].content, "only");
    }
}
