//! Tolerant extraction of typed annotations from raw model output.
//!
//! Models are asked to emit `lineNumber: comment` pairs followed by a
//! `Summary:` section, but the output is unreliable: labels vary ("Line 3:",
//! "L3 -", "3."), casing differs, and stray prose appears between comments.
//! The extractor scans the whole text with one permissive pattern and keeps
//! only what is recognizably an ordinal-prefixed comment line — fewer,
//! correct annotations beat guessed ones, so non-matching lines are dropped
//! rather than treated as continuations.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::LazyLock;

use regex::Regex;

/// Literal marker separating inline comments from the run summary.
pub const SUMMARY_MARKER: &str = "Summary:";

/// Marker inserted between merged comments that share an ordinal.
pub const ADDITIONALLY_MARKER: &str = "Additionally:";

/// Ordinal-prefixed comment line: optional list bullets, an optional label
/// word ("Line", "Line number", "L"), optional separators, a decimal integer,
/// a separator, then free text to end of line.
static ANNOTATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[\s*\-]*(?:line(?:\s*(?:number|no\.?))?|l)?[\s#]*(\d+)\s*[:.\-)]\s*(.*)$")
        .expect("annotation pattern is valid")
});

/// Splits a raw model response into its comments part and summary part.
///
/// The split happens at the first occurrence of [`SUMMARY_MARKER`]; when the
/// marker is absent the entire blob is treated as comments and `None` is
/// returned for the summary.
pub fn split_response(raw: &str) -> (&str, Option<&str>) {
    match raw.split_once(SUMMARY_MARKER) {
        Some((comments, summary)) => (comments, Some(summary.trim())),
        None => (raw, None),
    }
}

/// Extracts an ordered mapping from added-line ordinal to comment text.
///
/// Multiple matches for the same ordinal are concatenated in encounter order
/// under [`ADDITIONALLY_MARKER`], never overwritten. Empty comment bodies are
/// discarded. Text with no recognizable marker yields an empty map; the
/// caller is expected to fall back to a per-file summary.
pub fn extract_annotations(text: &str) -> BTreeMap<u32, String> {
    let mut out: BTreeMap<u32, String> = BTreeMap::new();

    for cap in ANNOTATION_RE.captures_iter(text) {
        let Ok(ordinal) = cap[1].parse::<u32>() else {
            continue;
        };
        let body = cap[2].trim();
        if body.is_empty() {
            continue;
        }

        match out.entry(ordinal) {
            Entry::Occupied(mut e) => {
                let merged = e.get_mut();
                merged.push_str("\n\n");
                merged.push_str(ADDITIONALLY_MARKER);
                merged.push(' ');
                merged.push_str(body);
            }
            Entry::Vacant(v) => {
                v.insert(body.to_string());
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_plain_ordinal_comments() {
        let m = extract_annotations("3: fix null check\n7: avoid O(n^2) loop");
        assert_eq!(m.len(), 2);
        assert_eq!(m[&3], "fix null check");
        assert_eq!(m[&7], "avoid O(n^2) loop");
    }

    #[test]
    fn accepts_label_variants_case_insensitively() {
        let m = extract_annotations(
            "Line 2: use a constant\nL4 - extract a helper\nLINE NUMBER 6. rename this",
        );
        assert_eq!(m.len(), 3);
        assert_eq!(m[&2], "use a constant");
        assert_eq!(m[&4], "extract a helper");
        assert_eq!(m[&6], "rename this");
    }

    #[test]
    fn tolerates_list_bullets() {
        let m = extract_annotations("- 9: check the return value\n* Line 11: close the handle");
        assert_eq!(m.len(), 2);
        assert_eq!(m[&9], "check the return value");
        assert_eq!(m[&11], "close the handle");
    }

    #[test]
    fn merges_repeated_ordinals_in_encounter_order() {
        let m = extract_annotations("5: first issue\n5: second issue");
        assert_eq!(m.len(), 1);
        assert_eq!(m[&5], "first issue\n\nAdditionally: second issue");
    }

    #[test]
    fn drops_empty_bodies_and_unmatched_prose() {
        let m = extract_annotations("Here are my thoughts on the change.\n12:   \nNothing else.");
        assert!(m.is_empty());
    }

    #[test]
    fn free_form_paragraph_yields_empty_map() {
        assert!(extract_annotations("Looks good to me overall!").is_empty());
    }

    #[test]
    fn splits_on_summary_marker() {
        let (comments, summary) = split_response("1: tighten bounds\n\nSummary:\nSolid change.");
        assert_eq!(comments.trim(), "1: tighten bounds");
        assert_eq!(summary, Some("Solid change."));
    }

    #[test]
    fn missing_marker_treats_whole_blob_as_comments() {
        let (comments, summary) = split_response("1: tighten bounds");
        assert_eq!(comments, "1: tighten bounds");
        assert_eq!(summary, None);
    }
}
