//! Review prompt assembly.
//!
//! Keep the prompt compact; the patch is included verbatim and the model is
//! told to address added lines by their ordinal across the whole diff.

use crate::config::ConfigResolver;
use crate::extract::SUMMARY_MARKER;

/// Builds the review prompt for one changed file.
pub fn build_review_prompt(
    path: &str,
    language: &str,
    patch: &str,
    cfg: &ConfigResolver,
) -> String {
    let additions = cfg.prompt_additions();
    let summary_length = cfg.config().summary_length;

    let mut s = String::new();
    s.push_str(&format!(
        "You are an expert code reviewer. Review the code diff for `{path}` (language: {language}):\n\n"
    ));
    s.push_str(patch);
    s.push_str("\n\nINSTRUCTIONS:\n");
    s.push_str(&format!("1. Review focus: {}\n", additions.focus));
    s.push_str(&format!("2. Comment threshold: {}\n", additions.threshold));
    s.push_str(&format!("3. Review mode: {}\n", additions.mode));
    if !additions.language_specific.is_empty() {
        s.push_str(&format!(
            "4. Language-specific guidance:{}\n",
            additions.language_specific
        ));
    }
    s.push_str("\nInline comments:\n");
    s.push_str("- Only comment on added lines that need improvement\n");
    s.push_str("- Count added lines from 1 in the order they appear across the whole diff\n");
    s.push_str("- Format each comment as `lineNumber: comment text`\n");
    s.push_str("- Be specific and actionable; say what to fix and why it matters\n");
    s.push_str(&format!(
        "\nAfter the inline comments, provide a summary of at most {summary_length} words.\n"
    ));
    s.push_str(&format!(
        "\nOutput format:\n[Inline comments]\n\n{SUMMARY_MARKER}\n[Your summary here]\n"
    ));
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigResolver, ReviewConfig};

    #[test]
    fn prompt_carries_patch_and_addressing_contract() {
        let cfg = ConfigResolver::new(ReviewConfig::default());
        let prompt = build_review_prompt("src/app.py", "python", "@@ -1 +1 @@\n+x = 1", &cfg);
        assert!(prompt.contains("`src/app.py`"));
        assert!(prompt.contains("+x = 1"));
        assert!(prompt.contains("lineNumber: comment text"));
        assert!(prompt.contains(SUMMARY_MARKER));
        assert!(prompt.contains("at most 200 words"));
    }
}
