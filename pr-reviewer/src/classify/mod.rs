//! Comment classification and rendering.
//!
//! Each extracted comment is assigned one category from a closed set by
//! first-match against an ordered, case-insensitive rule table. The order is
//! part of the contract: security terms are checked before bug terms and bug
//! terms before style terms, so "sql injection ... refactor" classifies as
//! security, not maintainability.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::model::CommentStyling;

/// Semantic category of a review comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Security,
    Performance,
    Bug,
    Style,
    Maintainability,
    /// Default when no rule matches.
    Suggestion,
}

impl Category {
    /// Human-readable label used in the rendered comment body.
    pub fn label(self) -> &'static str {
        match self {
            Category::Security => "Security",
            Category::Performance => "Performance",
            Category::Bug => "Bug",
            Category::Style => "Style",
            Category::Maintainability => "Maintainability",
            Category::Suggestion => "Suggestion",
        }
    }

    /// Emoji glyph shown before the label.
    pub fn glyph(self) -> &'static str {
        match self {
            Category::Security => "🔒",
            Category::Performance => "⚡",
            Category::Bug => "🐛",
            Category::Style => "🎨",
            Category::Maintainability => "🧹",
            Category::Suggestion => "💭",
        }
    }
}

/// Ordered rule table; the first matching rule wins.
static RULES: LazyLock<Vec<(Category, Regex)>> = LazyLock::new(|| {
    let rule = |cat: Category, pattern: &str| {
        (
            cat,
            Regex::new(pattern).expect("classification pattern is valid"),
        )
    };
    vec![
        rule(
            Category::Security,
            r"(?i)\b(security|vulnerab|injection|xss|csrf|sanitiz|escap|secret|credential|token|unsafe|exploit)",
        ),
        rule(
            Category::Performance,
            r"(?i)\b(performance|inefficien|slow|complexity|o\(n|quadratic|alloc|memory|leak|latency|cache)",
        ),
        rule(
            Category::Bug,
            r"(?i)\b(bug|error|defect|crash|panic|null|none|nil|incorrect|wrong|fail|race|overflow|off.by.one)",
        ),
        rule(
            Category::Style,
            r"(?i)\b(style|format|formatting|naming|rename|indent|whitespace|convention|typo)",
        ),
        rule(
            Category::Maintainability,
            r"(?i)\b(maintainab|refactor|readab|duplicat|extract|simplif|cleanup|dead.code|complex)",
        ),
    ]
});

/// Leading boilerplate the model tends to prepend to comment bodies.
static BOILERPLATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(issue|problem|bug|note|warning)\s*[:\-]\s*")
        .expect("boilerplate pattern is valid")
});

/// Picks a category by first match against the ordered rule table.
pub fn classify(text: &str) -> Category {
    for (category, re) in RULES.iter() {
        if re.is_match(text) {
            return *category;
        }
    }
    Category::Suggestion
}

/// Strips one leading boilerplate label ("Issue:", "Warning:" etc.) from the
/// start of a comment, before classification and rendering.
pub fn strip_boilerplate(text: &str) -> &str {
    match BOILERPLATE_RE.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    }
}

/// Renders the final comment body: configured title prefix, category glyph
/// and label, then the comment text verbatim. When enabled, the added line
/// the comment targets is appended as a fenced code preview.
pub fn render_comment(
    styling: &CommentStyling,
    category: Category,
    text: &str,
    line_content: &str,
) -> String {
    let mut body = format!(
        "{} {} **{}:** {}",
        styling.title_prefix,
        category.glyph(),
        category.label(),
        text
    );
    if styling.include_code_preview && !line_content.trim().is_empty() {
        body.push_str("\n\n```\n");
        body.push_str(line_content);
        body.push_str("\n```");
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_order_is_part_of_the_contract() {
        // Security is checked before maintainability.
        assert_eq!(
            classify("possible sql injection; consider a refactor too"),
            Category::Security
        );
        // Bug is checked before style.
        assert_eq!(
            classify("this error in naming breaks the build"),
            Category::Bug
        );
    }

    #[test]
    fn unmatched_comments_default_to_suggestion() {
        assert_eq!(
            classify("consider documenting the intent here"),
            Category::Suggestion
        );
    }

    #[test]
    fn categories_cover_the_keyword_families() {
        assert_eq!(classify("O(n^2) loop over all users"), Category::Performance);
        assert_eq!(classify("inconsistent indentation"), Category::Style);
        assert_eq!(classify("duplicated logic, extract a helper"), Category::Maintainability);
    }

    #[test]
    fn strips_exactly_one_leading_label() {
        assert_eq!(strip_boilerplate("Issue: missing bounds check"), "missing bounds check");
        assert_eq!(
            strip_boilerplate("Warning: Note: nested labels"),
            "Note: nested labels"
        );
        assert_eq!(strip_boilerplate("no label here"), "no label here");
    }

    #[test]
    fn rendered_body_carries_prefix_and_category_tag() {
        let styling = CommentStyling::default();
        let body = render_comment(&styling, Category::Bug, "check for null", "let x = y;");
        assert!(body.starts_with(&styling.title_prefix));
        assert!(body.contains("**Bug:**"));
        assert!(body.ends_with("check for null"));
    }

    #[test]
    fn code_preview_is_appended_when_enabled() {
        let styling = CommentStyling {
            include_code_preview: true,
            ..CommentStyling::default()
        };
        let body = render_comment(&styling, Category::Suggestion, "tighten this", "let x = y;");
        assert!(body.contains("```\nlet x = y;\n```"));
    }
}
