//! Configuration document model.
//!
//! Groups:
//! - [`ReviewConfig`]   — top-level container, mirrors the override document
//! - [`FileFilters`]    — include/exclude glob patterns
//! - [`LanguageRules`]  — per-language style guide and extra focus areas
//! - [`CommentStyling`] — rendered-comment cosmetics
//!
//! All structs are `serde`-friendly so the override document (YAML) can be
//! merged onto the built-in defaults before deserialization. The mode and
//! threshold enums deserialize leniently: an unrecognized value falls back to
//! the default variant with a warning instead of poisoning the whole
//! document.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Top-level review configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// How verbose the model review should be.
    pub review_mode: ReviewMode,
    /// How significant an issue must be to warrant a comment.
    pub comment_threshold: CommentThreshold,
    /// Which changed files participate in the review.
    pub file_filters: FileFilters,
    /// Focus areas injected into the model prompt.
    pub review_focus: Vec<String>,
    /// Word budget for the per-file summary.
    pub summary_length: usize,
    /// Added lines containing any of these markers are never commented on.
    pub ignore_lines_containing: Vec<String>,
    /// Per-language style guidance, keyed by language name.
    pub language_specific_rules: BTreeMap<String, LanguageRules>,
    /// Cosmetics for rendered comments and the summary note.
    pub comment_styling: CommentStyling,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        let mut language_specific_rules = BTreeMap::new();
        language_specific_rules.insert(
            "python".to_string(),
            LanguageRules {
                style_guide: "PEP8".to_string(),
                extra_focus: vec!["type_hints".to_string(), "docstrings".to_string()],
            },
        );
        language_specific_rules.insert(
            "javascript".to_string(),
            LanguageRules {
                style_guide: "Airbnb".to_string(),
                extra_focus: vec!["null_safety".to_string(), "async_patterns".to_string()],
            },
        );

        Self {
            review_mode: ReviewMode::default(),
            comment_threshold: CommentThreshold::default(),
            file_filters: FileFilters::default(),
            review_focus: vec![
                "bugs".to_string(),
                "security".to_string(),
                "performance".to_string(),
                "maintainability".to_string(),
                "readability".to_string(),
            ],
            summary_length: 200,
            ignore_lines_containing: vec![
                "TODO".to_string(),
                "FIXME".to_string(),
                "NOSONAR".to_string(),
            ],
            language_specific_rules,
            comment_styling: CommentStyling::default(),
        }
    }
}

/// Review verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewMode {
    Concise,
    #[default]
    Standard,
    Thorough,
}

impl ReviewMode {
    /// Lenient parser: unrecognized values fall back to `Standard`.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "concise" => ReviewMode::Concise,
            "standard" => ReviewMode::Standard,
            "thorough" => ReviewMode::Thorough,
            other => {
                warn!("unrecognized review_mode `{other}`, using `standard`");
                ReviewMode::Standard
            }
        }
    }

    /// Natural-language steering fragment sent to the model.
    pub fn guidance(self) -> &'static str {
        match self {
            ReviewMode::Concise => "Be extremely brief and only focus on critical issues",
            ReviewMode::Standard => "Provide balanced feedback focusing on important issues",
            ReviewMode::Thorough => {
                "Perform comprehensive review covering both major and minor issues"
            }
        }
    }
}

impl<'de> Deserialize<'de> for ReviewMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ReviewMode::parse_lenient(&s))
    }
}

/// Minimum significance for an issue to be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentThreshold {
    Low,
    #[default]
    Medium,
    High,
}

impl CommentThreshold {
    /// Lenient parser: unrecognized values fall back to `Medium`.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => CommentThreshold::Low,
            "medium" => CommentThreshold::Medium,
            "high" => CommentThreshold::High,
            other => {
                warn!("unrecognized comment_threshold `{other}`, using `medium`");
                CommentThreshold::Medium
            }
        }
    }

    /// Natural-language steering fragment sent to the model.
    pub fn guidance(self) -> &'static str {
        match self {
            CommentThreshold::Low => "Suggest improvements even for minor issues",
            CommentThreshold::Medium => "Focus on moderate to significant issues",
            CommentThreshold::High => {
                "Only flag significant issues that meaningfully impact code quality or functionality"
            }
        }
    }
}

impl<'de> Deserialize<'de> for CommentThreshold {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(CommentThreshold::parse_lenient(&s))
    }
}

/// Glob filters deciding which changed files are reviewed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileFilters {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl Default for FileFilters {
    fn default() -> Self {
        Self {
            include: vec!["*".to_string()],
            exclude: vec![
                "*.md".to_string(),
                "*.txt".to_string(),
                "package-lock.json".to_string(),
                "yarn.lock".to_string(),
            ],
        }
    }
}

/// Per-language style guidance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageRules {
    pub style_guide: String,
    pub extra_focus: Vec<String>,
}

impl Default for LanguageRules {
    fn default() -> Self {
        Self {
            style_guide: "standard".to_string(),
            extra_focus: Vec::new(),
        }
    }
}

/// Cosmetics for rendered comments and the summary note.
///
/// `title_prefix` should keep the bot marker substring intact: the
/// deduplication index recognizes the bot's own prior comments by it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentStyling {
    /// Leading prefix of every inline comment body.
    pub title_prefix: String,
    /// Append the targeted added line as a fenced code block.
    pub include_code_preview: bool,
    /// Wrap the "about this review" blurb of the summary note in `<details>`.
    pub details_section: bool,
    /// Optional trailing signature appended to the summary note.
    pub signature: Option<String>,
}

impl Default for CommentStyling {
    fn default() -> Self {
        Self {
            title_prefix: "💡 **AI Review:**".to_string(),
            include_code_preview: false,
            details_section: true,
            signature: None,
        }
    }
}
