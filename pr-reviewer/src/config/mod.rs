//! Configuration loading and resolution.
//!
//! Responsibilities:
//! - locate an optional override document (`CONFIG_PATH`, then the
//!   `.github/pr_review_config.yml`/`.yaml` defaults)
//! - merge it onto the built-in defaults (single-level deep merge)
//! - apply direct env overrides (`REVIEW_MODE`, `COMMENT_THRESHOLD`)
//! - expose the file-inclusion predicate and the prompt instruction fragments
//!
//! A malformed override document is discarded with a warning and the
//! defaults win; configuration problems are never fatal.

pub mod model;

use std::fs;
use std::path::PathBuf;

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde_yml::Value;
use tracing::{debug, info, warn};

pub use model::{CommentStyling, CommentThreshold, FileFilters, ReviewConfig, ReviewMode};

/// Default override document locations, tried in order after `CONFIG_PATH`.
const DEFAULT_CONFIG_PATHS: [&str; 2] = [
    ".github/pr_review_config.yml",
    ".github/pr_review_config.yaml",
];

/// Resolved configuration plus the compiled file-filter glob sets.
#[derive(Debug)]
pub struct ConfigResolver {
    cfg: ReviewConfig,
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
}

/// Instruction fragments assembled for the model prompt.
#[derive(Debug, Clone)]
pub struct PromptAdditions {
    /// Comma-joined focus areas.
    pub focus: String,
    /// One bullet per configured language, empty when none are configured.
    pub language_specific: String,
    /// Threshold guidance phrase.
    pub threshold: &'static str,
    /// Mode guidance phrase.
    pub mode: &'static str,
}

impl ConfigResolver {
    /// Loads the override document (if any), merges it onto defaults, applies
    /// env overrides, and compiles the file filters.
    pub fn resolve() -> Self {
        let mut cfg = match load_override_document() {
            Some(overlay) => merged_config(overlay),
            None => ReviewConfig::default(),
        };

        if let Ok(v) = std::env::var("REVIEW_MODE") {
            cfg.review_mode = ReviewMode::parse_lenient(&v);
        }
        if let Ok(v) = std::env::var("COMMENT_THRESHOLD") {
            cfg.comment_threshold = CommentThreshold::parse_lenient(&v);
        }

        Self::new(cfg)
    }

    /// Builds a resolver from an already-assembled config.
    pub fn new(cfg: ReviewConfig) -> Self {
        let include = build_globset(&cfg.file_filters.include);
        let exclude = build_globset(&cfg.file_filters.exclude);
        Self {
            cfg,
            include,
            exclude,
        }
    }

    /// The resolved configuration document.
    pub fn config(&self) -> &ReviewConfig {
        &self.cfg
    }

    /// Whether a changed file should be reviewed.
    ///
    /// Exclude patterns are evaluated first and win outright; otherwise the
    /// file is included only if some include pattern matches it.
    pub fn should_review_file(&self, path: &str) -> bool {
        if let Some(exclude) = &self.exclude {
            if exclude.is_match(path) {
                return false;
            }
        }
        match &self.include {
            Some(include) => include.is_match(path),
            None => false,
        }
    }

    /// Whether an added line's content disqualifies it from commenting.
    pub fn is_ignored_line(&self, content: &str) -> bool {
        self.cfg
            .ignore_lines_containing
            .iter()
            .any(|marker| content.contains(marker))
    }

    /// Assembles the natural-language instruction fragments for the prompt.
    pub fn prompt_additions(&self) -> PromptAdditions {
        let focus = self.cfg.review_focus.join(", ");

        let mut language_specific = String::new();
        for (lang, rules) in &self.cfg.language_specific_rules {
            language_specific.push_str(&format!(
                "\n- For {lang} files: Follow {} guidelines",
                rules.style_guide
            ));
            if !rules.extra_focus.is_empty() {
                language_specific
                    .push_str(&format!(" with focus on {}", rules.extra_focus.join(", ")));
            }
        }

        PromptAdditions {
            focus,
            language_specific,
            threshold: self.cfg.comment_threshold.guidance(),
            mode: self.cfg.review_mode.guidance(),
        }
    }
}

/// Merges an overlay document onto the built-in defaults and deserializes
/// the result. A document that fails to type after merging is discarded.
fn merged_config(overlay: Value) -> ReviewConfig {
    let Ok(mut base) = serde_yml::to_value(ReviewConfig::default()) else {
        return ReviewConfig::default();
    };
    merge_one_level(&mut base, overlay);
    match serde_yml::from_value(base) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("override document discarded after merge: {e}; using defaults");
            ReviewConfig::default()
        }
    }
}

/// Single-level deep merge of `overlay` into `base`.
///
/// For each top-level key of the overlay: when both sides hold mappings, the
/// inner keys are merged one level deep (overlay wins per inner key,
/// unmatched base keys survive); any other value replaces the base value
/// wholesale; keys present only in the overlay are added verbatim.
///
/// The merge does not recurse past depth 2 — a mapping nested deeper than
/// one level is replaced as a whole, not combined.
pub fn merge_one_level(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                let replace = match (base_map.get_mut(&key), value) {
                    (Some(Value::Mapping(dst)), Value::Mapping(src)) => {
                        for (k, v) in src {
                            dst.insert(k, v);
                        }
                        None
                    }
                    (_, value) => Some(value),
                };
                if let Some(value) = replace {
                    base_map.insert(key, value);
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Reads the first parseable override document, trying `CONFIG_PATH` first
/// and the repository defaults after it. Malformed candidates are skipped
/// with a warning.
fn load_override_document() -> Option<Value> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Ok(p) = std::env::var("CONFIG_PATH") {
        if !p.trim().is_empty() {
            candidates.push(PathBuf::from(p));
        }
    }
    candidates.extend(DEFAULT_CONFIG_PATHS.iter().map(PathBuf::from));

    for path in candidates {
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(_) => {
                debug!("no config at {}", path.display());
                continue;
            }
        };
        match serde_yml::from_str::<Value>(&text) {
            Ok(value) if value.is_mapping() => {
                info!("loaded custom config from {}", path.display());
                return Some(value);
            }
            Ok(_) => warn!("config at {} is not a mapping; skipping", path.display()),
            Err(e) => warn!("malformed config at {}: {e}; skipping", path.display()),
        }
    }
    None
}

/// Builds a [`GlobSet`] from patterns, skipping invalid or empty ones.
///
/// Returns `None` if the input list is empty or all patterns are invalid.
fn build_globset(patterns: &[String]) -> Option<GlobSet> {
    if patterns.is_empty() {
        return None;
    }
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        if pat.trim().is_empty() {
            continue;
        }
        match Glob::new(pat) {
            Ok(g) => {
                builder.add(g);
            }
            Err(e) => warn!("invalid file filter pattern `{pat}`: {e}"),
        }
    }
    builder.build().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver_from_yaml(overlay: &str) -> ConfigResolver {
        let value: Value = serde_yml::from_str(overlay).unwrap();
        ConfigResolver::new(merged_config(value))
    }

    #[test]
    fn overriding_exclude_keeps_default_include() {
        let resolver = resolver_from_yaml("file_filters:\n  exclude: [\"*.lock\"]\n");
        let filters = &resolver.config().file_filters;
        assert_eq!(filters.exclude, vec!["*.lock".to_string()]);
        assert_eq!(filters.include, FileFilters::default().include);
    }

    #[test]
    fn scalar_override_replaces_wholesale() {
        let resolver = resolver_from_yaml("summary_length: 80\nreview_focus: [\"bugs\"]\n");
        assert_eq!(resolver.config().summary_length, 80);
        assert_eq!(resolver.config().review_focus, vec!["bugs".to_string()]);
    }

    #[test]
    fn unrecognized_mode_and_threshold_fall_back() {
        let resolver =
            resolver_from_yaml("review_mode: pedantic\ncomment_threshold: extreme\n");
        assert_eq!(resolver.config().review_mode, ReviewMode::Standard);
        assert_eq!(
            resolver.config().comment_threshold,
            CommentThreshold::Medium
        );
    }

    #[test]
    fn exclude_wins_over_include() {
        let resolver = ConfigResolver::new(ReviewConfig::default());
        assert!(!resolver.should_review_file("README.md"));
        assert!(!resolver.should_review_file("package-lock.json"));
        assert!(resolver.should_review_file("src/app.py"));
    }

    #[test]
    fn empty_include_list_matches_nothing() {
        let resolver = resolver_from_yaml("file_filters:\n  include: []\n  exclude: []\n");
        assert!(!resolver.should_review_file("src/app.py"));
    }

    #[test]
    fn prompt_additions_cover_configured_languages() {
        let resolver = ConfigResolver::new(ReviewConfig::default());
        let additions = resolver.prompt_additions();
        assert!(additions.focus.contains("bugs"));
        assert!(additions.language_specific.contains("For python files: Follow PEP8"));
        assert!(additions.language_specific.contains("null_safety"));
        assert_eq!(additions.threshold, CommentThreshold::Medium.guidance());
    }

    #[test]
    fn ignored_line_markers_match_substrings() {
        let resolver = ConfigResolver::new(ReviewConfig::default());
        assert!(resolver.is_ignored_line("    x = 1  # TODO tighten"));
        assert!(!resolver.is_ignored_line("    x = 1"));
    }
}
