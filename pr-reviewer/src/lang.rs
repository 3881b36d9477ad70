//! File-extension → language lookup used to select language guidance.

use std::path::Path;

/// Determines the programming language of a changed file from its extension.
/// Unknown extensions (or none) yield `"unknown"`.
pub fn language_for_path(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "py" => "python",
        "js" | "jsx" => "javascript",
        "ts" | "tsx" => "typescript",
        "java" => "java",
        "c" | "h" => "c",
        "cpp" | "cc" | "cxx" | "hpp" => "c++",
        "cs" => "c#",
        "go" => "go",
        "rb" => "ruby",
        "php" => "php",
        "swift" => "swift",
        "kt" => "kotlin",
        "rs" => "rust",
        "scala" => "scala",
        "sh" | "bash" => "shell",
        "html" => "html",
        "css" => "css",
        "scss" => "scss",
        "sql" => "sql",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_extensions() {
        assert_eq!(language_for_path("src/lib.rs"), "rust");
        assert_eq!(language_for_path("app/Main.PY"), "python");
        assert_eq!(language_for_path("web/index.tsx"), "typescript");
    }

    #[test]
    fn unknown_extensions_fall_through() {
        assert_eq!(language_for_path("Makefile"), "unknown");
        assert_eq!(language_for_path("data.parquet"), "unknown");
    }
}
