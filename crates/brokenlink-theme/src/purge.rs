//! Content scanning for purging unused style rules.
//!
//! Content files are matched with glob patterns and split into candidate
//! class names. A generated rule survives a purge only if its class name
//! appears among the candidates.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use walkdir::WalkDir;

use crate::error::ThemeError;

/// A compiled content glob such as `./_site/**/*.html`.
///
/// Supports `*` (within one path segment), `**` (any number of segments)
/// and `?` (one character).
#[derive(Debug, Clone)]
pub struct ContentPattern {
    glob: String,
    base: PathBuf,
    absolute: bool,
    regex: Regex,
}

impl ContentPattern {
    pub fn new(glob: &str) -> Result<Self, ThemeError> {
        let absolute = glob.starts_with('/');
        let normalized = glob.trim_start_matches("./").replace('\\', "/");

        if normalized.is_empty() {
            return Err(ThemeError::InvalidPattern {
                pattern: glob.to_string(),
                message: "pattern is empty".to_string(),
            });
        }

        // Walk only from the directory before the first wildcard.
        let base: PathBuf = normalized
            .split('/')
            .take_while(|segment| !segment.contains(['*', '?']))
            .collect::<Vec<_>>()
            .join("/")
            .into();
        let base = if base.as_os_str().is_empty() || base.as_os_str() == normalized.as_str() {
            base.parent().map(Path::to_path_buf).unwrap_or_default()
        } else {
            base
        };

        let regex = Regex::new(&glob_to_regex(&normalized)).map_err(|e| {
            ThemeError::InvalidPattern {
                pattern: glob.to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(Self {
            glob: glob.to_string(),
            base,
            absolute,
            regex,
        })
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.glob
    }

    /// Directory the pattern's matches live under.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Whether a `/`-separated path matches. Relative patterns are matched
    /// against paths relative to the project root.
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

fn glob_to_regex(glob: &str) -> String {
    let mut out = String::from("^");
    let mut rest = glob;

    while let Some(c) = rest.chars().next() {
        if let Some(after) = rest.strip_prefix("**/") {
            out.push_str("(?:.*/)?");
            rest = after;
        } else if let Some(after) = rest.strip_prefix("**") {
            out.push_str(".*");
            rest = after;
        } else {
            match c {
                '*' => out.push_str("[^/]*"),
                '?' => out.push_str("[^/]"),
                _ => out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
            }
            rest = &rest[c.len_utf8()..];
        }
    }

    out.push('$');
    out
}

/// Class name candidates gathered from content files.
#[derive(Debug, Clone, Default)]
pub struct ContentScan {
    /// Number of distinct files scanned
    pub files: usize,

    /// Every candidate token seen
    pub candidates: HashSet<String>,
}

impl ContentScan {
    pub fn contains(&self, class: &str) -> bool {
        self.candidates.contains(class)
    }
}

/// Split text into class name candidates.
pub fn extract_candidates(text: &str) -> impl Iterator<Item = &str> {
    static RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#"[^<>"'`\s=]*[^<>"'`\s=:]"#).expect("Invalid candidate regex")
    });

    RE.find_iter(text).map(|m| m.as_str())
}

/// Scan every file under `root` matching one of `patterns`.
///
/// Files matched by several patterns are read once. Unreadable files are
/// logged and skipped.
pub fn scan_content(root: &Path, patterns: &[ContentPattern]) -> ContentScan {
    let mut scan = ContentScan::default();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for pattern in patterns {
        let dir = root.join(pattern.base());
        if !dir.exists() {
            tracing::debug!("No content under {} for {}", dir.display(), pattern.as_str());
            continue;
        }

        for entry in WalkDir::new(&dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }

            let candidate = if pattern.absolute {
                path.to_string_lossy().replace('\\', "/")
            } else {
                path.strip_prefix(root)
                    .unwrap_or(path)
                    .to_string_lossy()
                    .replace('\\', "/")
            };
            if !pattern.matches(&candidate) || !seen.insert(path.to_path_buf()) {
                continue;
            }

            match fs::read_to_string(path) {
                Ok(text) => {
                    scan.files += 1;
                    scan.candidates
                        .extend(extract_candidates(&text).map(str::to_string));
                }
                Err(e) => {
                    tracing::warn!("Skipping content file {}: {}", path.display(), e);
                }
            }
        }
    }

    scan
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn matches_single_level_globs() {
        let pattern = ContentPattern::new("./_site/*.html").unwrap();

        assert_eq!(pattern.base(), Path::new("_site"));
        assert!(pattern.matches("_site/index.html"));
        assert!(!pattern.matches("_site/blog/index.html"));
        assert!(!pattern.matches("_site/index.htm"));
    }

    #[test]
    fn matches_recursive_globs() {
        let pattern = ContentPattern::new("./_site/**/*.html").unwrap();

        assert!(pattern.matches("_site/index.html"));
        assert!(pattern.matches("_site/blog/tech/index.html"));
        assert!(!pattern.matches("other/index.html"));
    }

    #[test]
    fn literal_pattern_walks_its_parent() {
        let pattern = ContentPattern::new("templates/base.html").unwrap();

        assert_eq!(pattern.base(), Path::new("templates"));
        assert!(pattern.matches("templates/base.html"));
        assert!(!pattern.matches("templates/baseXhtml"));
    }

    #[test]
    fn question_mark_matches_one_char() {
        let pattern = ContentPattern::new("page?.html").unwrap();

        assert_eq!(pattern.base(), Path::new(""));
        assert!(pattern.matches("page1.html"));
        assert!(!pattern.matches("page12.html"));
    }

    #[test]
    fn rejects_empty_pattern() {
        assert!(ContentPattern::new("./").is_err());
    }

    #[test]
    fn extracts_class_candidates() {
        let html = r#"<p class="text-sea-blue-500 hover:bg-elixir">x</p><span class='border-sand-yellow-100'>"#;
        let found: HashSet<&str> = extract_candidates(html).collect();

        assert!(found.contains("text-sea-blue-500"));
        assert!(found.contains("hover:bg-elixir"));
        assert!(found.contains("border-sand-yellow-100"));
        assert!(!found.contains("class"));
    }

    #[test]
    fn unquoted_attribute_values_are_candidates() {
        let found: HashSet<&str> =
            extract_candidates("<p class=text-elixir>x</p><a class=bg-sea-blue-100 href=/>").collect();

        assert!(found.contains("text-elixir"));
        assert!(found.contains("bg-sea-blue-100"));
        assert!(!found.contains("class=text-elixir"));
    }

    #[test]
    fn scans_matching_files_once() {
        let temp = tempdir().unwrap();
        let site = temp.path().join("_site");
        fs::create_dir_all(site.join("blog")).unwrap();
        fs::write(site.join("index.html"), r#"<p class="text-elixir">"#).unwrap();
        fs::write(site.join("blog/post.html"), r#"<p class="bg-sea-blue-100">"#).unwrap();
        fs::write(site.join("style.css"), ".text-sand-yellow-900 {}").unwrap();

        let patterns = vec![
            ContentPattern::new("./_site/*.html").unwrap(),
            ContentPattern::new("./_site/**/*.html").unwrap(),
        ];
        let scan = scan_content(temp.path(), &patterns);

        assert_eq!(scan.files, 2);
        assert!(scan.contains("text-elixir"));
        assert!(scan.contains("bg-sea-blue-100"));
        assert!(!scan.contains("text-sand-yellow-900"));
    }

    #[test]
    fn missing_content_dir_yields_empty_scan() {
        let temp = tempdir().unwrap();
        let patterns = vec![ContentPattern::new("./_site/**/*.html").unwrap()];

        let scan = scan_content(temp.path(), &patterns);

        assert_eq!(scan.files, 0);
        assert!(scan.candidates.is_empty());
    }
}
