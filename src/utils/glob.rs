//! Glob matching for passthrough rules and collections.
//!
//! Paths are `/`-separated and relative to the input directory. `*` never
//! crosses a `/`; `**` does.

use gix_glob::wildmatch;

/// Match the whole relative path against `pattern`.
pub fn matches(pattern: &str, path: &str) -> bool {
    wildmatch(
        pattern.into(),
        path.into(),
        wildmatch::Mode::NO_MATCH_SLASH_LITERAL,
    )
}

pub fn matches_any<S: AsRef<str>>(patterns: &[S], path: &str) -> bool {
    patterns.iter().any(|p| matches(p.as_ref(), path))
}

/// Like [`matches`], but a pattern without `/` is tried against the file
/// name only (`*.md` matches `articles/a/index.md`).
pub fn matches_name(pattern: &str, path: &str) -> bool {
    if pattern.contains('/') {
        return matches(pattern, path);
    }
    let name = path.rsplit_once('/').map_or(path, |(_, name)| name);
    matches(pattern, name)
}

/// Whether `pattern` selects `path` directly or names a directory that
/// contains it (`images` covers `images/a/b.png`).
pub fn covers(pattern: &str, path: &str) -> bool {
    let pattern = pattern.trim_end_matches('/');
    if matches(pattern, path) {
        return true;
    }
    // Walk up the ancestors: "images/a/b.png" -> "images/a" -> "images"
    let mut current = path;
    while let Some((parent, _)) = current.rsplit_once('/') {
        if matches(pattern, parent) {
            return true;
        }
        current = parent;
    }
    false
}

/// `Path` to a `/`-separated string, for matching on every platform.
pub fn to_slash(path: &std::path::Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_star_stays_in_segment() {
        assert!(matches("*.md", "about.md"));
        assert!(!matches("*.md", "articles/about.md"));
        assert!(matches("articles/*/index.md", "articles/hello/index.md"));
        assert!(!matches("articles/*/index.md", "articles/a/b/index.md"));
    }

    #[test]
    fn test_double_star_crosses_segments() {
        assert!(matches("articles/**", "articles/a/cover.png"));
        assert!(matches("articles/**", "articles/a/b/c.txt"));
        assert!(!matches("articles/**", "talks/a.pdf"));
    }

    #[test]
    fn test_matches_name() {
        assert!(matches_name("*.md", "articles/a/index.md"));
        assert!(matches_name("*.yml", "articles/a/meta.yml"));
        assert!(!matches_name("*.md", "articles/a/cover.png"));
        assert!(matches_name("articles/*/index.md", "articles/a/index.md"));
    }

    #[test]
    fn test_covers_directories() {
        assert!(covers("images", "images/logo.png"));
        assert!(covers("images/", "images/icons/x.svg"));
        assert!(covers("robots.txt", "robots.txt"));
        assert!(!covers("images", "imagesets/a.png"));
        assert!(!covers("robots.txt", "talks/robots.txt"));
    }

    #[test]
    fn test_matches_any() {
        let patterns = ["404.njk", "drafts/**"];
        assert!(matches_any(&patterns, "404.njk"));
        assert!(matches_any(&patterns, "drafts/a.md"));
        assert!(!matches_any(&patterns, "index.njk"));
    }

    #[test]
    fn test_to_slash() {
        let path = std::path::Path::new("articles").join("a").join("index.md");
        assert_eq!(to_slash(&path), "articles/a/index.md");
    }
}
