//! Source files: what they are and what they hold.
//!
//! - [`classify`] routes each file under the input directory to exactly one
//!   pipeline
//! - [`Page`] is a parsed `.md`/`.njk` file with its URL and output path
//! - [`collections`] groups pages for templates

pub mod collections;
mod page;

pub use collections::{Collections, build_collections};
pub use page::{Page, PageFormat};
#[cfg(test)]
pub use page::FrontMatter;

use crate::{config::SiteConfig, utils::glob};
use std::path::Path;

/// Which pipeline a source file goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Copied verbatim.
    Passthrough,
    /// Rendered through the template engine.
    Page(PageFormat),
    Stylesheet,
    Script,
    /// Consumed elsewhere (includes, layouts, data) or not a known format.
    Ignored,
}

/// Route a file, given its path relative to the input directory.
///
/// Reserved directories are never emitted. Passthrough patterns win over
/// extensions.
pub fn classify(relative: &Path, config: &SiteConfig) -> FileKind {
    let reserved = [
        &config.build.includes,
        &config.build.layouts,
        &config.build.data,
    ];
    if reserved.iter().any(|dir| relative.starts_with(dir)) {
        return FileKind::Ignored;
    }

    let path = glob::to_slash(relative);
    if is_passthrough(&path, config) {
        return FileKind::Passthrough;
    }

    match relative.extension().and_then(|ext| ext.to_str()) {
        Some("md") => FileKind::Page(PageFormat::Markdown),
        Some("njk") => FileKind::Page(PageFormat::Nunjucks),
        Some("css") => FileKind::Stylesheet,
        Some("js") => FileKind::Script,
        _ => FileKind::Ignored,
    }
}

/// Whether a `/`-separated relative path is selected by `[build] passthrough`.
pub fn is_passthrough(path: &str, config: &SiteConfig) -> bool {
    config.build.passthrough.iter().any(|entry| {
        glob::covers(entry.pattern(), path)
            && !entry
                .exclude()
                .iter()
                .any(|exclude| glob::matches_name(exclude, path))
    })
}

/// Split YAML front matter from the body.
///
/// Front matter is only recognized when the very first line is `---`; it
/// runs to the next line that is exactly `---`. Without a closing fence the
/// whole input is body.
pub fn split_front_matter(source: &str) -> (Option<&str>, &str) {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);

    let Some(rest) = source
        .strip_prefix("---\n")
        .or_else(|| source.strip_prefix("---\r\n"))
    else {
        return (None, source);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(yaml), body);
        }
        offset += line.len();
    }

    (None, source)
}
