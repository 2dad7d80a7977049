//! Per-file build steps.
//!
//! - **pages**: `.md`/`.njk` through templates, transforms and minifiers
//! - **assets**: passthrough copies, stylesheets and the script bundle
//!
//! # Page Flow
//!
//! ```text
//! load_pages() ──► render_contents() ──► build_collections() ──► write_page()
//!     │                  │                      │                    │
//!     ▼                  ▼                      ▼                    ▼
//!   Page[]         body HTML per .md       Collections        HTML/XML files
//! ```

pub mod assets;
pub mod pages;

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub use assets::{copy_passthrough, write_script, write_stylesheet};
pub use pages::{build_pages, load_pages, published_count};

// ============================================================================
// Shared utilities
// ============================================================================

/// OS droppings that are never part of a site.
const IGNORED_FILES: &[&str] = &[".DS_Store", "Thumbs.db"];

/// Every regular file under `dir`, sorted for stable builds.
///
/// A missing directory yields nothing.
pub fn collect_all_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            let name = entry.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Whether `dst` exists and is at least as new as `src`.
pub fn is_up_to_date(src: &Path, dst: &Path) -> bool {
    let modified = |path: &Path| path.metadata().and_then(|meta| meta.modified()).ok();

    match (modified(src), modified(dst)) {
        (Some(src_time), Some(dst_time)) => src_time <= dst_time,
        _ => false,
    }
}

/// `input/<relative>` → `output/<relative>`.
pub fn mirror_path(source: &Path, input: &Path, output: &Path) -> Option<PathBuf> {
    source
        .strip_prefix(input)
        .ok()
        .map(|relative| output.join(relative))
}
