//! Script bundling through an external bundler.
//!
//! One entry point (`[build.js] entry`) is bundled; the bundler's stdout is
//! the output file. Every other script is left to the bundler's import graph.

use crate::config::SiteConfig;
use crate::exec;
use crate::utils::exec::FilterRule;
use anyhow::{Context, Result};
use std::path::Path;

/// Skip esbuild's timing summary.
static BUNDLER_FILTER: FilterRule = FilterRule::new(&["⚡ Done in"]);

/// Bundle `path` with `[build.js] command`.
///
/// Returns `Ok(None)` for any path other than the entry point.
pub fn compile_js(path: &Path, config: &SiteConfig) -> Result<Option<Vec<u8>>> {
    if !is_entry(path, config) {
        return Ok(None);
    }

    let output = exec!(filter=&BUNDLER_FILTER; dir=&config.build.input; &config.build.js.command; path)
        .with_context(|| format!("Failed to bundle {}", path.display()))?;

    Ok(Some(output.stdout))
}

/// Whether `path` (absolute, under the input directory) is the entry point.
pub fn is_entry(path: &Path, config: &SiteConfig) -> bool {
    path.strip_prefix(&config.build.input)
        .is_ok_and(|relative| relative == config.build.js.entry)
}
