//! Stylesheet bundling with lightningcss.
//!
//! Only the allow-listed entry points under `[build.css] entries` are
//! compiled; partials pulled in through `@import` never reach the output on
//! their own.

use crate::config::SiteConfig;
use anyhow::{Context, Result, anyhow};
use lightningcss::{
    bundler::{Bundler, FileProvider},
    stylesheet::{MinifyOptions, ParserOptions, PrinterOptions},
    targets::{Browsers, Targets},
};
use std::path::Path;

/// Compile one stylesheet: inline `@import`s, add vendor prefixes for the
/// configured browsers and minify.
///
/// Returns `Ok(None)` for any path that isn't an entry point.
pub fn compile_css(path: &Path, config: &SiteConfig) -> Result<Option<String>> {
    if !is_entry(path, config) {
        return Ok(None);
    }

    let fs = FileProvider::new();
    let mut bundler = Bundler::new(&fs, None, ParserOptions::default());
    let mut stylesheet = bundler
        .bundle(path)
        .map_err(|err| anyhow!("{err}"))
        .with_context(|| format!("Failed to bundle {}", path.display()))?;

    stylesheet
        .minify(MinifyOptions {
            targets: targets(config),
            ..MinifyOptions::default()
        })
        .map_err(|err| anyhow!("{err}"))
        .with_context(|| format!("Failed to minify {}", path.display()))?;

    let output = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            targets: targets(config),
            ..PrinterOptions::default()
        })
        .map_err(|err| anyhow!("{err}"))
        .with_context(|| format!("Failed to print {}", path.display()))?;

    Ok(Some(output.code))
}

/// Whether `path` (absolute, under the input directory) is a configured entry.
pub fn is_entry(path: &Path, config: &SiteConfig) -> bool {
    path.strip_prefix(&config.build.input)
        .is_ok_and(|relative| config.build.css.entries.iter().any(|e| e == relative))
}

/// Browser targets, with major versions shifted into lightningcss' encoding.
fn targets(config: &SiteConfig) -> Targets {
    let version = |major: Option<u32>| major.map(|v| v << 16);
    let configured = &config.build.css.targets;

    Targets::from(Browsers {
        chrome: version(configured.chrome),
        firefox: version(configured.firefox),
        safari: version(configured.safari),
        ios_saf: version(configured.safari),
        ..Browsers::default()
    })
}
