//! Site building orchestration.
//!
//! # Architecture
//!
//! ```text
//! build_site()
//!     │
//!     ├── prepare_output()        --clean removes the output first
//!     │
//!     ├── scan()                  every input file → exactly one pipeline
//!     │
//!     ├── copy_passthrough()      parallel; images must exist before pages
//!     │
//!     └── rayon::join
//!             ├── write_stylesheet() / write_script()
//!             └── build_pages()
//! ```

use crate::{
    compiler::{
        build_pages, collect_all_files, copy_passthrough, load_pages, published_count,
        write_script, write_stylesheet,
    },
    config::SiteConfig,
    content::{FileKind, PageFormat, classify},
    log,
    logger::ProgressBars,
};
use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
};

/// Input files grouped by the pipeline they go through.
#[derive(Debug, Default)]
struct Sources {
    passthrough: Vec<PathBuf>,
    pages: Vec<(PathBuf, PageFormat)>,
    stylesheets: Vec<PathBuf>,
    scripts: Vec<PathBuf>,
}

impl Sources {
    fn assets(&self) -> impl ParallelIterator<Item = (&PathBuf, bool)> {
        self.stylesheets
            .par_iter()
            .map(|path| (path, true))
            .chain(self.scripts.par_iter().map(|path| (path, false)))
    }
}

/// Build the entire site.
///
/// The first failing file is logged once; work still queued is skipped and
/// the build returns an error.
pub fn build_site(config: &SiteConfig) -> Result<()> {
    let output = &config.build.output;
    prepare_output(output, config.build.clean)?;

    let sources = scan(config);
    let has_error = AtomicBool::new(false);

    // ========================================================================
    // Passthrough
    // ========================================================================
    // Finished before pages so image dimensions can be read from the output.

    let progress = ProgressBars::new(&[("copy", sources.passthrough.len())]);
    let copied = sources
        .passthrough
        .par_iter()
        .try_for_each(|path| -> Result<()> {
            guarded(&has_error, path, || copy_passthrough(path, config))?;
            progress.inc("copy");
            Ok(())
        });
    progress.finish();
    copied?;

    // ========================================================================
    // Assets + Pages
    // ========================================================================

    let pages = load_pages(&sources.pages, config)?;
    let progress = ProgressBars::new(&[
        ("pages", published_count(&pages, config)),
        ("assets", sources.stylesheets.len() + sources.scripts.len()),
    ]);

    let (assets_result, pages_result): (Result<()>, Result<()>) = rayon::join(
        || {
            sources.assets().try_for_each(|(path, is_stylesheet)| -> Result<()> {
                guarded(&has_error, path, || {
                    if is_stylesheet {
                        write_stylesheet(path, config)
                    } else {
                        write_script(path, config)
                    }
                })?;
                progress.inc("assets");
                Ok(())
            })
        },
        || match build_pages(&pages, config, || progress.inc("pages")) {
            Ok(()) => Ok(()),
            Err(e) => {
                if !has_error.swap(true, Ordering::Relaxed) {
                    log!("error"; "{:#}", e);
                }
                Err(anyhow!("Build failed"))
            }
        },
    );

    let written = progress.count("pages");
    progress.finish();
    assets_result?;
    pages_result?;

    log!("build"; "{} pages, {} copies", written, sources.passthrough.len());
    Ok(())
}

/// Run one file's job unless another has already failed.
fn guarded(has_error: &AtomicBool, path: &Path, job: impl FnOnce() -> Result<()>) -> Result<()> {
    if has_error.load(Ordering::Relaxed) {
        return Err(anyhow!("Aborted"));
    }
    if let Err(e) = job() {
        if !has_error.swap(true, Ordering::Relaxed) {
            log!("error"; "{}: {:#}", path.display(), e);
        }
        return Err(anyhow!("Build failed"));
    }
    Ok(())
}

fn prepare_output(output: &Path, clean: bool) -> Result<()> {
    if clean && output.exists() {
        fs::remove_dir_all(output)
            .with_context(|| format!("Failed to clear output directory: {}", output.display()))?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))
}

fn scan(config: &SiteConfig) -> Sources {
    let input = &config.build.input;
    let mut sources = Sources::default();

    for path in collect_all_files(input) {
        let Ok(relative) = path.strip_prefix(input) else {
            continue;
        };
        match classify(relative, config) {
            FileKind::Passthrough => sources.passthrough.push(path),
            FileKind::Page(format) => sources.pages.push((path, format)),
            FileKind::Stylesheet => sources.stylesheets.push(path),
            FileKind::Script => sources.scripts.push(path),
            FileKind::Ignored => {}
        }
    }

    sources
}
