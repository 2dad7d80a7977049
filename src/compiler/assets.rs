use crate::compiler::{is_up_to_date, mirror_path};
use crate::config::SiteConfig;
use crate::utils::{css, js};
use anyhow::{Context, Result, anyhow};
use std::fs;
use std::path::{Path, PathBuf};

/// Copy a passthrough file to the same relative place under the output.
///
/// Skipped when the copy is already up to date, unless `--clean`.
pub fn copy_passthrough(path: &Path, config: &SiteConfig) -> Result<()> {
    let dest = destination(path, config)?;
    if !config.build.clean && is_up_to_date(path, &dest) {
        return Ok(());
    }

    create_parent(&dest)?;
    fs::copy(path, &dest)
        .with_context(|| format!("Failed to copy {} to {}", path.display(), dest.display()))?;
    Ok(())
}

/// Compile a stylesheet entry. Non-entries produce nothing.
pub fn write_stylesheet(path: &Path, config: &SiteConfig) -> Result<()> {
    let Some(code) = css::compile_css(path, config)? else {
        return Ok(());
    };
    write(&destination(path, config)?, code.as_bytes())
}

/// Bundle the script entry. Other scripts produce nothing.
pub fn write_script(path: &Path, config: &SiteConfig) -> Result<()> {
    let Some(bundle) = js::compile_js(path, config)? else {
        return Ok(());
    };
    write(&destination(path, config)?, &bundle)
}

fn destination(path: &Path, config: &SiteConfig) -> Result<PathBuf> {
    mirror_path(path, &config.build.input, &config.build.output)
        .ok_or_else(|| anyhow!("File is not in input directory: {}", path.display()))
}

fn write(dest: &Path, content: &[u8]) -> Result<()> {
    create_parent(dest)?;
    fs::write(dest, content).with_context(|| format!("Failed to write {}", dest.display()))
}

pub(super) fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Ok(())
}
