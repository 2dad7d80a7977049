//! Site configuration management for `quire.toml`.
//!
//! # Sections
//!
//! | Section                       | Purpose                                   |
//! |-------------------------------|-------------------------------------------|
//! | `[build]`                     | Paths, minification, drafts               |
//! | `[build.css]`                 | Stylesheet entry points, browser targets  |
//! | `[build.js]`                  | Script entry point, bundler command       |
//! | `[build.collections.<name>]`  | Page collections exposed to templates     |
//!
//! The config file is optional; every key has a default matching the
//! `src/` + `dist/` directory convention. Site data (domain, author, ...)
//! lives in `src/data/global.yml`, not here.
//!
//! # Example
//!
//! ```toml
//! [build]
//! output = "public"
//! minify = true
//! passthrough = ["robots.txt", "images"]
//!
//! [build.css.targets]
//! safari = 16
//! ```

mod build;
pub mod defaults;
mod error;
mod global;

pub use build::{BuildConfig, CollectionConfig, PassthroughEntry};
pub use error::ConfigError;
pub use global::SiteData;

use crate::cli::Cli;
use anyhow::{Context, Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing quire.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Data files from the data directory (set after loading)
    #[serde(skip)]
    pub data: SiteData,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content).with_context(|| format!("in `{}`", path.display()))
    }

    /// Load `quire.toml` (if present), apply CLI overrides, read the data
    /// directory and validate the result.
    pub fn load(cli: &Cli) -> Result<Self> {
        let root = cli.root.as_deref().unwrap_or(Path::new("./"));
        let config_path = root.join(&cli.config);

        let mut config = if config_path.exists() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };
        config.update_with_cli(cli);

        config.data = SiteData::load(&config.data_dir(), &config.build.global)?;
        config.validate()?;

        Ok(config)
    }

    /// Root directory from `[build] root`, used when `--root` is absent
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Site origin from `global.yml`.
    pub fn domain(&self) -> &str {
        &self.data.global.domain
    }

    pub fn includes_dir(&self) -> PathBuf {
        self.build.input.join(&self.build.includes)
    }

    pub fn layouts_dir(&self) -> PathBuf {
        self.build.input.join(&self.build.layouts)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.build.input.join(&self.build.data)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = cli
            .root
            .as_ref()
            .cloned()
            .unwrap_or_else(|| self.get_root().to_owned());

        Self::update_option(&mut self.build.output, cli.output.as_ref());
        self.update_path_with_root(&root);

        let args = cli.build_args();
        Self::update_option(&mut self.build.minify, args.minify.as_ref());
        self.build.clean |= args.clean;
        self.build.drafts |= args.drafts;
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Resolve input and output against the root and normalize to absolute paths
    fn update_path_with_root(&mut self, root: &Path) {
        let root = Self::normalize_path(root);
        self.build.input = Self::normalize_path(&root.join(&self.build.input));
        self.build.output = Self::normalize_path(&root.join(&self.build.output));
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate the loaded configuration
    pub fn validate(&self) -> Result<()> {
        if !self.build.input.is_dir() {
            bail!(ConfigError::Validation(format!(
                "input directory `{}` not found",
                self.build.input.display()
            )));
        }

        if self.build.output == self.build.input {
            bail!(ConfigError::Validation(
                "[build.output] must differ from [build.input]".into()
            ));
        }

        if !self.domain().starts_with("http") {
            bail!(ConfigError::Validation(format!(
                "`domain` in {}.yml must start with http:// or https://",
                self.build.global
            )));
        }

        if self.build.input.join(&self.build.js.entry).exists() {
            Self::check_command_installed("[build.js.command]", &self.build.js.command)?;
        }

        Ok(())
    }

    /// Check if a command is installed and available
    fn check_command_installed(field: &str, command: &[String]) -> Result<()> {
        let Some(cmd) = command.first() else {
            bail!(ConfigError::Validation(format!(
                "{field} must have at least one element"
            )));
        };

        which::which(cmd)
            .with_context(|| format!("`{cmd}` not found. Please install it first."))?;

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
