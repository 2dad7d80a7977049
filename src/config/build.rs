//! `[build]` section configuration.
//!
//! Paths, asset entry points, passthrough rules and collections.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// `[build]` section in quire.toml - build pipeline configuration.
///
/// # Example
/// ```toml
/// [build]
/// input = "src"
/// output = "dist"
/// minify = true
///
/// [build.css]
/// entries = ["styles/index.css"]
///
/// [build.js]
/// entry = "scripts/index.js"
///
/// [build.collections.notes]
/// include = ["notes/*.md"]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root directory (usually set via CLI `--root`).
    #[serde(default = "defaults::build::root")]
    #[educe(Default = defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Source directory.
    #[serde(default = "defaults::build::input")]
    #[educe(Default = defaults::build::input())]
    pub input: PathBuf,

    /// Build output directory.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Template includes, relative to `input`.
    #[serde(default = "defaults::build::includes")]
    #[educe(Default = defaults::build::includes())]
    pub includes: PathBuf,

    /// Page layouts, relative to `input`.
    #[serde(default = "defaults::build::layouts")]
    #[educe(Default = defaults::build::layouts())]
    pub layouts: PathBuf,

    /// Global data files, relative to `input`.
    #[serde(default = "defaults::build::data")]
    #[educe(Default = defaults::build::data())]
    pub data: PathBuf,

    /// Stem of the data file holding the site record (`global.yml`).
    #[serde(default = "defaults::build::global")]
    #[educe(Default = defaults::build::global())]
    pub global: String,

    /// Minify HTML and XML output.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub minify: bool,

    /// Remove the output directory before building.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub clean: bool,

    /// Render pages marked `draft: true` (they stay out of collections).
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub drafts: bool,

    /// Stylesheet bundling.
    #[serde(default)]
    pub css: CssConfig,

    /// Script bundling.
    #[serde(default)]
    pub js: JsConfig,

    /// Files copied verbatim into the output.
    #[serde(default = "defaults::build::passthrough::entries")]
    #[educe(Default = defaults::build::passthrough::entries())]
    pub passthrough: Vec<PassthroughEntry>,

    /// Named page collections exposed to templates.
    #[serde(default = "defaults::build::collections::named")]
    #[educe(Default = defaults::build::collections::named())]
    pub collections: BTreeMap<String, CollectionConfig>,
}

// ============================================================================
// Sub-configurations
// ============================================================================

/// `[build.css]` section
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct CssConfig {
    /// Entry points compiled to the output; every other `.css` file is skipped.
    #[serde(default = "defaults::build::css::entries")]
    #[educe(Default = defaults::build::css::entries())]
    pub entries: Vec<PathBuf>,

    /// Browser targets for vendor prefixing.
    #[serde(default)]
    pub targets: CssTargets,
}

/// `[build.css.targets]` section, oldest supported major versions.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct CssTargets {
    #[serde(default = "defaults::build::css::chrome")]
    #[educe(Default = defaults::build::css::chrome())]
    pub chrome: Option<u32>,

    #[serde(default = "defaults::build::css::firefox")]
    #[educe(Default = defaults::build::css::firefox())]
    pub firefox: Option<u32>,

    #[serde(default = "defaults::build::css::safari")]
    #[educe(Default = defaults::build::css::safari())]
    pub safari: Option<u32>,
}

/// `[build.js]` section
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct JsConfig {
    /// The single bundled entry point; every other `.js` file is skipped.
    #[serde(default = "defaults::build::js::entry")]
    #[educe(Default = defaults::build::js::entry())]
    pub entry: PathBuf,

    /// Bundler command and arguments. The entry path is appended and the
    /// bundle is read from stdout.
    #[serde(default = "defaults::build::js::command")]
    #[educe(Default = defaults::build::js::command())]
    pub command: Vec<String>,
}

/// Passthrough entry for `[build] passthrough`.
///
/// # Formats
/// ```toml
/// passthrough = [
///     "robots.txt",
///     "images",
///     { pattern = "articles/**", exclude = ["*.md", "*.yml"] },
/// ]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PassthroughEntry {
    /// A file, a directory, or a glob relative to the input directory.
    Simple(String),
    /// A pattern with file-name exclusions.
    Filtered {
        pattern: String,
        #[serde(default)]
        exclude: Vec<String>,
    },
}

impl PassthroughEntry {
    pub fn pattern(&self) -> &str {
        match self {
            PassthroughEntry::Simple(pattern) => pattern,
            PassthroughEntry::Filtered { pattern, .. } => pattern,
        }
    }

    pub fn exclude(&self) -> &[String] {
        match self {
            PassthroughEntry::Simple(_) => &[],
            PassthroughEntry::Filtered { exclude, .. } => exclude,
        }
    }
}

/// `[build.collections.<name>]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectionConfig {
    /// Globs (relative to the input directory) selecting member pages.
    pub include: Vec<String>,

    /// Globs removing pages the include list matched.
    #[serde(default)]
    pub exclude: Vec<String>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use super::*;

    #[test]
    fn test_build_config_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();

        assert_eq!(config.build.input, PathBuf::from("src"));
        assert_eq!(config.build.output, PathBuf::from("dist"));
        assert_eq!(config.build.includes, PathBuf::from("includes"));
        assert_eq!(config.build.layouts, PathBuf::from("layouts"));
        assert_eq!(config.build.data, PathBuf::from("data"));
        assert_eq!(config.build.global, "global");
        assert!(config.build.minify);
        assert!(!config.build.clean);
        assert!(!config.build.drafts);
    }

    #[test]
    fn test_css_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();

        assert_eq!(config.build.css.entries.len(), 3);
        assert!(config.build.css.entries.contains(&PathBuf::from("styles/index.css")));
        assert_eq!(config.build.css.targets.safari, Some(15));
    }

    #[test]
    fn test_js_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();

        assert_eq!(config.build.js.entry, PathBuf::from("scripts/index.js"));
        assert_eq!(config.build.js.command[0], "esbuild");
        assert!(config.build.js.command.contains(&"--bundle".to_string()));
    }

    #[test]
    fn test_passthrough_mixed_formats() {
        let config: SiteConfig = toml::from_str(
            r#"
            [build]
            passthrough = [
                "robots.txt",
                { pattern = "articles/**", exclude = ["*.md"] },
            ]
        "#,
        )
        .unwrap();

        let entries = &config.build.passthrough;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].pattern(), "robots.txt");
        assert!(entries[0].exclude().is_empty());
        assert_eq!(entries[1].pattern(), "articles/**");
        assert_eq!(entries[1].exclude(), ["*.md".to_string()]);
    }

    #[test]
    fn test_passthrough_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();
        let patterns: Vec<&str> = config
            .build
            .passthrough
            .iter()
            .map(PassthroughEntry::pattern)
            .collect();

        assert_eq!(
            patterns,
            ["robots.txt", "images", "fonts", "talks", "articles/**"]
        );
    }

    #[test]
    fn test_collections_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();
        let collections = &config.build.collections;

        assert_eq!(collections["articles"].include, ["articles/*/index.md"]);
        assert_eq!(collections["sitemap"].exclude, ["404.njk"]);
    }

    #[test]
    fn test_custom_collection_replaces_defaults() {
        let config: SiteConfig = toml::from_str(
            r#"
            [build.collections.notes]
            include = ["notes/*.md"]
        "#,
        )
        .unwrap();

        assert_eq!(config.build.collections.len(), 1);
        assert!(config.build.collections["notes"].exclude.is_empty());
    }

    #[test]
    fn test_unknown_field_rejection() {
        let result: Result<SiteConfig, _> = toml::from_str(
            r#"
            [build]
            typo = true
        "#,
        );
        assert!(result.is_err());
    }
}
