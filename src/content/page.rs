//! Pages: `.md` and `.njk` sources with front matter.
//!
//! # URLs
//!
//! | Source                   | URL              | Output                          |
//! |--------------------------|------------------|---------------------------------|
//! | `index.njk`              | `/`              | `dist/index.html`               |
//! | `about.md`               | `/about/`        | `dist/about/index.html`         |
//! | `articles/a/index.md`    | `/articles/a/`   | `dist/articles/a/index.html`    |
//! | `feed.njk` + `permalink: /feed.xml` | `/feed.xml` | `dist/feed.xml`          |

use super::split_front_matter;
use crate::{
    config::SiteConfig,
    utils::{date, glob},
};
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageFormat {
    /// Template engine first, then Markdown.
    Markdown,
    /// Template engine only.
    Nunjucks,
}

/// Front matter keys the build itself reads. Every key, these included, is
/// also passed to templates through [`Page::data`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub date: Option<serde_yaml::Value>,
    pub draft: bool,
    /// Layout file name under the layouts directory.
    pub layout: Option<String>,
    /// Output URL override, e.g. `/feed.xml` or `/about-me/`.
    pub permalink: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Page {
    /// Absolute source path.
    pub source: PathBuf,
    /// `/`-separated path relative to the input directory; also the body's
    /// template name.
    pub relative: String,
    pub format: PageFormat,
    pub front: FrontMatter,
    /// The full front matter mapping.
    pub data: serde_yaml::Mapping,
    /// Source text after the front matter.
    pub body: String,
    pub url: String,
    pub output: PathBuf,
    /// Front matter `date`, else the file's modification date.
    pub date: NaiveDate,
}

impl Page {
    pub fn load(source: &Path, format: PageFormat, config: &SiteConfig) -> Result<Self> {
        let content = fs::read_to_string(source)
            .with_context(|| format!("Failed to read {}", source.display()))?;
        let relative = source
            .strip_prefix(&config.build.input)
            .map(glob::to_slash)
            .map_err(|_| anyhow!("File is not in input directory: {}", source.display()))?;

        let (yaml, body) = split_front_matter(&content);
        let data = parse_data(yaml.unwrap_or_default())
            .with_context(|| format!("Invalid front matter in {relative}"))?;
        let front: FrontMatter = serde_yaml::from_value(serde_yaml::Value::Mapping(data.clone()))
            .with_context(|| format!("Invalid front matter in {relative}"))?;

        let date = match &front.date {
            Some(value) => parse_date(value)
                .ok_or_else(|| anyhow!("Invalid date `{value:?}` in {relative}"))?,
            None => modified_date(source)?,
        };

        let url = match &front.permalink {
            Some(permalink) => normalize_permalink(permalink),
            None => url_from_relative(&relative),
        };
        let output = output_path(&url, &config.build.output);

        Ok(Self {
            source: source.to_path_buf(),
            relative,
            format,
            front,
            data,
            body: body.to_owned(),
            url,
            output,
            date,
        })
    }

    pub const fn is_draft(&self) -> bool {
        self.front.draft
    }

    /// Whether the page is written on this build.
    pub const fn is_published(&self, config: &SiteConfig) -> bool {
        !self.front.draft || config.build.drafts
    }

    /// Output path relative to the output directory, `/`-separated.
    pub fn output_relative(&self, config: &SiteConfig) -> String {
        self.output
            .strip_prefix(&config.build.output)
            .map(glob::to_slash)
            .unwrap_or_else(|_| self.output.display().to_string())
    }
}

fn parse_data(yaml: &str) -> Result<serde_yaml::Mapping> {
    if yaml.trim().is_empty() {
        return Ok(serde_yaml::Mapping::new());
    }
    match serde_yaml::from_str::<serde_yaml::Value>(yaml)? {
        serde_yaml::Value::Mapping(map) => Ok(map),
        serde_yaml::Value::Null => Ok(serde_yaml::Mapping::new()),
        _ => Err(anyhow!("front matter must be a mapping")),
    }
}

fn parse_date(value: &serde_yaml::Value) -> Option<NaiveDate> {
    match value {
        serde_yaml::Value::String(s) => date::parse(s),
        serde_yaml::Value::Number(n) => n.as_i64().and_then(date::from_unix),
        _ => None,
    }
}

fn modified_date(source: &Path) -> Result<NaiveDate> {
    let modified = source
        .metadata()
        .and_then(|meta| meta.modified())
        .with_context(|| format!("Failed to read mtime of {}", source.display()))?;
    Ok(date::from_system_time(modified))
}

/// `x/index.md` → `/x/`, `x/name.njk` → `/x/name/`, `index.njk` → `/`.
fn url_from_relative(relative: &str) -> String {
    let stem = relative
        .rsplit_once('.')
        .map_or(relative, |(stem, _)| stem);
    let stem = match stem.rsplit_once('/') {
        Some((dir, "index")) => dir,
        None if stem == "index" => "",
        _ => stem,
    };

    if stem.is_empty() {
        "/".to_owned()
    } else {
        format!("/{stem}/")
    }
}

fn normalize_permalink(permalink: &str) -> String {
    let permalink = permalink.trim();
    if permalink.starts_with('/') {
        permalink.to_owned()
    } else {
        format!("/{permalink}")
    }
}

/// URLs ending in `/` get an `index.html`; anything else is a file path.
fn output_path(url: &str, output: &Path) -> PathBuf {
    let trimmed = url.trim_start_matches('/');
    if url.ends_with('/') {
        output.join(trimmed).join("index.html")
    } else {
        output.join(trimmed)
    }
}
