//! Template engine (Tera, Jinja2/Nunjucks syntax).
//!
//! Includes, layouts and every page body are registered up front under their
//! path relative to the input directory, so `{% include "includes/nav.njk" %}`
//! and `{% extends "layouts/base.njk" %}` resolve like file paths. Rendering
//! only borrows the engine and runs on many threads at once.
//!
//! # Context
//!
//! ```text
//! {{ title }}, {{ tags }}, ...     front matter, top level
//! {{ page.url }}                   url, input_path, output_path, date
//! {{ global.domain }}              one key per data file
//! {{ collections.articles }}       see content::collections
//! {{ content }}                    inside layouts only
//! ```

pub mod filters;

use crate::{
    compiler::collect_all_files,
    config::SiteConfig,
    content::{Collections, Page, PageFormat, split_front_matter},
    markdown,
    utils::{date, glob},
};
use anyhow::{Context as _, Result, bail};
use regex::Regex;
use serde::Serialize;
use std::{
    borrow::Cow,
    collections::HashSet,
    fs,
    sync::OnceLock,
};
use tera::{Context, Tera, Value};

pub struct Templates<'c> {
    tera: Tera,
    layouts: HashSet<String>,
    config: &'c SiteConfig,
}

/// `page` in the template context.
#[derive(Debug, Serialize)]
struct PageInfo<'a> {
    url: &'a str,
    input_path: &'a str,
    output_path: String,
    date: String,
}

impl<'c> Templates<'c> {
    /// Parse includes, layouts and page bodies into one engine.
    pub fn load(config: &'c SiteConfig, pages: &[Page]) -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![".njk"]);
        tera.set_escape_fn(escape_html);
        filters::register(&mut tera, config.domain());

        let mut sources: Vec<(String, String)> = Vec::with_capacity(pages.len());
        let mut layouts = HashSet::new();

        for (dir, is_layout) in [(config.includes_dir(), false), (config.layouts_dir(), true)] {
            for path in collect_all_files(&dir) {
                let name = path
                    .strip_prefix(&config.build.input)
                    .map(glob::to_slash)
                    .with_context(|| format!("Template outside input: {}", path.display()))?;
                let content = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                let (_, body) = split_front_matter(&content);

                if is_layout {
                    layouts.insert(name.clone());
                }
                sources.push((name, body.to_owned()));
            }
        }

        sources.extend(pages.iter().map(|page| {
            let body = match page.format {
                PageFormat::Markdown => protect_heading_ids(&page.body),
                PageFormat::Nunjucks => Cow::Borrowed(page.body.as_str()),
            };
            (page.relative.clone(), body.into_owned())
        }));

        tera.add_raw_templates(sources)
            .context("Failed to parse templates")?;

        Ok(Self {
            tera,
            layouts,
            config,
        })
    }

    /// Collections as a template value, converted once per build.
    pub fn collections_value(collections: &Collections) -> Result<Value> {
        tera::to_value(collections).context("Failed to convert collections")
    }

    /// Render the page body: template engine, then Markdown for `.md`.
    pub fn render_body(&self, page: &Page, collections: &Value) -> Result<String> {
        let context = self.context(page, collections)?;
        self.render_content(page, &context)
    }

    /// Render the complete page: body, then its layout if it names one.
    pub fn render_page(&self, page: &Page, collections: &Value) -> Result<String> {
        let mut context = self.context(page, collections)?;
        let content = self.render_content(page, &context)?;

        let Some(layout) = &page.front.layout else {
            return Ok(content);
        };
        let layout = self.layout_name(layout)?;
        context.insert("content", &content);
        self.tera
            .render(&layout, &context)
            .with_context(|| format!("Failed to render layout {layout} for {}", page.relative))
    }

    fn render_content(&self, page: &Page, context: &Context) -> Result<String> {
        let body = self
            .tera
            .render(&page.relative, context)
            .with_context(|| format!("Failed to render {}", page.relative))?;

        Ok(match page.format {
            PageFormat::Markdown => markdown::render(&body),
            PageFormat::Nunjucks => body,
        })
    }

    /// `layout: article` or `layout: article.njk` → `layouts/article.njk`.
    fn layout_name(&self, layout: &str) -> Result<String> {
        let prefix = glob::to_slash(&self.config.build.layouts);
        let base = format!("{prefix}/{}", layout.trim_start_matches('/'));

        if self.layouts.contains(&base) {
            return Ok(base);
        }
        let with_ext = format!("{base}.njk");
        if self.layouts.contains(&with_ext) {
            return Ok(with_ext);
        }
        bail!("Layout `{layout}` not found in {}", self.config.layouts_dir().display())
    }

    fn context(&self, page: &Page, collections: &Value) -> Result<Context> {
        let mut context = Context::new();
        for (stem, value) in &self.config.data.files {
            context.insert(stem, value);
        }

        let front = Context::from_serialize(&page.data)
            .with_context(|| format!("Front matter of {} has non-string keys", page.relative))?;
        context.extend(front);

        context.insert(
            "page",
            &PageInfo {
                url: &page.url,
                input_path: &page.relative,
                output_path: page.output_relative(self.config),
                date: date::format_iso(page.date),
            },
        );
        context.insert("collections", collections);
        Ok(context)
    }
}

/// Escape the way Nunjucks does: `& < > " '` only, so URLs keep their `/`.
fn escape_html(input: &str) -> String {
    html_escape::encode_quoted_attribute(input).into_owned()
}

fn heading_ids_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::unwrap_used)] // literal pattern
    RE.get_or_init(|| Regex::new(r"(?m)^( {0,3}#{1,6}[ \t].*?)(\{#[^}\n]*\})[ \t]*$").unwrap())
}

/// Wrap heading attributes like `## Setup {#install}` in a raw block.
///
/// `{#` opens a template comment, so the attribute would otherwise never
/// reach the Markdown renderer.
fn protect_heading_ids(body: &str) -> Cow<'_, str> {
    heading_ids_regex().replace_all(body, "${1}{% raw %}${2}{% endraw %}")
}
