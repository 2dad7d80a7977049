use crate::compiler::assets::create_parent;
use crate::config::SiteConfig;
use crate::content::{Collections, Page, PageFormat, build_collections};
use crate::template::Templates;
use crate::transform::{Document, Pipeline};
use crate::utils::minify::{MinifyType, minify};
use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tera::Value;

// ============================================================================
// Public API
// ============================================================================

/// Parse every page source in parallel.
///
/// Fails when two published pages would write the same output file.
pub fn load_pages(sources: &[(PathBuf, PageFormat)], config: &SiteConfig) -> Result<Vec<Page>> {
    let pages = sources
        .par_iter()
        .map(|(path, format)| Page::load(path, *format, config))
        .collect::<Result<Vec<_>>>()?;

    let mut seen: HashMap<&Path, &str> = HashMap::new();
    for page in pages.iter().filter(|page| page.is_published(config)) {
        if let Some(other) = seen.insert(page.output.as_path(), page.relative.as_str()) {
            bail!(
                "{} and {} both write {}",
                other,
                page.relative,
                page.output.display()
            );
        }
    }

    Ok(pages)
}

/// Render, transform, minify and write every published page.
///
/// Markdown bodies are rendered once up front so collections can carry
/// their HTML; the final render then sees complete collections.
/// Calls `on_progress` after each page is written.
pub fn build_pages(
    pages: &[Page],
    config: &SiteConfig,
    on_progress: impl Fn() + Sync,
) -> Result<()> {
    let templates = Templates::load(config, pages)?;
    let pipeline = Pipeline::standard(config);

    let contents = render_contents(pages, &templates, config)?;
    let collections = build_collections(pages, &contents, config);
    let collections = Templates::collections_value(&collections)?;

    pages
        .par_iter()
        .filter(|page| page.is_published(config))
        .try_for_each(|page| {
            write_page(page, &templates, &collections, &pipeline, config)?;
            on_progress();
            Ok(())
        })
}

/// Pages that will actually be written.
pub fn published_count(pages: &[Page], config: &SiteConfig) -> usize {
    pages
        .iter()
        .filter(|page| page.is_published(config))
        .count()
}

// ============================================================================
// Internal
// ============================================================================

/// Body HTML of every non-draft Markdown page, keyed by relative path.
///
/// Collections are empty at this point; a body that lists a collection
/// sees no items.
fn render_contents(
    pages: &[Page],
    templates: &Templates<'_>,
    config: &SiteConfig,
) -> Result<HashMap<String, String>> {
    let empty: Collections = config
        .build
        .collections
        .keys()
        .map(|name| (name.clone(), Vec::new()))
        .collect();
    let empty = Templates::collections_value(&empty)?;

    pages
        .par_iter()
        .filter(|page| page.format == PageFormat::Markdown && !page.is_draft())
        .map(|page| {
            let html = templates.render_body(page, &empty)?;
            Ok((page.relative.clone(), html))
        })
        .collect()
}

fn write_page(
    page: &Page,
    templates: &Templates<'_>,
    collections: &Value,
    pipeline: &Pipeline,
    config: &SiteConfig,
) -> Result<()> {
    let rendered = templates.render_page(page, collections)?;

    let output = match page.output.extension().and_then(|ext| ext.to_str()) {
        Some("html") => {
            let mut document = Document::new(&page.url, &page.output, rendered);
            pipeline
                .run(&mut document, &page.body)
                .with_context(|| format!("Failed to transform {}", page.relative))?;
            minify(MinifyType::Html(document.html().as_bytes()), config)?.into_owned()
        }
        Some("xml") => minify(MinifyType::Xml(rendered.as_bytes()), config)
            .with_context(|| format!("Failed to minify {}", page.relative))?
            .into_owned(),
        _ => rendered.into_bytes(),
    };

    create_parent(&page.output)?;
    fs::write(&page.output, output)
        .with_context(|| format!("Failed to write {}", page.output.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup(files: &[(&str, &str)]) -> (TempDir, SiteConfig, Vec<(PathBuf, PageFormat)>) {
        let dir = TempDir::new().unwrap();
        let mut config = SiteConfig::default();
        config.build.input = dir.path().join("src");
        config.build.output = dir.path().join("dist");

        let mut sources = Vec::new();
        for (relative, content) in files {
            let path = config.build.input.join(relative);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, content).unwrap();
            if relative.ends_with(".md") {
                sources.push((path, PageFormat::Markdown));
            } else if !relative.starts_with("layouts/") {
                sources.push((path, PageFormat::Nunjucks));
            }
        }
        fs::create_dir_all(config.data_dir()).unwrap();
        fs::write(config.data_dir().join("global.yml"), "domain: https://example.com\n").unwrap();
        config.data = crate::config::SiteData::load(&config.data_dir(), "global").unwrap();
        (dir, config, sources)
    }

    #[test]
    fn test_collections_carry_rendered_content() {
        let (_dir, config, sources) = setup(&[
            ("articles/a/index.md", "---\ntitle: A\ndate: 2024-01-01\n---\n**hi**"),
            ("articles/b/index.md", "---\ntitle: B\ndate: 2024-02-01\ndraft: true\n---\nsecret"),
            (
                "feed.njk",
                "---\npermalink: /feed.xml\n---\n<feed>\n  {% for item in collections.articles %}<entry>{{ item.content | safe }}</entry>\n  {% endfor %}</feed>",
            ),
        ]);
        let pages = load_pages(&sources, &config).unwrap();
        build_pages(&pages, &config, || {}).unwrap();

        let feed = fs::read_to_string(config.build.output.join("feed.xml")).unwrap();
        assert_eq!(feed, "<feed><entry><p><strong>hi</strong></p></entry></feed>");
        assert!(config.build.output.join("articles/a/index.html").exists());
        assert!(!config.build.output.join("articles/b/index.html").exists());
    }

    #[test]
    fn test_html_goes_through_pipeline_and_minifier() {
        let (_dir, config, sources) = setup(&[
            ("layouts/base.njk", "<html><head></head><body>{{ content | safe }}</body></html>"),
            ("about.md", "---\nlayout: base\n---\n## Who\n\n<!-- note -->\nMe."),
        ]);
        let pages = load_pages(&sources, &config).unwrap();
        build_pages(&pages, &config, || {}).unwrap();

        let html = fs::read_to_string(config.build.output.join("about/index.html")).unwrap();
        assert!(html.contains("heading-anchor"));
        assert!(!html.contains("note"));
    }

    #[test]
    fn test_duplicate_output_is_error() {
        let (_dir, config, sources) = setup(&[
            ("about.md", "a"),
            ("about/index.md", "b"),
        ]);
        let err = load_pages(&sources, &config).unwrap_err();
        assert!(format!("{err}").contains("about/index.html"));
    }

    #[test]
    fn test_failing_transform_writes_nothing() {
        let (_dir, config, sources) = setup(&[("broken.md", "![alt](missing.png)")]);
        let pages = load_pages(&sources, &config).unwrap();

        let err = build_pages(&pages, &config, || {}).unwrap_err();
        assert!(format!("{err:#}").contains("transform `images` failed"));
        assert!(!config.build.output.join("broken/index.html").exists());
    }

    #[test]
    fn test_published_count_skips_drafts() {
        let (_dir, config, sources) = setup(&[
            ("a.md", "x"),
            ("b.md", "---\ndraft: true\n---\ny"),
        ]);
        let pages = load_pages(&sources, &config).unwrap();
        assert_eq!(published_count(&pages, &config), 1);
    }
}
