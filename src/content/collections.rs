//! Named page collections (`collections.articles`, `collections.sitemap`).
//!
//! A collection is every page whose input path matches one of its include
//! globs and none of its exclude globs, minus drafts, ordered by date and
//! then input path.

use super::Page;
use crate::{
    config::{CollectionConfig, SiteConfig},
    utils::{date, glob},
};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// One page as seen from a template.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionItem {
    pub url: String,
    pub input_path: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// Front matter.
    pub data: serde_yaml::Mapping,
    /// Rendered body HTML (Markdown pages only).
    pub content: String,
}

pub type Collections = BTreeMap<String, Vec<CollectionItem>>;

/// Build every configured collection.
///
/// `contents` maps a page's relative path to its rendered body.
pub fn build_collections(
    pages: &[Page],
    contents: &HashMap<String, String>,
    config: &SiteConfig,
) -> Collections {
    config
        .build
        .collections
        .iter()
        .map(|(name, rule)| (name.clone(), collect(pages, contents, rule)))
        .collect()
}

fn collect(
    pages: &[Page],
    contents: &HashMap<String, String>,
    rule: &CollectionConfig,
) -> Vec<CollectionItem> {
    let mut members: Vec<&Page> = pages
        .iter()
        .filter(|page| !page.is_draft() && is_member(&page.relative, rule))
        .collect();
    members.sort_by(|a, b| (a.date, &a.relative).cmp(&(b.date, &b.relative)));

    members
        .into_iter()
        .map(|page| CollectionItem {
            url: page.url.clone(),
            input_path: page.relative.clone(),
            date: date::format_iso(page.date),
            data: page.data.clone(),
            content: contents.get(&page.relative).cloned().unwrap_or_default(),
        })
        .collect()
}

fn is_member(relative: &str, rule: &CollectionConfig) -> bool {
    glob::matches_any(&rule.include, relative) && !glob::matches_any(&rule.exclude, relative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{FrontMatter, PageFormat};
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn page(relative: &str, date: (i32, u32, u32), draft: bool) -> Page {
        let url = format!("/{}/", relative.trim_end_matches("/index.md"));
        Page {
            source: PathBuf::from("src").join(relative),
            relative: relative.to_owned(),
            format: PageFormat::Markdown,
            front: FrontMatter {
                draft,
                ..FrontMatter::default()
            },
            data: serde_yaml::Mapping::new(),
            body: String::new(),
            url,
            output: PathBuf::new(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        }
    }

    fn site() -> Vec<Page> {
        vec![
            page("articles/b/index.md", (2024, 5, 1), false),
            page("articles/a/index.md", (2023, 1, 1), false),
            page("articles/wip/index.md", (2024, 6, 1), true),
            page("articles/c/index.md", (2024, 5, 1), false),
            page("about.md", (2022, 1, 1), false),
            page("404.njk", (2022, 1, 1), false),
            page("feed.njk", (2022, 1, 1), false),
        ]
    }

    fn inputs(items: &[CollectionItem]) -> Vec<&str> {
        items.iter().map(|item| item.input_path.as_str()).collect()
    }

    #[test]
    fn test_articles_sorted_without_drafts() {
        let collections = build_collections(&site(), &HashMap::new(), &SiteConfig::default());

        assert_eq!(
            inputs(&collections["articles"]),
            ["articles/a/index.md", "articles/b/index.md", "articles/c/index.md"]
        );
    }

    #[test]
    fn test_sitemap_excludes_error_page_and_drafts() {
        let collections = build_collections(&site(), &HashMap::new(), &SiteConfig::default());
        let sitemap = inputs(&collections["sitemap"]);

        assert!(sitemap.contains(&"about.md"));
        assert!(sitemap.contains(&"feed.njk"));
        assert!(!sitemap.contains(&"404.njk"));
        assert!(!sitemap.contains(&"articles/wip/index.md"));
    }

    #[test]
    fn test_each_article_appears_once() {
        let collections = build_collections(&site(), &HashMap::new(), &SiteConfig::default());

        for name in ["articles", "sitemap"] {
            let items = inputs(&collections[name]);
            for article in ["articles/a/index.md", "articles/b/index.md", "articles/c/index.md"] {
                assert_eq!(items.iter().filter(|i| **i == article).count(), 1, "{name}");
            }
        }
    }

    #[test]
    fn test_items_carry_content_and_iso_date() {
        let contents = HashMap::from([(
            "articles/a/index.md".to_owned(),
            "<p>Hello</p>".to_owned(),
        )]);
        let collections = build_collections(&site(), &contents, &SiteConfig::default());
        let first = &collections["articles"][0];

        assert_eq!(first.content, "<p>Hello</p>");
        assert_eq!(first.date, "2023-01-01");
        assert_eq!(first.url, "/articles/a/");
    }
}
