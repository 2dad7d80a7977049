//! Paragraphs holding a single link into `demos/` become embedded frames.

use super::{Document, Transform};
use anyhow::Result;
use lol_html::{element, html_content::ContentType};
use std::{cell::Cell, path::Path};

/// Same-site links only; `https://host/demos/` stays a plain link.
const LINK: &str = r#"a[href*="demos/"]:not([href*="://"]):not([href^="//"])"#;

pub struct Demos;

impl Transform for Demos {
    fn name(&self) -> &'static str {
        "demos"
    }

    fn apply(&self, document: &mut Document, _: &str, _: &Path) -> Result<()> {
        let lone = document.lone_children(LINK, "href")?;
        if !lone.contains(&true) {
            return Ok(());
        }

        let index = Cell::new(0usize);
        let current = Cell::new(false);
        let link = format!("p > {LINK}");

        document.rewrite(vec![
            element!("p", |el| {
                let is_lone = lone.get(index.get()).copied().unwrap_or(false);
                index.set(index.get() + 1);
                current.set(is_lone);
                if is_lone {
                    el.remove_and_keep_content();
                }
                Ok(())
            }),
            element!(link, |el| {
                if !current.get() {
                    return Ok(());
                }
                let href = el.get_attribute("href").unwrap_or_default();
                el.before(
                    &format!(
                        r#"<figure class="demo"><iframe src="{}" loading="lazy"></iframe><figcaption>"#,
                        href.replace('"', "&quot;")
                    ),
                    ContentType::Html,
                );
                el.after("</figcaption></figure>", ContentType::Html);
                Ok(())
            }),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(html: &str) -> String {
        let mut document = Document::new("/a/", "/dist/a/index.html", html.to_owned());
        Demos.apply(&mut document, "", Path::new("")).unwrap();
        document.html().to_owned()
    }

    #[test]
    fn test_lone_demo_link_embedded() {
        assert_eq!(
            run(r#"<p><a href="demos/grid/">Grid</a></p>"#),
            concat!(
                r#"<figure class="demo"><iframe src="demos/grid/" loading="lazy"></iframe>"#,
                r#"<figcaption><a href="demos/grid/">Grid</a></figcaption></figure>"#,
            )
        );
    }

    #[test]
    fn test_inline_demo_link_untouched() {
        let html = r#"<p>Try <a href="demos/grid/">this</a> out.</p>"#;
        assert_eq!(run(html), html);
    }

    #[test]
    fn test_other_links_untouched() {
        let html = r#"<p><a href="/about/">About</a></p><p><a href="demos/x/">X</a></p>"#;
        let out = run(html);
        assert!(out.starts_with(r#"<p><a href="/about/">About</a></p><figure class="demo">"#));
    }

    #[test]
    fn test_external_demo_link_untouched() {
        let html = concat!(
            r#"<p><a href="https://github.com/x/demos/">Repo</a></p>"#,
            r#"<p><a href="//cdn.example.com/demos/a/">CDN</a></p>"#,
        );
        assert_eq!(run(html), html);
    }

    #[test]
    fn test_root_relative_demo_link_embedded() {
        assert!(run(r#"<p><a href="/demos/grid/">Grid</a></p>"#)
            .starts_with(r#"<figure class="demo"><iframe src="/demos/grid/""#));
    }
}
