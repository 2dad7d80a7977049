//! Paragraphs holding a single captioned image become `<figure>`s.
//!
//! The caption is the image's `alt`, rendered as inline Markdown so authors
//! can use emphasis and links in it.

use super::{Document, Transform};
use crate::markdown;
use anyhow::Result;
use lol_html::{element, html_content::ContentType};
use std::{cell::Cell, path::Path};

pub struct Figures;

impl Transform for Figures {
    fn name(&self) -> &'static str {
        "figures"
    }

    fn apply(&self, document: &mut Document, _: &str, _: &Path) -> Result<()> {
        let lone = document.lone_children("img", "alt")?;
        if !lone.contains(&true) {
            return Ok(());
        }

        let index = Cell::new(0usize);
        let current = Cell::new(false);

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
            element!("p > img", |el| {
                if !current.get() {
                    return Ok(());
                }
                let alt = el.get_attribute("alt").unwrap_or_default();
                let caption = markdown::render_inline(&html_escape::decode_html_entities(&alt));
                el.before("<figure>", ContentType::Html);
                el.after(
                    &format!("<figcaption>{caption}</figcaption></figure>"),
                    ContentType::Html,
                );
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
        Figures.apply(&mut document, "", Path::new("")).unwrap();
        document.html().to_owned()
    }

    #[test]
    fn test_captioned_image_becomes_figure() {
        assert_eq!(
            run(r#"<p><img src="a.png" alt="A **bold** cat"></p>"#),
            r#"<figure><img src="a.png" alt="A **bold** cat"><figcaption>A <strong>bold</strong> cat</figcaption></figure>"#
        );
    }

    #[test]
    fn test_image_without_alt_untouched() {
        let html = r#"<p><img src="a.png" alt=""></p><p><img src="b.png"></p>"#;
        assert_eq!(run(html), html);
    }

    #[test]
    fn test_image_with_text_untouched() {
        let html = r#"<p>See <img src="a.png" alt="A"></p>"#;
        assert_eq!(run(html), html);
    }

    #[test]
    fn test_only_lone_paragraphs_change() {
        let out = run(r#"<p>intro</p><p><img src="a.png" alt="A"></p><p>outro</p>"#);
        assert_eq!(
            out,
            r#"<p>intro</p><figure><img src="a.png" alt="A"><figcaption>A</figcaption></figure><p>outro</p>"#
        );
    }
}
