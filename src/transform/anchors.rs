//! Self-links after section headings.

use super::{Document, Transform};
use anyhow::Result;
use lol_html::{element, html_content::ContentType};
use std::path::Path;

pub struct Anchors;

impl Transform for Anchors {
    fn name(&self) -> &'static str {
        "anchors"
    }

    fn apply(&self, document: &mut Document, _: &str, _: &Path) -> Result<()> {
        let append_anchor = |el: &mut lol_html::html_content::Element<'_, '_>| {
            if let Some(id) = el.get_attribute("id").filter(|id| !id.is_empty()) {
                let id = html_escape::encode_double_quoted_attribute(&id);
                el.append(
                    &format!(
                        r##"<a class="heading-anchor" href="#{id}" aria-label="Link to this section">#</a>"##
                    ),
                    ContentType::Html,
                );
            }
        };

        document.rewrite(vec![
            element!("h2[id]", |el| {
                append_anchor(el);
                Ok(())
            }),
            element!("h3[id]", |el| {
                append_anchor(el);
                Ok(())
            }),
            element!("h4[id]", |el| {
                append_anchor(el);
                Ok(())
            }),
            element!("h5[id]", |el| {
                append_anchor(el);
                Ok(())
            }),
            element!("h6[id]", |el| {
                append_anchor(el);
                Ok(())
            }),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(html: &str) -> String {
        let mut document = Document::new("/", "/dist/index.html", html.to_owned());
        Anchors.apply(&mut document, "", Path::new("")).unwrap();
        document.html().to_owned()
    }

    #[test]
    fn test_anchor_appended() {
        assert_eq!(
            run(r#"<h2 id="setup">Setup</h2>"#),
            r##"<h2 id="setup">Setup<a class="heading-anchor" href="#setup" aria-label="Link to this section">#</a></h2>"##
        );
    }

    #[test]
    fn test_h1_and_missing_id_untouched() {
        let html = r#"<h1 id="title">Title</h1><h3>No id</h3>"#;
        assert_eq!(run(html), html);
    }

    #[test]
    fn test_every_level() {
        let out = run(r#"<h4 id="a">A</h4><h6 id="b">B</h6>"#);
        assert_eq!(out.matches("heading-anchor").count(), 2);
    }
}
