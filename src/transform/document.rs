//! One output page held in memory while the transform passes run.

use anyhow::Result;
use lol_html::{ElementContentHandlers, RewriteStrSettings, Selector, element, rewrite_str, text};
use std::{
    borrow::Cow,
    cell::RefCell,
    path::{Path, PathBuf},
};

pub type Handler<'h> = (Cow<'h, Selector>, ElementContentHandlers<'h>);

#[derive(Debug)]
pub struct Document {
    url: String,
    output_path: PathBuf,
    html: String,
}

/// Per-paragraph tallies from [`Document::lone_children`].
#[derive(Debug, Default)]
struct Paragraph {
    children: usize,
    matched: usize,
    text: String,
    child_text: String,
}

impl Paragraph {
    fn is_lone(&self) -> bool {
        let text = self.text.trim();
        self.children == 1
            && self.matched == 1
            && (text.is_empty() || text == self.child_text.trim())
    }
}

impl Document {
    pub fn new(url: impl Into<String>, output_path: impl Into<PathBuf>, html: String) -> Self {
        Self {
            url: url.into(),
            output_path: output_path.into(),
            html,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    /// Stream the markup through `handlers` and keep the result.
    pub fn rewrite(&mut self, handlers: Vec<Handler<'_>>) -> Result<()> {
        self.html = rewrite_str(
            &self.html,
            RewriteStrSettings {
                element_content_handlers: handlers,
                strict: false,
                ..RewriteStrSettings::default()
            },
        )?;
        Ok(())
    }

    /// For every `<p>` in document order, whether its only content is a
    /// single `child` element carrying a non-empty `required_attr`.
    ///
    /// Whitespace around the child doesn't count as content.
    pub fn lone_children(&self, child: &str, required_attr: &str) -> Result<Vec<bool>> {
        let paragraphs: RefCell<Vec<Paragraph>> = RefCell::new(Vec::new());
        let child_selector = format!("p > {child}");

        let with_last = |f: &mut dyn FnMut(&mut Paragraph)| {
            if let Some(paragraph) = paragraphs.borrow_mut().last_mut() {
                f(paragraph);
            }
        };

        rewrite_str(
            &self.html,
            RewriteStrSettings {
                element_content_handlers: vec![
                    element!("p", |_| {
                        paragraphs.borrow_mut().push(Paragraph::default());
                        Ok(())
                    }),
                    element!("p > *", |_| {
                        with_last(&mut |p: &mut Paragraph| p.children += 1);
                        Ok(())
                    }),
                    element!(child_selector, |el| {
                        let present = el
                            .get_attribute(required_attr)
                            .is_some_and(|value| !value.trim().is_empty());
                        if present {
                            with_last(&mut |p: &mut Paragraph| p.matched += 1);
                        }
                        Ok(())
                    }),
                    text!("p", |chunk| {
                        with_last(&mut |p: &mut Paragraph| p.text.push_str(chunk.as_str()));
                        Ok(())
                    }),
                    text!(child_selector, |chunk| {
                        with_last(&mut |p: &mut Paragraph| p.child_text.push_str(chunk.as_str()));
                        Ok(())
                    }),
                ],
                strict: false,
                ..RewriteStrSettings::default()
            },
        )?;

        Ok(paragraphs
            .into_inner()
            .iter()
            .map(Paragraph::is_lone)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(html: &str) -> Document {
        Document::new("/a/", "/dist/a/index.html", html.to_owned())
    }

    #[test]
    fn test_accessors() {
        let document = doc("<p>x</p>");
        assert_eq!(document.url(), "/a/");
        assert_eq!(document.output_path(), Path::new("/dist/a/index.html"));
        assert_eq!(document.html(), "<p>x</p>");
    }

    #[test]
    fn test_rewrite_replaces_markup() {
        let mut document = doc(r#"<p class="a">x</p>"#);
        document
            .rewrite(vec![element!("p", |el| {
                el.set_attribute("class", "b")?;
                Ok(())
            })])
            .unwrap();
        assert_eq!(document.html(), r#"<p class="b">x</p>"#);
    }

    #[test]
    fn test_lone_children() {
        let document = doc(concat!(
            r#"<p><img src="a.png" alt="A"></p>"#,
            r#"<p>text <img src="b.png" alt="B"></p>"#,
            r#"<p><img src="c.png" alt=""></p>"#,
            r#"<p><img src="d.png" alt="D"><img src="e.png" alt="E"></p>"#,
            "<p>\n  <img src=\"f.png\" alt=\"F\">\n</p>",
            r#"<p><a href="x"><img src="g.png" alt="G"></a></p>"#,
        ));

        assert_eq!(
            document.lone_children("img", "alt").unwrap(),
            [true, false, false, false, true, false]
        );
    }

    #[test]
    fn test_lone_link_with_text() {
        let document = doc(concat!(
            r#"<p><a href="demos/x/">Demo</a></p>"#,
            r#"<p>See <a href="demos/y/">this</a>.</p>"#,
            r#"<p><a href="demos/z/"><code>z</code> demo</a></p>"#,
        ));

        assert_eq!(
            document.lone_children(r#"a[href*="demos/"]"#, "href").unwrap(),
            [true, false, true]
        );
    }
}
