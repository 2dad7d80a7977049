use super::{Document, Transform};
use anyhow::Result;
use lol_html::element;
use std::path::Path;

/// Focusable code blocks with a `data-language` hook for styling.
pub struct Code;

impl Transform for Code {
    fn name(&self) -> &'static str {
        "code"
    }

    fn apply(&self, document: &mut Document, _: &str, _: &Path) -> Result<()> {
        document.rewrite(vec![
            element!("pre", |el| {
                if !el.has_attribute("tabindex") {
                    el.set_attribute("tabindex", "0")?;
                }
                Ok(())
            }),
            element!("pre > code[class]", |el| {
                let class = el.get_attribute("class").unwrap_or_default();
                let language = class
                    .split_whitespace()
                    .find_map(|name| name.strip_prefix("language-"))
                    .filter(|language| !language.is_empty());
                if let Some(language) = language {
                    el.set_attribute("data-language", language)?;
                }
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
        Code.apply(&mut document, "", Path::new("")).unwrap();
        document.html().to_owned()
    }

    #[test]
    fn test_language_and_tabindex() {
        assert_eq!(
            run(r#"<pre><code class="language-js">x</code></pre>"#),
            r#"<pre tabindex="0"><code class="language-js" data-language="js">x</code></pre>"#
        );
    }

    #[test]
    fn test_plain_block_and_inline_code() {
        assert_eq!(
            run(r#"<pre><code>x</code></pre><p><code class="language-js">y</code></p>"#),
            r#"<pre tabindex="0"><code>x</code></pre><p><code class="language-js">y</code></p>"#
        );
    }
}
