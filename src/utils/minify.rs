//! Minification utilities for HTML and XML.
//!
//! `minify` picks the minifier from the content type and returns the input
//! untouched when `build.minify` is off.

use crate::config::SiteConfig;
use anyhow::{Context, Result};
use quick_xml::{Reader, events::Event};
use std::{borrow::Cow, ops::Range};

// ============================================================================
// Types
// ============================================================================

/// Content type for minification.
pub enum MinifyType<'a> {
    /// HTML content
    Html(&'a [u8]),
    /// XML content
    Xml(&'a [u8]),
}

// ============================================================================
// Unified Minify Function
// ============================================================================

/// Minify content based on type and config.
///
/// Returns `Cow::Borrowed` if minify disabled, `Cow::Owned` if minified.
pub fn minify<'a>(content: MinifyType<'a>, config: &SiteConfig) -> Result<Cow<'a, [u8]>> {
    if !config.build.minify {
        return Ok(match content {
            MinifyType::Html(html) => Cow::Borrowed(html),
            MinifyType::Xml(xml) => Cow::Borrowed(xml),
        });
    }
    match content {
        MinifyType::Html(html) => Ok(Cow::Owned(minify_html_inner(html))),
        MinifyType::Xml(xml) => minify_xml_inner(xml).map(Cow::Owned),
    }
}

// ============================================================================
// Internal Implementation
// ============================================================================

/// Minify HTML content using `minify_html` crate.
///
/// Closing tags and the `html`/`head` opening tags are kept; nothing is
/// synthesized.
fn minify_html_inner(html: &[u8]) -> Vec<u8> {
    let mut cfg = minify_html::Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.keep_comments = false;
    cfg.minify_css = true;
    cfg.minify_js = true;
    cfg.remove_bangs = true;
    cfg.remove_processing_instructions = true;
    minify_html::minify(html, &cfg)
}

/// Drop whitespace-only text between markup.
///
/// Every other event is copied from the input byte-for-byte, so text,
/// CDATA, comments and declarations are never re-encoded. Whitespace next
/// to an entity reference is character data and is kept.
fn minify_xml_inner(xml: &[u8]) -> Result<Vec<u8>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);
    reader.config_mut().enable_all_checks(false);

    let mut out = Vec::with_capacity(xml.len());
    let mut pending: Option<Range<usize>> = None;
    let mut after_ref = false;

    loop {
        let start = position(&reader);
        let event = reader
            .read_event()
            .with_context(|| format!("Malformed XML at byte {start}"))?;
        let span = start..position(&reader);

        match event {
            Event::Eof => break,
            Event::Text(text) if text.iter().all(u8::is_ascii_whitespace) => {
                if after_ref {
                    out.extend_from_slice(&xml[span]);
                } else {
                    pending = Some(span);
                }
                after_ref = false;
            }
            Event::GeneralRef(_) => {
                if let Some(ws) = pending.take() {
                    out.extend_from_slice(&xml[ws]);
                }
                out.extend_from_slice(&xml[span]);
                after_ref = true;
            }
            _ => {
                pending = None;
                after_ref = false;
                out.extend_from_slice(&xml[span]);
            }
        }
    }

    Ok(out)
}

#[allow(clippy::cast_possible_truncation)] // in-memory input
fn position(reader: &Reader<&[u8]>) -> usize {
    reader.buffer_position() as usize
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_minify(enabled: bool) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.build.minify = enabled;
        config
    }

    fn xml(input: &[u8]) -> String {
        let result = minify(MinifyType::Xml(input), &config_with_minify(true)).unwrap();
        String::from_utf8(result.into_owned()).unwrap()
    }

    // HTML minification tests

    #[test]
    fn test_minify_html_basic() {
        let html = b"<html>\n  <head>\n  </head>\n  <body>\n    <p>Hello</p>\n  </body>\n</html>";
        let result = minify(MinifyType::Html(html), &config_with_minify(true)).unwrap();
        let result_str = String::from_utf8_lossy(&result);

        assert!(!result_str.contains("\n  "));
        assert!(result_str.contains("<p>Hello</p>"));
        assert!(result_str.contains("<html>"));
        assert!(result_str.contains("<head>"));
    }

    #[test]
    fn test_minify_html_strips_comments_and_collapses_booleans() {
        let html = b"<p>a<!-- note --></p><input disabled=\"disabled\">";
        let result = minify(MinifyType::Html(html), &config_with_minify(true)).unwrap();
        let result_str = String::from_utf8_lossy(&result);

        assert!(!result_str.contains("note"));
        assert!(result_str.contains("</p>"));
        assert!(result_str.contains("disabled"));
        assert!(!result_str.contains("disabled=\"disabled\""));
    }

    #[test]
    fn test_minify_html_disabled() {
        let html = b"<html>\n  <body>\n  </body>\n</html>";
        let result = minify(MinifyType::Html(html), &config_with_minify(false)).unwrap();

        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(&*result, html);
    }

    // XML minification tests

    #[test]
    fn test_minify_xml_basic() {
        let input = br#"<?xml version="1.0"?>
<root>
  <item>Hello</item>
</root>"#;
        assert_eq!(xml(input), r#"<?xml version="1.0"?><root><item>Hello</item></root>"#);
    }

    #[test]
    fn test_minify_xml_keeps_text_verbatim() {
        let input = b"<root>\n  <t>  padded  text  </t>\n</root>";
        assert_eq!(xml(input), "<root><t>  padded  text  </t></root>");
    }

    #[test]
    fn test_minify_xml_keeps_cdata_and_comments() {
        let input = b"<feed>\n  <!-- generated -->\n  <content><![CDATA[\n  <p>x</p>\n]]></content>\n</feed>";
        assert_eq!(
            xml(input),
            "<feed><!-- generated --><content><![CDATA[\n  <p>x</p>\n]]></content></feed>"
        );
    }

    #[test]
    fn test_minify_xml_keeps_whitespace_around_entities() {
        let input = b"<t>a &amp; b</t>\n<u>&lt; </u>";
        assert_eq!(xml(input), "<t>a &amp; b</t><u>&lt; </u>");
    }

    #[test]
    fn test_minify_xml_sitemap_like() {
        let input = br#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url>
    <loc>https://example.com/</loc>
    <lastmod>2025-01-01</lastmod>
  </url>
</urlset>"#;
        let result = xml(input);

        assert!(!result.contains('\n'));
        assert!(result.contains(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#));
        assert!(result.contains("<loc>https://example.com/</loc>"));
    }

    #[test]
    fn test_minify_xml_disabled() {
        let input = b"<root>\n  <item/>\n</root>";
        let result = minify(MinifyType::Xml(input), &config_with_minify(false)).unwrap();
        assert_eq!(&*result, input.as_slice());
    }
}
