//! Markdown rendering with pulldown-cmark.
//!
//! Three entry points back the template filters of the same names:
//!
//! - [`render`]: block HTML, headings get slug ids
//! - [`render_inline`]: the same without paragraph wrappers
//! - [`remove`]: plain text with every bit of syntax stripped

use crate::utils::slug::{SlugCounter, slugify};
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html::push_html};

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Render Markdown to block-level HTML.
pub fn render(markdown: &str) -> String {
    let events = assign_heading_ids(Parser::new_ext(markdown, options()).collect());

    let mut html = String::with_capacity(markdown.len() * 3 / 2);
    push_html(&mut html, events.into_iter());
    html
}

/// Render Markdown to inline HTML: `**x**` becomes `<strong>x</strong>`.
pub fn render_inline(markdown: &str) -> String {
    let events = Parser::new_ext(markdown, options()).filter(|event| {
        !matches!(
            event,
            Event::Start(Tag::Paragraph) | Event::End(TagEnd::Paragraph)
        )
    });

    let mut html = String::with_capacity(markdown.len());
    push_html(&mut html, events);
    html
}

/// Strip Markdown down to its text. Blocks end up on separate lines.
pub fn remove(markdown: &str) -> String {
    let mut text = String::with_capacity(markdown.len());

    for event in Parser::new_ext(markdown, options()) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak => text.push(' '),
            Event::HardBreak | Event::Rule => text.push('\n'),
            Event::End(
                TagEnd::Paragraph
                | TagEnd::Heading(_)
                | TagEnd::Item
                | TagEnd::CodeBlock
                | TagEnd::BlockQuote(_)
                | TagEnd::TableCell
                | TagEnd::TableRow
                | TagEnd::TableHead,
            ) => text.push('\n'),
            _ => {}
        }
    }

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Give every heading an `id`.
///
/// Explicit `{#id}` attributes are kept and reserved up front so generated
/// slugs never collide with them.
fn assign_heading_ids(mut events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut counter = SlugCounter::default();
    for event in &events {
        if let Event::Start(Tag::Heading { id: Some(id), .. }) = event {
            counter.reserve(id);
        }
    }

    let mut open: Option<(usize, String)> = None;
    let mut slugs: Vec<(usize, String)> = Vec::new();
    for (index, event) in events.iter().enumerate() {
        match event {
            Event::Start(Tag::Heading { id: None, .. }) => open = Some((index, String::new())),
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, heading_text)) = open.as_mut() {
                    heading_text.push_str(text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((start, heading_text)) = open.take() {
                    slugs.push((start, counter.unique(slugify(&heading_text))));
                }
            }
            _ => {}
        }
    }

    for (start, slug) in slugs {
        if let Event::Start(Tag::Heading { id, .. }) = &mut events[start] {
            *id = Some(CowStr::from(slug));
        }
    }
    events
}
