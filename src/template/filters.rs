//! Template filters.
//!
//! | Filter            | Input              | Output                              |
//! |-------------------|--------------------|-------------------------------------|
//! | `markdown`        | Markdown           | block HTML                          |
//! | `markdownInline`  | Markdown           | inline HTML                         |
//! | `markdownRemove`  | Markdown           | plain text                          |
//! | `absolute(url=)`  | HTML               | `src`/`href` made absolute          |
//! | `dateLong`        | date               | `March 5, 2024`                     |
//! | `dateShort`       | date               | `March 5` (this year) or long form  |
//! | `dateISO`         | date               | `2024-03-05`                        |
//!
//! Dates are `YYYY-MM-DD` strings, RFC 3339 timestamps or Unix seconds.

use crate::{markdown, utils::date};
use chrono::NaiveDate;
use regex::{Captures, Regex};
use std::{collections::HashMap, sync::OnceLock};
use tera::{Error, Tera, Value};

type Args = HashMap<String, Value>;

/// Register every filter on `tera`. `domain` feeds `absolute`.
pub fn register(tera: &mut Tera, domain: &str) {
    tera.register_filter("markdown", markdown_filter);
    tera.register_filter("markdownInline", markdown_inline_filter);
    tera.register_filter("markdownRemove", markdown_remove_filter);
    tera.register_filter("dateLong", date_long_filter);
    tera.register_filter("dateShort", date_short_filter);
    tera.register_filter("dateISO", date_iso_filter);

    let domain = domain.to_owned();
    tera.register_filter("absolute", move |value: &Value, args: &Args| {
        let html = as_str(value, "absolute")?;
        let url = args.get("url").and_then(Value::as_str).unwrap_or_default();
        Ok(Value::String(absolute(html, &domain, url)))
    });
}

// ============================================================================
// Markdown
// ============================================================================

fn markdown_filter(value: &Value, _: &Args) -> tera::Result<Value> {
    Ok(Value::String(markdown::render(as_str(value, "markdown")?)))
}

fn markdown_inline_filter(value: &Value, _: &Args) -> tera::Result<Value> {
    Ok(Value::String(markdown::render_inline(as_str(
        value,
        "markdownInline",
    )?)))
}

fn markdown_remove_filter(value: &Value, _: &Args) -> tera::Result<Value> {
    Ok(Value::String(markdown::remove(as_str(value, "markdownRemove")?)))
}

// ============================================================================
// Absolute URLs
// ============================================================================

fn absolute_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::unwrap_used)] // literal pattern
    RE.get_or_init(|| {
        Regex::new(r#"(src="[^(https:/)])|(src="/)|(href="[^(https:/)])|(href="/)"#).unwrap()
    })
}

/// Rewrite `src="`/`href="` attribute prefixes to absolute URLs.
///
/// A root-relative prefix `="/` becomes `="<domain>/`. Any other match has
/// `<domain><url>` inserted before its last character. The negated class
/// also matches some values that are already absolute (`mailto:`, `//cdn`)
/// and those are rewritten too.
pub fn absolute(html: &str, domain: &str, url: &str) -> String {
    absolute_regex()
        .replace_all(html, |caps: &Captures| {
            let matched = &caps[0];
            if let Some(attr) = matched.strip_suffix('/') {
                return format!("{attr}{domain}/");
            }
            let split = matched.char_indices().last().map_or(0, |(i, _)| i);
            let (attr, first) = matched.split_at(split);
            format!("{attr}{domain}{url}{first}")
        })
        .into_owned()
}

// ============================================================================
// Dates
// ============================================================================

fn date_long_filter(value: &Value, _: &Args) -> tera::Result<Value> {
    Ok(Value::String(date::format_long(to_date(value, "dateLong")?)))
}

fn date_short_filter(value: &Value, _: &Args) -> tera::Result<Value> {
    let parsed = to_date(value, "dateShort")?;
    Ok(Value::String(date::format_short(parsed, date::today())))
}

fn date_iso_filter(value: &Value, _: &Args) -> tera::Result<Value> {
    Ok(Value::String(date::format_iso(to_date(value, "dateISO")?)))
}

fn to_date(value: &Value, filter: &str) -> tera::Result<NaiveDate> {
    let parsed = match value {
        Value::String(s) => date::parse(s),
        Value::Number(n) => n.as_i64().and_then(date::from_unix),
        _ => None,
    };
    parsed.ok_or_else(|| Error::msg(format!("Filter `{filter}` received an invalid date: {value}")))
}

fn as_str<'a>(value: &'a Value, filter: &str) -> tera::Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| Error::msg(format!("Filter `{filter}` expects a string, got {value}")))
}
