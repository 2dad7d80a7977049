//! Slugification for heading ids.

use deunicode::deunicode;
use std::collections::HashMap;

/// ASCII-fold, lowercase, and collapse every run of non-alphanumerics to `-`.
///
/// `"Héllo, World!"` becomes `hello-world`.
pub fn slugify(text: &str) -> String {
    let folded = deunicode(text).to_ascii_lowercase();
    let mut slug = String::with_capacity(folded.len());

    for c in folded.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Hands out unique slugs within one document: `a`, `a-1`, `a-2`, ...
#[derive(Debug, Default)]
pub struct SlugCounter {
    seen: HashMap<String, usize>,
}

impl SlugCounter {
    pub fn unique(&mut self, slug: String) -> String {
        let slug = if slug.is_empty() {
            "section".to_owned()
        } else {
            slug
        };

        let Some(&last) = self.seen.get(&slug) else {
            self.seen.insert(slug.clone(), 0);
            return slug;
        };

        // Skip suffixes already taken by a literal heading
        let mut count = last;
        let candidate = loop {
            count += 1;
            let candidate = format!("{slug}-{count}");
            if !self.seen.contains_key(&candidate) {
                break candidate;
            }
        };
        self.seen.insert(slug, count);
        self.seen.insert(candidate.clone(), 0);
        candidate
    }

    /// Record an id the author set explicitly.
    pub fn reserve(&mut self, id: &str) {
        self.seen.entry(id.to_owned()).or_insert(0);
    }
}
