//! HTML transform pipeline.
//!
//! Each pass streams the current markup through `lol_html` and replaces it.
//! Passes run strictly in order and each sees what the previous ones did:
//!
//! ```text
//! anchors → demos → figures → images → code
//! ```

mod anchors;
mod code;
mod demos;
mod document;
mod figures;
mod images;

pub use document::Document;

use crate::config::SiteConfig;
use anyhow::{Context, Result};
use std::path::Path;

/// One rewrite step applied to every HTML page.
pub trait Transform: Send + Sync {
    fn name(&self) -> &'static str;

    /// `raw` is the page's source body, `output_path` the file being written.
    fn apply(&self, document: &mut Document, raw: &str, output_path: &Path) -> Result<()>;
}

/// Ordered passes, built once and shared by every page build.
#[derive(Default)]
pub struct Pipeline {
    passes: Vec<Box<dyn Transform>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn standard(config: &SiteConfig) -> Self {
        let mut pipeline = Self::new();
        pipeline.push(anchors::Anchors);
        pipeline.push(demos::Demos);
        pipeline.push(figures::Figures);
        pipeline.push(images::Images::new(&config.build.output));
        pipeline.push(code::Code);
        pipeline
    }

    pub fn push(&mut self, pass: impl Transform + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Apply every pass in order. The first failure aborts the page.
    pub fn run(&self, document: &mut Document, raw: &str) -> Result<()> {
        let output_path = document.output_path().to_path_buf();
        for pass in &self.passes {
            pass.apply(document, raw, &output_path).with_context(|| {
                format!("transform `{}` failed on {}", pass.name(), document.url())
            })?;
        }
        Ok(())
    }
}
