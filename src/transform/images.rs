//! Loading hints and intrinsic dimensions on `<img>`.
//!
//! Dimensions come from the file already copied into the output tree, so
//! passthrough copies must finish before pages are built.

use super::{Document, Transform};
use anyhow::Result;
use image::ImageError;
use lol_html::element;
use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

pub struct Images {
    output_root: PathBuf,
}

impl Images {
    pub fn new(output_root: &Path) -> Self {
        Self {
            output_root: output_root.to_path_buf(),
        }
    }

    /// Where `src` lives on disk, or `None` when it isn't a local raster file.
    fn resolve(&self, src: &str, output_path: &Path) -> Option<PathBuf> {
        let is_external = ["http:", "https:", "//", "data:"]
            .iter()
            .any(|prefix| src.starts_with(prefix));
        if is_external {
            return None;
        }

        let path = src.split(['?', '#']).next().unwrap_or_default();
        if path.is_empty() || path.to_ascii_lowercase().ends_with(".svg") {
            return None;
        }

        let path = urlencoding::decode(path).unwrap_or(Cow::Borrowed(path));
        Some(match path.strip_prefix('/') {
            Some(rooted) => self.output_root.join(rooted),
            None => output_path.parent().unwrap_or(Path::new("")).join(path.as_ref()),
        })
    }
}

impl Transform for Images {
    fn name(&self) -> &'static str {
        "images"
    }

    fn apply(&self, document: &mut Document, _: &str, output_path: &Path) -> Result<()> {
        document.rewrite(vec![element!("img[src]", |el| {
            for (name, value) in [("loading", "lazy"), ("decoding", "async")] {
                if !el.has_attribute(name) {
                    el.set_attribute(name, value)?;
                }
            }

            if el.has_attribute("width") || el.has_attribute("height") {
                return Ok(());
            }
            let src = el.get_attribute("src").unwrap_or_default();
            let Some(file) = self.resolve(&src, output_path) else {
                return Ok(());
            };

            let (width, height) = match image::image_dimensions(&file) {
                Ok(dimensions) => dimensions,
                // Formats without a decoder keep just the loading hints
                Err(ImageError::Unsupported(_)) => return Ok(()),
                Err(err) => {
                    return Err(format!("Failed to read image {}: {err}", file.display()).into());
                }
            };
            el.set_attribute("width", &width.to_string())?;
            el.set_attribute("height", &height.to_string())?;
            Ok(())
        })])
    }
}
