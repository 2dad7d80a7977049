//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

pub fn r#true() -> bool {
    true
}

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn input() -> PathBuf {
        "src".into()
    }

    pub fn output() -> PathBuf {
        "dist".into()
    }

    pub fn includes() -> PathBuf {
        "includes".into()
    }

    pub fn layouts() -> PathBuf {
        "layouts".into()
    }

    pub fn data() -> PathBuf {
        "data".into()
    }

    pub fn global() -> String {
        "global".into()
    }

    pub mod css {
        use std::path::PathBuf;

        pub fn entries() -> Vec<PathBuf> {
            vec![
                "styles/index.css".into(),
                "styles/light.css".into(),
                "styles/dark.css".into(),
            ]
        }

        pub fn chrome() -> Option<u32> {
            Some(100)
        }

        pub fn firefox() -> Option<u32> {
            Some(100)
        }

        pub fn safari() -> Option<u32> {
            Some(15)
        }
    }

    pub mod js {
        use std::path::PathBuf;

        pub fn entry() -> PathBuf {
            "scripts/index.js".into()
        }

        pub fn command() -> Vec<String> {
            [
                "esbuild",
                "--bundle",
                "--minify",
                "--format=iife",
                "--log-level=warning",
            ]
            .into_iter()
            .map(String::from)
            .collect()
        }
    }

    pub mod passthrough {
        use crate::config::PassthroughEntry;

        pub fn entries() -> Vec<PassthroughEntry> {
            vec![
                PassthroughEntry::Simple("robots.txt".into()),
                PassthroughEntry::Simple("images".into()),
                PassthroughEntry::Simple("fonts".into()),
                PassthroughEntry::Simple("talks".into()),
                PassthroughEntry::Filtered {
                    pattern: "articles/**".into(),
                    exclude: vec!["*.md".into(), "*.yml".into(), "*.yaml".into()],
                },
            ]
        }
    }

    pub mod collections {
        use crate::config::CollectionConfig;
        use std::collections::BTreeMap;

        const ARTICLES: &str = "articles/*/index.md";

        pub fn named() -> BTreeMap<String, CollectionConfig> {
            BTreeMap::from([
                (
                    "articles".to_owned(),
                    CollectionConfig {
                        include: vec![ARTICLES.into()],
                        exclude: Vec::new(),
                    },
                ),
                (
                    "sitemap".to_owned(),
                    CollectionConfig {
                        include: vec![ARTICLES.into(), "*.md".into(), "*.njk".into()],
                        exclude: vec!["404.njk".into()],
                    },
                ),
            ])
        }
    }
}
