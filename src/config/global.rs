//! Global data files under `src/data/`.
//!
//! Every YAML file in the data directory is exposed to templates under its
//! file stem. The `global` file is also parsed into [`GlobalData`], which
//! carries the site domain used for absolute URLs.

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

/// The site-wide record from `global.yml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalData {
    /// Site origin, e.g. `https://example.com` (no trailing slash).
    pub domain: String,

    /// Any other keys, passed to templates untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// All data files, keyed by file stem.
#[derive(Debug, Clone, Default)]
pub struct SiteData {
    pub global: GlobalData,
    pub files: BTreeMap<String, serde_yaml::Value>,
}

impl SiteData {
    /// Load every `.yml`/`.yaml` file directly under `dir`.
    ///
    /// The file whose stem is `global_stem` must exist and declare `domain`.
    pub fn load(dir: &Path, global_stem: &str) -> Result<Self, ConfigError> {
        let mut files = BTreeMap::new();

        if dir.is_dir() {
            let entries = fs::read_dir(dir).map_err(|err| ConfigError::Io(dir.to_path_buf(), err))?;
            for entry in entries {
                let path = entry
                    .map_err(|err| ConfigError::Io(dir.to_path_buf(), err))?
                    .path();
                if !is_yaml(&path) {
                    continue;
                }
                let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                let value = read_yaml(&path)?;
                files.insert(stem.to_owned(), value);
            }
        }

        let global_path = dir.join(format!("{global_stem}.yml"));
        let value = files.get(global_stem).cloned().ok_or_else(|| {
            ConfigError::Validation(format!("`{}` not found", global_path.display()))
        })?;
        let mut global: GlobalData =
            serde_yaml::from_value(value).map_err(|err| ConfigError::Yaml(global_path, err))?;
        global.domain = global.domain.trim_end_matches('/').to_owned();
        if let Some(serde_yaml::Value::Mapping(map)) = files.get_mut(global_stem) {
            map.insert("domain".into(), global.domain.clone().into());
        }

        Ok(Self { global, files })
    }
}

fn is_yaml(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ext == "yml" || ext == "yaml")
}

fn read_yaml(path: &Path) -> Result<serde_yaml::Value, ConfigError> {
    let content = fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
    serde_yaml::from_str(&content).map_err(|err| ConfigError::Yaml(PathBuf::from(path), err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_global_and_extra_files() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("global.yml"),
            "domain: https://example.com/\nauthor: Ada\n",
        )
        .unwrap();
        fs::write(dir.path().join("nav.yaml"), "- home\n- about\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let data = SiteData::load(dir.path(), "global").unwrap();

        assert_eq!(data.global.domain, "https://example.com");
        assert_eq!(data.global.extra["author"].as_str(), Some("Ada"));
        assert!(data.files.contains_key("global"));
        assert!(data.files["nav"].is_sequence());
        assert!(!data.files.contains_key("notes"));
    }

    #[test]
    fn test_missing_global_file() {
        let dir = TempDir::new().unwrap();
        let err = SiteData::load(dir.path(), "global").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_missing_domain() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("global.yml"), "author: Ada\n").unwrap();

        let err = SiteData::load(dir.path(), "global").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(..)));
    }

    #[test]
    fn test_invalid_yaml_names_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("global.yml"), "domain: https://a.b\n").unwrap();
        fs::write(dir.path().join("broken.yml"), "a: [").unwrap();

        let err = SiteData::load(dir.path(), "global").unwrap_err();
        assert!(format!("{err}").contains("broken.yml"));
    }
}
