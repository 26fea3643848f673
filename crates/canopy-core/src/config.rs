//! Project configuration file
//!
//! Looked up in the project root, first match wins:
//! `canopy.config.json`, `.canopyrc` (JSON), `canopy.config.yaml`.

use crate::templates::TemplateStore;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILES: &[&str] = &["canopy.config.json", ".canopyrc", "canopy.config.yaml"];

/// Where charts land, relative to the project root
pub const DEFAULT_BASE_PATH: &str = "app/canopy";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in config file {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid YAML in config file {}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanopyConfig {
    pub base_path: PathBuf,

    /// Template root override, relative paths resolve against the project root
    pub template_dir: Option<PathBuf>,

    /// Force TypeScript on or off instead of detecting it
    pub typescript: Option<bool>,

    /// Charts installed by `init --yes`
    pub default_charts: Vec<String>,

    pub dev_tools: DevToolsConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DevToolsConfig {
    pub enabled: bool,
    pub features: Vec<String>,
}

impl Default for CanopyConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from(DEFAULT_BASE_PATH),
            template_dir: None,
            typescript: None,
            default_charts: vec!["bar-chart".to_string(), "line-chart".to_string()],
            dev_tools: DevToolsConfig::default(),
        }
    }
}

impl CanopyConfig {
    /// Load the first config file found in `root`.
    ///
    /// Returns the defaults and `None` when there is no config file. A config
    /// file that exists but cannot be parsed is an error.
    pub fn load(root: &Path) -> Result<(Self, Option<PathBuf>), ConfigError> {
        match Self::find(root) {
            Some(path) => {
                let config = Self::from_file(&path)?;
                tracing::debug!(path = %path.display(), "loaded config");
                Ok((config, Some(path)))
            }
            None => Ok((Self::default(), None)),
        }
    }

    pub fn find(root: &Path) -> Option<PathBuf> {
        CONFIG_FILES
            .iter()
            .map(|name| root.join(name))
            .find(|path| path.is_file())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        if is_yaml {
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })
        } else {
            serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    /// Directory charts are installed into
    pub fn target_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.base_path)
    }

    /// Template store from `templateDir`, falling back to the environment
    pub fn template_store(&self, root: &Path) -> TemplateStore {
        match &self.template_dir {
            Some(dir) => TemplateStore::new(root.join(dir)),
            None => TemplateStore::from_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_config_file() {
        let dir = TempDir::new().unwrap();
        let (config, path) = CanopyConfig::load(dir.path()).unwrap();
        assert!(path.is_none());
        assert_eq!(config, CanopyConfig::default());
        assert_eq!(config.target_dir(dir.path()), dir.path().join("app/canopy"));
    }

    #[test]
    fn test_json_config_uses_camel_case() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("canopy.config.json"),
            r#"{
                "basePath": "src/components/charts",
                "typescript": false,
                "devTools": { "enabled": true, "features": ["data-inspector"] }
            }"#,
        )
        .unwrap();

        let (config, path) = CanopyConfig::load(dir.path()).unwrap();
        assert!(path.unwrap().ends_with("canopy.config.json"));
        assert_eq!(config.base_path, PathBuf::from("src/components/charts"));
        assert_eq!(config.typescript, Some(false));
        assert!(config.dev_tools.enabled);
        // Unset keys keep their defaults
        assert_eq!(config.default_charts, vec!["bar-chart", "line-chart"]);
    }

    #[test]
    fn test_first_config_file_wins() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".canopyrc"), r#"{ "basePath": "rc" }"#).unwrap();
        std::fs::write(dir.path().join("canopy.config.yaml"), "basePath: yaml\n").unwrap();

        let (config, _) = CanopyConfig::load(dir.path()).unwrap();
        assert_eq!(config.base_path, PathBuf::from("rc"));
    }

    #[test]
    fn test_yaml_config() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("canopy.config.yaml"),
            "basePath: lib/canopy\ndefaultCharts:\n  - pie-chart\n",
        )
        .unwrap();

        let (config, _) = CanopyConfig::load(dir.path()).unwrap();
        assert_eq!(config.base_path, PathBuf::from("lib/canopy"));
        assert_eq!(config.default_charts, vec!["pie-chart"]);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".canopyrc"), "{ basePath: ").unwrap();
        assert!(matches!(
            CanopyConfig::load(dir.path()),
            Err(ConfigError::Json { .. })
        ));
    }
}
