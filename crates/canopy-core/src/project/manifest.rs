//! package.json parsing

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

pub const MANIFEST_FILE: &str = "package.json";

/// The parts of package.json the inspector cares about
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,

    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, String>,
}

impl PackageManifest {
    /// Read and parse `<root>/package.json`
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(MANIFEST_FILE);
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Runtime and dev dependency names merged into one lookup set
    pub fn all_dependency_names(&self) -> HashSet<&str> {
        self.dependencies
            .keys()
            .chain(self.dev_dependencies.keys())
            .map(String::as_str)
            .collect()
    }

    /// Declared version range, runtime dependencies taking precedence
    pub fn version_of(&self, name: &str) -> Option<&str> {
        self.dependencies
            .get(name)
            .or_else(|| self.dev_dependencies.get(name))
            .map(String::as_str)
    }

    pub fn has_dependency(&self, name: &str) -> bool {
        self.version_of(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_merges_dependency_lists() {
        let manifest = PackageManifest::parse(
            r#"{
                "name": "demo",
                "dependencies": { "react": "^18.2.0" },
                "devDependencies": { "typescript": "^5.4.0" }
            }"#,
        )
        .unwrap();

        let names = manifest.all_dependency_names();
        assert!(names.contains("react"));
        assert!(names.contains("typescript"));
        assert_eq!(manifest.version_of("typescript"), Some("^5.4.0"));
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let manifest = PackageManifest::parse(r#"{ "name": "bare" }"#).unwrap();
        assert!(manifest.all_dependency_names().is_empty());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(PackageManifest::parse("{ not json").is_err());
    }
}
