//! Check a project's package.json against the npm packages charts need

use super::manifest::PackageManifest;
use crate::registry::ChartDependency;
use semver::{Version, VersionReq};

/// Why a chart dependency is not satisfied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingReason {
    NotInstalled,
    /// Declared range whose base version falls outside the requirement
    Outdated(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingDependency {
    pub dependency: ChartDependency,
    pub reason: MissingReason,
}

impl MissingDependency {
    /// `name@range` form for an install command
    pub fn install_spec(&self) -> String {
        format!("{}@{}", self.dependency.name, self.dependency.version_req)
    }
}

/// Extract the base version from an npm range like `^7.8.5`, `~3.1`, `>=4.0.0`.
/// Returns None for tags, urls and workspace protocols.
pub fn base_version(range: &str) -> Option<Version> {
    let first = range.split_whitespace().next()?;
    let cleaned = first.trim_start_matches(|c: char| matches!(c, '^' | '~' | '>' | '=' | 'v'));

    // Pad partial versions: "3" -> "3.0.0", "3.1" -> "3.1.0"
    let parts = cleaned.split('.').count();
    let padded = match parts {
        1 => format!("{}.0.0", cleaned),
        2 => format!("{}.0", cleaned),
        _ => cleaned.to_string(),
    };
    Version::parse(&padded).ok()
}

/// Dependencies from `required` the manifest does not satisfy.
///
/// Declared ranges that can't be interpreted (e.g. `latest`, `workspace:*`)
/// are given the benefit of the doubt.
pub fn missing_dependencies(
    manifest: &PackageManifest,
    required: &[ChartDependency],
) -> Vec<MissingDependency> {
    let mut missing = Vec::new();

    for dep in required {
        let Some(declared) = manifest.version_of(dep.name) else {
            missing.push(MissingDependency {
                dependency: *dep,
                reason: MissingReason::NotInstalled,
            });
            continue;
        };

        let req = match VersionReq::parse(dep.version_req) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(dependency = dep.name, "invalid version requirement: {}", e);
                continue;
            }
        };

        if let Some(version) = base_version(declared) {
            if !req.matches(&version) {
                missing.push(MissingDependency {
                    dependency: *dep,
                    reason: MissingReason::Outdated(declared.to_string()),
                });
            }
        }
    }

    missing
}

#[cfg(test)]
mod tests {
    use super::*;

    const D3_SCALE: ChartDependency = ChartDependency {
        name: "d3-scale",
        version_req: "^4.0.0",
    };
    const D3_SHAPE: ChartDependency = ChartDependency {
        name: "d3-shape",
        version_req: "^3.2.0",
    };

    #[test]
    fn test_base_version() {
        assert_eq!(base_version("^7.8.5"), Some(Version::new(7, 8, 5)));
        assert_eq!(base_version("~3.1"), Some(Version::new(3, 1, 0)));
        assert_eq!(base_version(">=4 <5"), Some(Version::new(4, 0, 0)));
        assert_eq!(base_version("latest"), None);
        assert_eq!(base_version("workspace:*"), None);
    }

    #[test]
    fn test_not_installed() {
        let manifest = PackageManifest::default();
        let missing = missing_dependencies(&manifest, &[D3_SCALE]);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].reason, MissingReason::NotInstalled);
        assert_eq!(missing[0].install_spec(), "d3-scale@^4.0.0");
    }

    #[test]
    fn test_outdated_and_satisfied() {
        let manifest = PackageManifest::parse(
            r#"{ "dependencies": { "d3-scale": "^3.3.0", "d3-shape": "^3.2.0" } }"#,
        )
        .unwrap();
        let missing = missing_dependencies(&manifest, &[D3_SCALE, D3_SHAPE]);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].dependency.name, "d3-scale");
        assert_eq!(missing[0].reason, MissingReason::Outdated("^3.3.0".to_string()));
    }

    #[test]
    fn test_unparsable_ranges_are_accepted() {
        let manifest =
            PackageManifest::parse(r#"{ "devDependencies": { "d3-scale": "latest" } }"#).unwrap();
        assert!(missing_dependencies(&manifest, &[D3_SCALE]).is_empty());
    }
}
