//! Framework, dialect and package manager detection

use super::manifest::PackageManifest;
use std::fmt;
use std::path::Path;

/// Web frameworks the CLI knows how to recognise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Framework {
    #[value(name = "next")]
    NextJs,
    Remix,
    Gatsby,
    Vite,
    #[value(name = "cra")]
    CreateReactApp,
    React,
}

impl Framework {
    pub fn display_name(&self) -> &'static str {
        match self {
            Framework::NextJs => "next.js",
            Framework::Remix => "remix",
            Framework::Gatsby => "gatsby",
            Framework::Vite => "vite",
            Framework::CreateReactApp => "create-react-app",
            Framework::React => "react",
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Dependencies and root files that identify a framework
#[derive(Debug, Clone, Copy)]
pub struct FrameworkSignature {
    pub framework: Framework,
    /// All of these must be present in dependencies or devDependencies
    pub required_deps: &'static [&'static str],
    /// Any one of these existing in the project root is enough
    pub marker_files: &'static [&'static str],
}

/// Signatures in priority order; the first match wins
pub const FRAMEWORK_SIGNATURES: &[FrameworkSignature] = &[
    FrameworkSignature {
        framework: Framework::NextJs,
        required_deps: &["next"],
        marker_files: &["next.config.js", "next.config.mjs", "next.config.ts"],
    },
    FrameworkSignature {
        framework: Framework::Remix,
        required_deps: &["@remix-run/react"],
        marker_files: &["remix.config.js", "remix.config.mjs"],
    },
    FrameworkSignature {
        framework: Framework::Gatsby,
        required_deps: &["gatsby"],
        marker_files: &["gatsby-config.js", "gatsby-config.ts"],
    },
    FrameworkSignature {
        framework: Framework::Vite,
        required_deps: &["vite", "react"],
        marker_files: &["vite.config.js", "vite.config.ts", "vite.config.mjs"],
    },
    FrameworkSignature {
        framework: Framework::CreateReactApp,
        required_deps: &["react-scripts"],
        marker_files: &[],
    },
    FrameworkSignature {
        framework: Framework::React,
        required_deps: &["react"],
        marker_files: &[],
    },
];

impl FrameworkSignature {
    fn matches(&self, manifest: &PackageManifest, root: &Path) -> bool {
        let deps = manifest.all_dependency_names();
        let deps_match = !self.required_deps.is_empty()
            && self.required_deps.iter().all(|d| deps.contains(d));

        deps_match || self.marker_files.iter().any(|f| root.join(f).exists())
    }
}

/// Detect the framework of the project at `root`.
///
/// Returns `None` when there is no package.json, it cannot be parsed, or no
/// signature matches. Errors are logged, never returned.
pub fn detect_framework(root: &Path) -> Option<Framework> {
    let manifest = match PackageManifest::load(root) {
        Ok(m) => m,
        Err(e) => {
            tracing::warn!("framework detection skipped: {:#}", e);
            return None;
        }
    };
    detect_framework_with(&manifest, root)
}

/// Detection against an already loaded manifest
pub fn detect_framework_with(manifest: &PackageManifest, root: &Path) -> Option<Framework> {
    let found = FRAMEWORK_SIGNATURES
        .iter()
        .find(|sig| sig.matches(manifest, root))
        .map(|sig| sig.framework);
    tracing::debug!(root = %root.display(), framework = ?found, "framework detection");
    found
}

/// A project is TypeScript if it has a tsconfig.json or depends on typescript
pub fn is_typescript(root: &Path, manifest: Option<&PackageManifest>) -> bool {
    root.join("tsconfig.json").exists()
        || manifest.is_some_and(|m| m.has_dependency("typescript"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl PackageManager {
    /// Lockfile-based detection, npm when nothing matches
    pub fn detect(root: &Path) -> Self {
        const LOCKFILES: &[(&str, PackageManager)] = &[
            ("pnpm-lock.yaml", PackageManager::Pnpm),
            ("yarn.lock", PackageManager::Yarn),
            ("bun.lockb", PackageManager::Bun),
            ("bun.lock", PackageManager::Bun),
        ];
        LOCKFILES
            .iter()
            .find(|(file, _)| root.join(file).exists())
            .map(|(_, pm)| *pm)
            .unwrap_or(PackageManager::Npm)
    }

    pub fn install_command(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm install",
            PackageManager::Pnpm => "pnpm add",
            PackageManager::Yarn => "yarn add",
            PackageManager::Bun => "bun add",
        }
    }
}

/// Everything the inspector learned about a project
#[derive(Debug, Clone)]
pub struct ProjectInfo {
    pub framework: Option<Framework>,
    pub typescript: bool,
    pub package_manager: PackageManager,
    /// None when package.json is missing or unreadable
    pub manifest: Option<PackageManifest>,
}

/// Inspect a project root. Never fails; missing data is reported as absent.
pub fn inspect(root: &Path) -> ProjectInfo {
    let manifest = match PackageManifest::load(root) {
        Ok(m) => Some(m),
        Err(e) => {
            tracing::warn!("could not load project manifest: {:#}", e);
            None
        }
    };
    let framework = manifest
        .as_ref()
        .and_then(|m| detect_framework_with(m, root));

    ProjectInfo {
        framework,
        typescript: is_typescript(root, manifest.as_ref()),
        package_manager: PackageManager::detect(root),
        manifest,
    }
}
