//! Project inspection
//!
//! This module provides:
//! - package.json parsing
//! - Framework detection from dependencies and marker files
//! - TypeScript and package manager detection
//! - Chart dependency checks against the project's manifest

pub mod dependencies;
pub mod detect;
pub mod manifest;

pub use dependencies::{missing_dependencies, MissingDependency, MissingReason};
pub use detect::{
    detect_framework, inspect, is_typescript, Framework, FrameworkSignature, PackageManager,
    ProjectInfo, FRAMEWORK_SIGNATURES,
};
pub use manifest::PackageManifest;
