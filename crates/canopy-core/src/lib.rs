//! Canopy Core - install D3 chart components into a web project
//!
//! This library copies chart templates into a consumer's project and rewrites
//! their relative imports so they resolve next to the shared utilities.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - project inspection, chart registry,
//!   template store and import rewriting
//! - **Layer 2: Materialization** - [`Dashboard`], which lays out the target
//!   directory and installs charts
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use canopy_core::{project, Dashboard, InstallOptions, TemplateStore};
//!
//! let root = std::path::Path::new(".");
//! let info = project::inspect(root);
//! let mut dashboard = Dashboard::open(TemplateStore::from_env(), root.join("app/canopy"));
//! dashboard.initialize(info.framework, info.typescript, &["bar-chart"]).await?;
//! dashboard.add_chart("pie-chart", InstallOptions::default()).await?;
//! ```

pub mod config;
pub mod dashboard;
pub mod error;
pub mod project;
pub mod registry;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::{CanopyConfig, ConfigError};
pub use dashboard::{Dashboard, InstallOptions, InstallationState, PerformanceMetrics};
pub use error::InstallError;
pub use project::{detect_framework, Framework};
pub use registry::{ChartCategory, ChartDescriptor};
pub use templates::{ImportRewriter, TemplateStore};

#[cfg(feature = "tui")]
pub use tui::{run_add, run_init};
