//! Chart templates: lookup, import rewriting and copying
//!
//! This module provides:
//! - The read-only template store (bundled or local chart files and shared categories)
//! - The import rewriter applied to chart files
//! - File copying into the target project

pub mod copier;
pub mod rewriter;
pub mod store;

pub use copier::{copy_shared, write_file, CopyStats};
pub use rewriter::{ImportRewriter, RewriteRule};
pub use store::{is_valid_chart_id, ChartTemplate, SharedCategory, TemplateSource, TemplateStore, TEMPLATE_DIR_ENV};
