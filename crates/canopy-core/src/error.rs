//! Error types for chart installation

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure while materializing templates into a project.
///
/// Validation failures (`InvalidChartId`, `AlreadyInstalled`, `TemplateNotFound`)
/// are raised before anything is written. `Read` and `Write` come from the
/// filesystem after validation has passed.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("'{0}' is not a valid chart identifier (expected lowercase kebab-case, e.g. bar-chart)")]
    InvalidChartId(String),

    #[error("Chart '{0}' is already installed (use --overwrite to replace it)")]
    AlreadyInstalled(String),

    #[error("Template not found for chart '{id}' in {location}")]
    TemplateNotFound { id: String, location: String },

    #[error("Failed to read template {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl InstallError {
    /// True for failures detected before any filesystem mutation
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            InstallError::InvalidChartId(_)
                | InstallError::AlreadyInstalled(_)
                | InstallError::TemplateNotFound { .. }
        )
    }

    pub(crate) fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        InstallError::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        InstallError::Write {
            path: path.into(),
            source,
        }
    }
}
