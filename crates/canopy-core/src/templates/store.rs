//! Template store
//!
//! Templates are compiled into the binary from `crates/canopy-core/templates`.
//! A local directory with the same layout can replace them, for template
//! development or a custom chart set:
//!
//! ```text
//! charts/<chart-id>.tsx   one file per chart
//! utils/                  shared utility modules and components
//! hooks/                  shared React hooks
//! types/                  shared type declarations
//! ```

use crate::error::InstallError;
use include_dir::{include_dir, Dir, File};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Environment variable that overrides the template root
pub const TEMPLATE_DIR_ENV: &str = "CANOPY_TEMPLATE_DIR";

static BUNDLED_TEMPLATES: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/templates");

const CHARTS_DIR: &str = "charts";

/// Extensions tried, in order, when resolving a chart template
pub const CHART_EXTENSIONS: &[&str] = &["tsx", "jsx"];

/// Shared template categories, copied once per project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SharedCategory {
    Utils,
    Hooks,
    Types,
}

impl SharedCategory {
    pub const ALL: [SharedCategory; 3] = [
        SharedCategory::Utils,
        SharedCategory::Hooks,
        SharedCategory::Types,
    ];

    /// Directory name, identical in the store and in the target project
    pub fn dir_name(&self) -> &'static str {
        match self {
            SharedCategory::Utils => "utils",
            SharedCategory::Hooks => "hooks",
            SharedCategory::Types => "types",
        }
    }
}

impl fmt::Display for SharedCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

/// Chart ids are lowercase kebab-case: `bar-chart`, `scatter-plot`
pub fn is_valid_chart_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .split('-')
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()))
}

/// Where template bytes come from
#[derive(Debug, Clone)]
pub enum TemplateSource {
    /// Compiled into the binary
    Bundled,
    /// A directory on disk
    Local(PathBuf),
}

/// A chart template, read and ready to rewrite
#[derive(Debug, Clone)]
pub struct ChartTemplate {
    pub id: String,
    /// File name the chart keeps in the target project, e.g. `bar-chart.tsx`
    pub file_name: String,
    pub content: String,
}

/// Read-only view over a set of templates
#[derive(Debug, Clone)]
pub struct TemplateStore {
    source: TemplateSource,
}

impl TemplateStore {
    /// Store over a local template directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            source: TemplateSource::Local(root.into()),
        }
    }

    /// Store over the templates compiled into this crate
    pub fn bundled() -> Self {
        Self {
            source: TemplateSource::Bundled,
        }
    }

    /// Store rooted at `$CANOPY_TEMPLATE_DIR`, or the bundled templates
    pub fn from_env() -> Self {
        std::env::var_os(TEMPLATE_DIR_ENV)
            .map(|dir| Self::new(PathBuf::from(dir)))
            .unwrap_or_else(Self::bundled)
    }

    pub fn source(&self) -> &TemplateSource {
        &self.source
    }

    /// Human-readable location, for messages
    pub fn describe(&self) -> String {
        match &self.source {
            TemplateSource::Bundled => "bundled templates".to_string(),
            TemplateSource::Local(root) => root.display().to_string(),
        }
    }

    /// False when a local root has no `charts/` directory
    pub fn is_available(&self) -> bool {
        match &self.source {
            TemplateSource::Bundled => BUNDLED_TEMPLATES.get_dir(CHARTS_DIR).is_some(),
            TemplateSource::Local(root) => root.join(CHARTS_DIR).is_dir(),
        }
    }

    fn charts_location(&self) -> String {
        match &self.source {
            TemplateSource::Bundled => format!("bundled templates ({}/)", CHARTS_DIR),
            TemplateSource::Local(root) => root.join(CHARTS_DIR).display().to_string(),
        }
    }

    fn has_file(&self, relative: &Path) -> bool {
        match &self.source {
            TemplateSource::Bundled => BUNDLED_TEMPLATES.get_file(relative).is_some(),
            TemplateSource::Local(root) => root.join(relative).is_file(),
        }
    }

    /// File name of the template for `id`.
    ///
    /// Fails with `TemplateNotFound` when no file exists for the id; a chart
    /// without a template is never silently skipped.
    pub fn chart_file_name(&self, id: &str) -> Result<String, InstallError> {
        if !is_valid_chart_id(id) {
            return Err(InstallError::InvalidChartId(id.to_string()));
        }

        CHART_EXTENSIONS
            .iter()
            .map(|ext| format!("{}.{}", id, ext))
            .find(|name| self.has_file(&Path::new(CHARTS_DIR).join(name)))
            .ok_or_else(|| InstallError::TemplateNotFound {
                id: id.to_string(),
                location: self.charts_location(),
            })
    }

    pub fn has_chart(&self, id: &str) -> bool {
        self.chart_file_name(id).is_ok()
    }

    /// Resolve and read the template for `id`
    pub async fn read_chart(&self, id: &str) -> Result<ChartTemplate, InstallError> {
        let file_name = self.chart_file_name(id)?;
        let relative = Path::new(CHARTS_DIR).join(&file_name);
        let bytes = self.read(&relative).await?;
        let content = String::from_utf8(bytes).map_err(|e| {
            InstallError::read(&relative, io::Error::new(io::ErrorKind::InvalidData, e))
        })?;

        Ok(ChartTemplate {
            id: id.to_string(),
            file_name,
            content,
        })
    }

    /// Ids of every chart template present, sorted
    pub fn chart_ids(&self) -> Vec<String> {
        let paths: Vec<PathBuf> = match &self.source {
            TemplateSource::Bundled => BUNDLED_TEMPLATES
                .get_dir(CHARTS_DIR)
                .map(|dir| dir.files().map(|f| f.path().to_path_buf()).collect())
                .unwrap_or_default(),
            TemplateSource::Local(root) => {
                let dir = root.join(CHARTS_DIR);
                match std::fs::read_dir(&dir) {
                    Ok(entries) => entries
                        .filter_map(|entry| entry.ok())
                        .map(|entry| entry.path())
                        .filter(|path| path.is_file())
                        .collect(),
                    Err(e) => {
                        tracing::warn!(dir = %dir.display(), "cannot list chart templates: {}", e);
                        Vec::new()
                    }
                }
            }
        };

        let mut ids: Vec<String> = paths
            .iter()
            .filter_map(|path| chart_id_from_path(path))
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Files of a shared category, relative to the category directory, sorted.
    /// A missing category directory yields no files.
    pub fn shared_files(&self, category: SharedCategory) -> Result<Vec<PathBuf>, InstallError> {
        match &self.source {
            TemplateSource::Bundled => {
                let Some(dir) = BUNDLED_TEMPLATES.get_dir(category.dir_name()) else {
                    return Ok(Vec::new());
                };
                let mut files = Vec::new();
                collect_bundled_files(dir, &mut files);
                let mut relative: Vec<PathBuf> = files
                    .iter()
                    .filter_map(|f| f.path().strip_prefix(category.dir_name()).ok())
                    .map(Path::to_path_buf)
                    .collect();
                relative.sort();
                Ok(relative)
            }
            TemplateSource::Local(root) => local_shared_files(&root.join(category.dir_name())),
        }
    }

    /// Read one shared file, `relative` as returned by `shared_files`
    pub async fn read_shared(&self, category: SharedCategory, relative: &Path) -> Result<Vec<u8>, InstallError> {
        self.read(&Path::new(category.dir_name()).join(relative)).await
    }

    async fn read(&self, relative: &Path) -> Result<Vec<u8>, InstallError> {
        match &self.source {
            TemplateSource::Bundled => BUNDLED_TEMPLATES
                .get_file(relative)
                .map(|f| f.contents().to_vec())
                .ok_or_else(|| {
                    InstallError::read(relative, io::Error::new(io::ErrorKind::NotFound, "not in bundled templates"))
                }),
            TemplateSource::Local(root) => {
                let path = root.join(relative);
                tokio::fs::read(&path)
                    .await
                    .map_err(|e| InstallError::read(&path, e))
            }
        }
    }
}

fn collect_bundled_files<'a>(dir: &'a Dir<'a>, out: &mut Vec<&'a File<'a>>) {
    out.extend(dir.files());
    for sub in dir.dirs() {
        collect_bundled_files(sub, out);
    }
}

fn local_shared_files(dir: &Path) -> Result<Vec<PathBuf>, InstallError> {
    if !dir.is_dir() {
        tracing::debug!(dir = %dir.display(), "shared category directory absent");
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());
            InstallError::read(path, e.into())
        })?;
        if entry.file_type().is_file() {
            if let Ok(relative) = entry.path().strip_prefix(dir) {
                files.push(relative.to_path_buf());
            }
        }
    }
    Ok(files)
}

/// `bar-chart.tsx` -> `bar-chart`, for known chart extensions and valid ids only
pub fn chart_id_from_path(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?;
    if !CHART_EXTENSIONS.contains(&ext) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    is_valid_chart_id(stem).then(|| stem.to_string())
}
