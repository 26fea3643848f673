//! Chart materialization into a target project
//!
//! A [`Dashboard`] owns the in-memory installation state for one CLI
//! invocation. `initialize` lays out the target directory and installs the
//! first charts; `add_chart` installs one more.
//!
//! Nothing is persisted. [`Dashboard::open`] rebuilds the set of installed
//! charts by scanning the target directory, so the "already installed" guard
//! also holds across separate invocations.

use crate::error::InstallError;
use crate::project::Framework;
use crate::templates::copier::{self, CopyStats};
use crate::templates::store::{chart_id_from_path, is_valid_chart_id};
use crate::templates::{ImportRewriter, SharedCategory, TemplateStore};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Bundle estimate for the shared utils, hooks and types
const SHARED_BUNDLE_KB: usize = 8;
/// Bundle estimate per installed chart
const CHART_BUNDLE_KB: usize = 15;

/// Dev tool features that can be enabled
pub const DEV_TOOL_FEATURES: &[&str] = &["performance-monitor", "data-inspector", "theme-editor"];

#[derive(Debug, Clone, Copy, Default)]
pub struct InstallOptions {
    /// Replace a chart that is already installed
    pub overwrite: bool,
}

/// Snapshot of the most recent materialization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerformanceMetrics {
    pub files_written: usize,
    pub bytes_written: u64,
    pub elapsed: Duration,
}

impl PerformanceMetrics {
    fn from_stats(stats: CopyStats, started: Instant) -> Self {
        Self {
            files_written: stats.files,
            bytes_written: stats.bytes,
            elapsed: started.elapsed(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DevTools {
    pub features: BTreeSet<String>,
}

#[derive(Debug, Clone)]
pub struct InstallationState {
    pub target_path: PathBuf,
    pub framework: Option<Framework>,
    pub typescript: bool,
    pub installed_charts: BTreeSet<String>,
    pub bundle_size: String,
    pub metrics: Option<PerformanceMetrics>,
    pub dev_tools: Option<DevTools>,
}

impl InstallationState {
    fn new(target_path: PathBuf) -> Self {
        Self {
            target_path,
            framework: None,
            typescript: false,
            installed_charts: BTreeSet::new(),
            bundle_size: estimate_bundle_size(0),
            metrics: None,
            dev_tools: None,
        }
    }

    pub fn is_installed(&self, id: &str) -> bool {
        self.installed_charts.contains(id)
    }
}

/// Rough size of the installed components, e.g. `~38KB`.
/// Never decreases as the chart count grows.
pub fn estimate_bundle_size(chart_count: usize) -> String {
    format!("~{}KB", SHARED_BUNDLE_KB + CHART_BUNDLE_KB * chart_count)
}

/// Result of a successful `initialize`
#[derive(Debug, Clone)]
pub struct InitReport {
    pub shared: CopyStats,
    pub charts: Vec<PathBuf>,
}

pub struct Dashboard {
    store: TemplateStore,
    rewriter: ImportRewriter,
    state: InstallationState,
}

impl Dashboard {
    /// Dashboard with empty state for `target_path`
    pub fn new(store: TemplateStore, target_path: impl Into<PathBuf>) -> Self {
        Self {
            store,
            rewriter: ImportRewriter::new(),
            state: InstallationState::new(target_path.into()),
        }
    }

    /// Dashboard whose installed charts are read from the target directory.
    /// A file counts as installed when its name matches a chart template.
    pub fn open(store: TemplateStore, target_path: impl Into<PathBuf>) -> Self {
        let mut dashboard = Self::new(store, target_path);
        let found = scan_installed(&dashboard.state.target_path, &dashboard.store);
        tracing::debug!(count = found.len(), "found installed charts");
        dashboard.state.installed_charts = found;
        dashboard.refresh_bundle_size();
        dashboard
    }

    pub fn with_rewriter(mut self, rewriter: ImportRewriter) -> Self {
        self.rewriter = rewriter;
        self
    }

    pub fn state(&self) -> &InstallationState {
        &self.state
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    pub fn target_path(&self) -> &Path {
        &self.state.target_path
    }

    /// True once the shared directories exist in the target
    pub fn is_initialized(&self) -> bool {
        SharedCategory::ALL
            .iter()
            .all(|c| self.state.target_path.join(c.dir_name()).is_dir())
    }

    pub fn set_framework(&mut self, framework: Option<Framework>, typescript: bool) {
        self.state.framework = framework;
        self.state.typescript = typescript;
    }

    /// Enable dev tools with the given features; unknown names are ignored
    pub fn enable_dev_tools<S: AsRef<str>>(&mut self, features: &[S]) {
        let mut enabled = BTreeSet::new();
        for feature in features.iter().map(|s| s.as_ref()) {
            if DEV_TOOL_FEATURES.contains(&feature) {
                enabled.insert(feature.to_string());
            } else {
                tracing::warn!(feature, "ignoring unknown dev tools feature");
            }
        }
        self.state.dev_tools = Some(DevTools { features: enabled });
    }

    /// Lay out the target directory, copy the shared templates and install
    /// `initial_charts`.
    ///
    /// Meant to run once per project. Running it again overwrites the shared
    /// files. Charts are installed in order, already installed ones are
    /// skipped, and the first failure stops the run; charts before it stay
    /// installed.
    pub async fn initialize<S: AsRef<str>>(
        &mut self,
        framework: Option<Framework>,
        typescript: bool,
        initial_charts: &[S],
    ) -> Result<InitReport, InstallError> {
        let started = Instant::now();
        self.set_framework(framework, typescript);

        copier::ensure_dir(&self.state.target_path).await?;
        let shared = copier::copy_shared(&self.store, &self.state.target_path).await?;
        tracing::info!(
            dir = %self.state.target_path.display(),
            files = shared.files,
            "shared templates copied"
        );

        let mut totals = shared;
        let mut charts = Vec::new();
        for id in initial_charts.iter().map(|s| s.as_ref()) {
            if self.state.is_installed(id) {
                tracing::debug!(chart = id, "already installed, skipping");
                continue;
            }
            let (path, stats) = self.install_chart(id, InstallOptions::default()).await?;
            totals.add(stats);
            charts.push(path);
        }

        self.state.metrics = Some(PerformanceMetrics::from_stats(totals, started));
        Ok(InitReport { shared, charts })
    }

    /// Install a single chart, returning the path it was written to.
    ///
    /// Validation happens before anything touches the filesystem: the id must
    /// be well formed, not already installed (unless `overwrite`), and have a
    /// template. A failed write is reported as `InstallError::Write`; the
    /// chart is then not recorded as installed and the call can be retried.
    pub async fn add_chart(&mut self, id: &str, options: InstallOptions) -> Result<PathBuf, InstallError> {
        let started = Instant::now();
        let (path, stats) = self.install_chart(id, options).await?;
        self.state.metrics = Some(PerformanceMetrics::from_stats(stats, started));
        Ok(path)
    }

    async fn install_chart(&mut self, id: &str, options: InstallOptions) -> Result<(PathBuf, CopyStats), InstallError> {
        if !is_valid_chart_id(id) {
            return Err(InstallError::InvalidChartId(id.to_string()));
        }
        if self.state.is_installed(id) && !options.overwrite {
            return Err(InstallError::AlreadyInstalled(id.to_string()));
        }
        let template = self.store.read_chart(id).await?;
        let rewritten = self.rewriter.rewrite(&template.content);

        let dest = self.state.target_path.join(&template.file_name);
        let bytes = copier::write_file(&dest, rewritten.as_bytes()).await?;

        self.state.installed_charts.insert(id.to_string());
        self.refresh_bundle_size();
        tracing::info!(chart = id, path = %dest.display(), "chart installed");

        Ok((dest, CopyStats { files: 1, bytes }))
    }

    fn refresh_bundle_size(&mut self) {
        self.state.bundle_size = estimate_bundle_size(self.state.installed_charts.len());
    }
}

/// Chart ids with a file in `target` whose name matches a template
fn scan_installed(target: &Path, store: &TemplateStore) -> BTreeSet<String> {
    let entries = match std::fs::read_dir(target) {
        Ok(entries) => entries,
        Err(_) => return BTreeSet::new(),
    };
    let known: BTreeSet<String> = store.chart_ids().into_iter().collect();

    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter_map(|path| chart_id_from_path(&path))
        .filter(|id| known.contains(id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const BAR_CHART: &str = r#"import { scaleBand } from 'd3-scale';
import { chartColors } from '../../utils/colors';
import { useChartDimensions } from '../../hooks/useChartDimensions';
import type { Datum } from '../../types';
import { Tooltip } from '../shared/Tooltip';

export function BarChart() { return null; }
"#;

    struct Fixture {
        _templates: TempDir,
        project: TempDir,
        store: TemplateStore,
    }

    impl Fixture {
        fn new() -> Self {
            let templates = TempDir::new().unwrap();
            let root = templates.path();
            for (path, content) in [
                ("charts/bar-chart.tsx", BAR_CHART),
                ("charts/line-chart.tsx", "import '../../hooks/useTooltip';\n"),
                ("utils/colors.ts", "export const chartColors = [];\n"),
                ("utils/Tooltip.tsx", "import type { Datum } from '../types';\n"),
                ("hooks/useChartDimensions.ts", "export {};\n"),
                ("types/index.ts", "export type Datum = number;\n"),
            ] {
                let file = root.join(path);
                std::fs::create_dir_all(file.parent().unwrap()).unwrap();
                std::fs::write(file, content).unwrap();
            }
            let store = TemplateStore::new(root);
            Self {
                _templates: templates,
                project: TempDir::new().unwrap(),
                store,
            }
        }

        fn target(&self) -> PathBuf {
            self.project.path().join("app/canopy")
        }

        fn dashboard(&self) -> Dashboard {
            Dashboard::new(self.store.clone(), self.target())
        }
    }

    #[tokio::test]
    async fn test_initialize_lays_out_target() {
        let fx = Fixture::new();
        let mut dashboard = fx.dashboard();

        let report = dashboard
            .initialize(Some(Framework::NextJs), true, &["bar-chart"])
            .await
            .unwrap();

        let target = fx.target();
        assert!(target.join("utils/colors.ts").is_file());
        assert!(target.join("utils/Tooltip.tsx").is_file());
        assert!(target.join("hooks/useChartDimensions.ts").is_file());
        assert!(target.join("types/index.ts").is_file());
        assert!(target.join("bar-chart.tsx").is_file());
        assert_eq!(report.shared.files, 4);
        assert_eq!(report.charts, vec![target.join("bar-chart.tsx")]);

        // Shared files are copied without rewriting
        assert_eq!(
            std::fs::read_to_string(target.join("utils/Tooltip.tsx")).unwrap(),
            "import type { Datum } from '../types';\n"
        );

        let state = dashboard.state();
        assert_eq!(state.framework, Some(Framework::NextJs));
        assert!(state.typescript);
        assert!(state.is_installed("bar-chart"));
        assert_eq!(state.metrics.unwrap().files_written, 5);
        assert!(dashboard.is_initialized());
    }

    #[tokio::test]
    async fn test_installed_chart_has_rewritten_imports() {
        let fx = Fixture::new();
        let mut dashboard = fx.dashboard();
        let path = dashboard.add_chart("bar-chart", InstallOptions::default()).await.unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("from './utils/colors'"));
        assert!(content.contains("from './hooks/useChartDimensions'"));
        assert!(content.contains("from './types'"));
        assert!(content.contains("from './utils/Tooltip'"));
        for original in ["../../utils/", "../../hooks/", "../../types", "../shared/"] {
            assert!(!content.contains(original));
        }
    }

    #[tokio::test]
    async fn test_already_installed_without_overwrite() {
        let fx = Fixture::new();
        let mut dashboard = fx.dashboard();
        let path = dashboard.add_chart("bar-chart", InstallOptions::default()).await.unwrap();
        std::fs::write(&path, "// local edits").unwrap();
        let before = dashboard.state().clone();

        let err = dashboard
            .add_chart("bar-chart", InstallOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, InstallError::AlreadyInstalled(ref id) if id == "bar-chart"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "// local edits");
        assert_eq!(dashboard.state().installed_charts, before.installed_charts);
        assert_eq!(dashboard.state().bundle_size, before.bundle_size);
    }

    #[tokio::test]
    async fn test_overwrite_replaces_installed_chart() {
        let fx = Fixture::new();
        let mut dashboard = fx.dashboard();
        let path = dashboard.add_chart("bar-chart", InstallOptions::default()).await.unwrap();
        std::fs::write(&path, "// local edits").unwrap();

        dashboard
            .add_chart("bar-chart", InstallOptions { overwrite: true })
            .await
            .unwrap();

        assert!(std::fs::read_to_string(&path).unwrap().contains("BarChart"));
        assert_eq!(dashboard.state().installed_charts.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_template_creates_nothing() {
        let fx = Fixture::new();
        let mut dashboard = fx.dashboard();

        let err = dashboard
            .add_chart("radar-chart", InstallOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, InstallError::TemplateNotFound { ref id, .. } if id == "radar-chart"));
        assert!(!fx.target().exists());
        assert!(dashboard.state().installed_charts.is_empty());
    }

    #[tokio::test]
    async fn test_failed_write_leaves_chart_unrecorded() {
        let fx = Fixture::new();
        let mut dashboard = fx.dashboard();
        std::fs::create_dir_all(fx.target().join("bar-chart.tsx").join("occupied")).unwrap();
        let bundle_before = dashboard.state().bundle_size.clone();

        let err = dashboard
            .add_chart("bar-chart", InstallOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, InstallError::Write { .. }), "got {:?}", err);
        assert!(!err.is_validation());
        assert!(dashboard.state().installed_charts.is_empty());
        assert_eq!(dashboard.state().bundle_size, bundle_before);
    }

    #[tokio::test]
    async fn test_bundled_store_installs_chart() {
        let project = TempDir::new().unwrap();
        let target = project.path().join("src/canopy");
        let mut dashboard = Dashboard::new(TemplateStore::bundled(), target.clone());

        dashboard
            .initialize(Some(Framework::React), true, &["line-chart"])
            .await
            .unwrap();

        let chart = std::fs::read_to_string(target.join("line-chart.tsx")).unwrap();
        assert!(chart.contains("'./utils/colors'"));
        assert!(target.join("types/index.ts").is_file());
    }

    #[tokio::test]
    async fn test_invalid_id_is_rejected() {
        let fx = Fixture::new();
        let mut dashboard = fx.dashboard();
        let err = dashboard
            .add_chart("../bar-chart", InstallOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, InstallError::InvalidChartId(_)));
    }

    #[tokio::test]
    async fn test_initialize_stops_at_first_missing_chart() {
        let fx = Fixture::new();
        let mut dashboard = fx.dashboard();

        let err = dashboard
            .initialize(None, false, &["bar-chart", "radar-chart", "line-chart"])
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert!(dashboard.state().is_installed("bar-chart"));
        assert!(!dashboard.state().is_installed("line-chart"));
        assert!(!fx.target().join("radar-chart.tsx").exists());
    }

    #[tokio::test]
    async fn test_bundle_size_grows_with_charts() {
        let fx = Fixture::new();
        let mut dashboard = fx.dashboard();
        let empty = dashboard.state().bundle_size.clone();

        dashboard.add_chart("bar-chart", InstallOptions::default()).await.unwrap();
        let one = dashboard.state().bundle_size.clone();
        dashboard.add_chart("line-chart", InstallOptions::default()).await.unwrap();
        let two = dashboard.state().bundle_size.clone();

        assert_eq!(empty, "~8KB");
        assert_eq!(one, "~23KB");
        assert_eq!(two, "~38KB");
    }

    #[test]
    fn test_bundle_estimate_is_monotonic() {
        let kb = |n| {
            estimate_bundle_size(n)
                .trim_start_matches('~')
                .trim_end_matches("KB")
                .parse::<usize>()
                .unwrap()
        };
        for n in 0..50 {
            assert!(kb(n + 1) >= kb(n));
        }
    }

    #[tokio::test]
    async fn test_open_sees_charts_from_earlier_runs() {
        let fx = Fixture::new();
        fx.dashboard()
            .initialize(None, true, &["bar-chart"])
            .await
            .unwrap();
        std::fs::write(fx.target().join("my-widget.tsx"), "").unwrap();

        let mut reopened = Dashboard::open(fx.store.clone(), fx.target());
        assert_eq!(
            reopened.state().installed_charts.iter().collect::<Vec<_>>(),
            vec!["bar-chart"]
        );
        assert_eq!(reopened.state().bundle_size, "~23KB");

        let err = reopened
            .add_chart("bar-chart", InstallOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, InstallError::AlreadyInstalled(_)));
    }

    #[test]
    fn test_open_on_missing_target_is_empty() {
        let fx = Fixture::new();
        let dashboard = Dashboard::open(fx.store.clone(), fx.target());
        assert!(dashboard.state().installed_charts.is_empty());
        assert!(!dashboard.is_initialized());
    }

    #[test]
    fn test_dev_tools_ignore_unknown_features() {
        let fx = Fixture::new();
        let mut dashboard = fx.dashboard();
        dashboard.enable_dev_tools(&["data-inspector", "time-travel"]);

        let features = &dashboard.state().dev_tools.as_ref().unwrap().features;
        assert_eq!(features.iter().collect::<Vec<_>>(), vec!["data-inspector"]);
    }
}
