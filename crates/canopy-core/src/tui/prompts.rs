//! Charm-style CLI prompts using cliclack

use crate::config::CanopyConfig;
use crate::dashboard::{Dashboard, InstallOptions, InstallationState};
use crate::project::{self, Framework, ProjectInfo, FRAMEWORK_SIGNATURES};
use crate::registry;
use crate::templates::TemplateStore;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Arguments for `canopy init`
#[derive(Debug, Clone, Default)]
pub struct InitArgs {
    /// Project root, defaults to the current directory
    pub directory: Option<PathBuf>,

    /// Local template directory instead of the bundled one
    pub template_dir: Option<PathBuf>,

    /// Charts to install; prompts when absent
    pub charts: Option<Vec<String>>,

    /// Skip detection and use this framework
    pub framework: Option<Framework>,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Arguments for `canopy add`
#[derive(Debug, Clone, Default)]
pub struct AddArgs {
    pub chart: String,
    pub directory: Option<PathBuf>,
    pub template_dir: Option<PathBuf>,
    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
    /// Replace the chart if it is already installed
    pub overwrite: bool,
}

/// Run `canopy init`: detect the project, pick charts, lay out the target
pub async fn run_init(args: InitArgs) -> Result<()> {
    cliclack::intro("canopy init")?;

    let project_dir = resolve_project_dir(args.directory.as_deref())?;
    let config = load_config(&project_dir)?;
    let info = inspect_project(&project_dir)?;

    let framework = select_framework(info.framework, &args)?;
    let typescript = config.typescript.unwrap_or(info.typescript);

    let store = setup_store(&config, &project_dir, &args.template_dir)?;
    let mut dashboard = Dashboard::open(store, config.target_dir(&project_dir));

    if dashboard.is_initialized() {
        cliclack::log::warning(format!(
            "Canopy is already set up in {}; shared files will be overwritten",
            dashboard.target_path().display()
        ))?;
        let proceed = if args.yes {
            true
        } else {
            cliclack::confirm("Continue anyway?")
                .initial_value(false)
                .interact()?
        };
        if !proceed {
            anyhow::bail!("Setup cancelled.");
        }
    }

    let charts = select_charts(&args, &config)?;

    if config.dev_tools.enabled {
        dashboard.enable_dev_tools(&config.dev_tools.features);
    }

    if !args.yes {
        let confirm: bool = cliclack::confirm(format!(
            "Install {} chart(s) into {}?",
            charts.len(),
            display_relative(dashboard.target_path(), &project_dir)
        ))
        .initial_value(true)
        .interact()?;
        if !confirm {
            anyhow::bail!("Setup cancelled.");
        }
    }

    let spinner = cliclack::spinner();
    spinner.start("Copying templates...");
    let report = match dashboard.initialize(framework, typescript, &charts).await {
        Ok(report) => report,
        Err(e) => {
            spinner.stop("Setup failed");
            return Err(e).context("Failed to initialize canopy");
        }
    };
    spinner.stop(format!(
        "Copied {} shared files and {} chart(s) to {}",
        report.shared.files,
        report.charts.len(),
        display_relative(dashboard.target_path(), &project_dir)
    ));

    report_dependencies(&info, dashboard.state())?;
    print_summary(dashboard.state(), &project_dir)?;
    print_next_steps(dashboard.state(), &project_dir)?;

    Ok(())
}

/// Run `canopy add <chart>`
pub async fn run_add(args: AddArgs) -> Result<()> {
    cliclack::intro("canopy add")?;

    if !registry::is_registered(&args.chart) {
        anyhow::bail!(
            "Unknown chart '{}'. Available charts: {}",
            args.chart,
            registry::ids().join(", ")
        );
    }

    let project_dir = resolve_project_dir(args.directory.as_deref())?;
    let config = load_config(&project_dir)?;
    let info = project::inspect(&project_dir);

    let store = setup_store(&config, &project_dir, &args.template_dir)?;
    let mut dashboard = Dashboard::open(store, config.target_dir(&project_dir));
    dashboard.set_framework(info.framework, config.typescript.unwrap_or(info.typescript));

    if !dashboard.is_initialized() {
        cliclack::log::warning(format!(
            "Shared utilities not found in {}. Run `canopy init` first or the chart's imports won't resolve.",
            display_relative(dashboard.target_path(), &project_dir)
        ))?;
    }

    let mut overwrite = args.overwrite;
    if dashboard.state().is_installed(&args.chart) && !overwrite && !args.yes {
        overwrite = cliclack::confirm(format!(
            "{} is already installed. Overwrite it?",
            args.chart
        ))
        .initial_value(false)
        .interact()?;

        if !overwrite {
            cliclack::outro("Nothing changed.")?;
            return Ok(());
        }
    }

    let spinner = cliclack::spinner();
    spinner.start(format!("Adding {}...", args.chart));
    let path = match dashboard
        .add_chart(&args.chart, InstallOptions { overwrite })
        .await
    {
        Ok(path) => path,
        Err(e) => {
            spinner.stop(format!("Could not add {}", args.chart));
            return Err(e.into());
        }
    };
    spinner.stop(format!("Added {}", display_relative(&path, &project_dir)));

    report_dependencies(&info, dashboard.state())?;
    print_summary(dashboard.state(), &project_dir)?;
    cliclack::outro("Happy charting!")?;

    Ok(())
}

fn resolve_project_dir(directory: Option<&Path>) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().context("Cannot determine current directory")?;

    let path = match directory {
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => current_dir.join(dir),
        None => current_dir,
    };

    if !path.is_dir() {
        anyhow::bail!("Project directory does not exist: {}", path.display());
    }
    Ok(path)
}

fn load_config(project_dir: &Path) -> Result<CanopyConfig> {
    let (config, path) = CanopyConfig::load(project_dir)?;
    if let Some(path) = path {
        cliclack::log::info(format!("Using config from {}", path.display()))?;
    }
    Ok(config)
}

fn inspect_project(project_dir: &Path) -> Result<ProjectInfo> {
    let spinner = cliclack::spinner();
    spinner.start("Inspecting project...");
    let info = project::inspect(project_dir);

    let dialect = if info.typescript { "TypeScript" } else { "JavaScript" };
    match info.framework {
        Some(framework) => spinner.stop(format!("Detected {} ({})", framework, dialect)),
        None => spinner.stop(format!("No framework detected ({})", dialect)),
    }
    Ok(info)
}

fn select_framework(detected: Option<Framework>, args: &InitArgs) -> Result<Option<Framework>> {
    if let Some(framework) = args.framework {
        cliclack::log::info(format!("Using framework: {}", framework))?;
        return Ok(Some(framework));
    }
    if detected.is_some() || args.yes {
        return Ok(detected);
    }

    let mut select = cliclack::select("Which framework does this project use?");
    for sig in FRAMEWORK_SIGNATURES {
        select = select.item(Some(sig.framework), sig.framework.display_name(), "");
    }
    select = select.item(None, "Other / none", "charts are plain React components");
    Ok(select.interact()?)
}

fn select_charts(args: &InitArgs, config: &CanopyConfig) -> Result<Vec<String>> {
    let charts = if let Some(requested) = &args.charts {
        requested.clone()
    } else if args.yes {
        config.default_charts.clone()
    } else {
        let defaults: Vec<&'static str> = registry::all()
            .iter()
            .map(|c| c.id)
            .filter(|id| config.default_charts.iter().any(|d| d == id))
            .collect();

        let mut multi = cliclack::multiselect("Select charts to install");
        for chart in registry::all() {
            multi = multi.item(chart.id, chart.name, chart.description);
        }
        let selected: Vec<&'static str> = multi
            .initial_values(defaults)
            .required(false)
            .interact()?;
        selected.into_iter().map(String::from).collect()
    };

    let unknown: Vec<&str> = charts
        .iter()
        .map(String::as_str)
        .filter(|id| !registry::is_registered(id))
        .collect();
    if !unknown.is_empty() {
        anyhow::bail!(
            "Unknown chart(s): {}. Available charts: {}",
            unknown.join(", "),
            registry::ids().join(", ")
        );
    }

    Ok(charts)
}

fn setup_store(
    config: &CanopyConfig,
    project_dir: &Path,
    template_dir: &Option<PathBuf>,
) -> Result<TemplateStore> {
    let store = match template_dir {
        Some(path) => TemplateStore::new(path.clone()),
        None => config.template_store(project_dir),
    };

    if !store.is_available() {
        anyhow::bail!("Template directory not found: {}", store.describe());
    }
    if template_dir.is_some() || config.template_dir.is_some() {
        cliclack::log::info(format!("Using local templates from {}", store.describe()))?;
    }
    Ok(store)
}

fn report_dependencies(info: &ProjectInfo, state: &InstallationState) -> Result<()> {
    let Some(manifest) = &info.manifest else {
        return Ok(());
    };

    let installed: Vec<&String> = state.installed_charts.iter().collect();
    let required = registry::dependencies_for(&installed);
    let missing = project::missing_dependencies(manifest, &required);
    if missing.is_empty() {
        return Ok(());
    }

    let names: Vec<&str> = missing.iter().map(|m| m.dependency.name).collect();
    cliclack::log::warning(format!("Missing chart dependencies: {}", names.join(", ")))?;

    let specs: Vec<String> = missing.iter().map(|m| m.install_spec()).collect();
    cliclack::log::info(format!(
        "Install them with: {} {}",
        info.package_manager.install_command(),
        specs.join(" ")
    ))?;
    Ok(())
}

fn print_summary(state: &InstallationState, project_dir: &Path) -> Result<()> {
    let framework = state
        .framework
        .map(|f| f.display_name())
        .unwrap_or("unknown");
    let dialect = if state.typescript { "TypeScript" } else { "JavaScript" };
    let charts: Vec<&str> = state.installed_charts.iter().map(String::as_str).collect();

    let mut lines = vec![
        format!("Framework  {} ({})", framework, dialect),
        format!("Location   {}", display_relative(&state.target_path, project_dir)),
        format!("Charts     {}", charts.join(", ")),
        format!("Bundle     {}", state.bundle_size),
    ];
    if let Some(dev_tools) = &state.dev_tools {
        let features: Vec<&str> = dev_tools.features.iter().map(String::as_str).collect();
        lines.push(format!("Dev tools  {}", features.join(", ")));
    }
    if let Some(metrics) = &state.metrics {
        lines.push(format!(
            "Wrote      {} files ({:.1} KB) in {}ms",
            metrics.files_written,
            metrics.bytes_written as f64 / 1024.0,
            metrics.elapsed.as_millis()
        ));
    }

    cliclack::note("Summary", lines.join("\n"))?;
    Ok(())
}

fn print_next_steps(state: &InstallationState, project_dir: &Path) -> Result<()> {
    let location = display_relative(&state.target_path, project_dir);
    let mut steps = Vec::new();

    if let Some(first) = state.installed_charts.iter().next() {
        steps.push(format!(
            "import {{ {} }} from './{}/{}'",
            component_name(first),
            location,
            first
        ));
    }
    steps.push("Add more charts with: canopy add <chart>".to_string());

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy charting!")?;

    Ok(())
}

/// `scatter-plot` -> `ScatterPlot`
fn component_name(id: &str) -> String {
    id.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

fn display_relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_name() {
        assert_eq!(component_name("bar-chart"), "BarChart");
        assert_eq!(component_name("scatter-plot"), "ScatterPlot");
        assert_eq!(component_name("pie"), "Pie");
    }

    #[test]
    fn test_display_relative() {
        let base = Path::new("/work/site");
        assert_eq!(
            display_relative(Path::new("/work/site/app/canopy"), base),
            "app/canopy"
        );
        assert_eq!(display_relative(Path::new("/elsewhere"), base), "/elsewhere");
    }

    #[test]
    fn test_explicit_charts_are_validated() {
        let args = InitArgs {
            charts: Some(vec!["bar-chart".into(), "radar-chart".into()]),
            ..Default::default()
        };
        let err = select_charts(&args, &CanopyConfig::default()).unwrap_err();
        assert!(err.to_string().contains("radar-chart"));
    }

    #[test]
    fn test_yes_uses_config_defaults() {
        let args = InitArgs {
            yes: true,
            ..Default::default()
        };
        let charts = select_charts(&args, &CanopyConfig::default()).unwrap();
        assert_eq!(charts, vec!["bar-chart", "line-chart"]);
    }
}
