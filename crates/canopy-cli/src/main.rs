//! canopy - add D3 chart components to your project

use anyhow::Result;
use canopy_core::registry;
use canopy_core::tui::{AddArgs, InitArgs};
use canopy_core::Framework;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

/// Environment variable holding the log filter
const LOG_ENV: &str = "CANOPY_LOG";

#[derive(Parser, Debug)]
#[command(name = "canopy")]
#[command(about = "Add Canopy D3 chart components to your project")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Set up canopy in a project and install the first charts
    Init(CliInitArgs),
    /// Add a chart to a project
    Add(CliAddArgs),
    /// List the available charts
    List,
}

#[derive(Parser, Debug)]
pub struct CliInitArgs {
    /// Project directory (defaults to the current directory)
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Local directory to use for templates instead of the bundled ones (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Charts to install (comma-separated, e.g. bar-chart,pie-chart)
    #[arg(short, long, value_delimiter = ',')]
    pub charts: Option<Vec<String>>,

    /// Skip framework detection
    #[arg(short, long, value_enum)]
    pub framework: Option<Framework>,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliInitArgs> for InitArgs {
    fn from(args: CliInitArgs) -> Self {
        InitArgs {
            directory: args.dir,
            template_dir: args.template_dir,
            charts: args.charts,
            framework: args.framework,
            yes: args.yes,
        }
    }
}

#[derive(Parser, Debug)]
pub struct CliAddArgs {
    /// Chart to add (see `canopy list`)
    pub chart: String,

    /// Project directory (defaults to the current directory)
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Local directory to use for templates instead of the bundled ones (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,

    /// Replace the chart if it is already installed
    #[arg(short, long)]
    pub overwrite: bool,
}

impl From<CliAddArgs> for AddArgs {
    fn from(args: CliAddArgs) -> Self {
        AddArgs {
            chart: args.chart,
            directory: args.dir,
            template_dir: args.template_dir,
            yes: args.yes,
            overwrite: args.overwrite,
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn print_chart_list() {
    println!("{}", "Available charts".cyan().bold());
    for category in registry::categories() {
        println!();
        println!("  {}", category.display_name().bold());
        for chart in registry::by_category(category) {
            println!(
                "    {:<14} {}",
                chart.id.green(),
                chart.description.dimmed()
            );
        }
    }
    println!();
    println!("Add one with: {}", "canopy add <chart>".yellow());
}

async fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Init(init_args) => canopy_core::run_init(init_args.into()).await,
        Command::Add(add_args) => canopy_core::run_add(add_args.into()).await,
        Command::List => {
            print_chart_list();
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    init_tracing();

    let args = Args::parse();
    let result = run(args).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
