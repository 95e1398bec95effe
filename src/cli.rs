//! The command line interface.
use crate::format::{format_currency, format_percent};
use crate::log;
use crate::output::{create_output_directory, get_output_dir, write_results};
use crate::scenario::{Evaluation, Scenario};
use crate::settings::Settings;
use ::log::{info, warn};
use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod example;
use example::ExampleSubcommands;
pub mod settings;
use settings::SettingsSubcommands;

/// Value real-estate projects and choose how many units of each to buy.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options for the run command
#[derive(Args, Default)]
pub struct RunOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Value the projects in a scenario and allocate its budget.
    Run {
        /// Path to the scenario directory.
        scenario_dir: PathBuf,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Manage example scenarios.
    Example {
        /// The available subcommands for managing example scenarios.
        #[command(subcommand)]
        subcommand: ExampleSubcommands,
    },
    /// Check that a scenario can be loaded, without evaluating it.
    Validate {
        /// The path to the scenario directory.
        scenario_dir: PathBuf,
    },
    /// Manage settings file.
    Settings {
        /// The subcommands for managing the settings file.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Run { scenario_dir, opts } => handle_run_command(&scenario_dir, &opts, None),
            Self::Example { subcommand } => subcommand.execute(),
            Self::Validate { scenario_dir } => handle_validate_command(&scenario_dir, None),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and run the requested command
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ quantestate --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Load program settings, if not provided
fn load_settings(settings: Option<Settings>) -> Result<Settings> {
    match settings {
        Some(settings) => Ok(settings),
        None => Settings::load().context("Failed to load settings."),
    }
}

/// Handle the `run` command.
pub fn handle_run_command(
    scenario_path: &Path,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = load_settings(settings)?;

    // Get path to output folder
    let pathbuf: PathBuf;
    let output_path = if let Some(p) = opts.output_dir.as_deref() {
        p
    } else {
        pathbuf = get_output_dir(scenario_path)?;
        &pathbuf
    };

    let overwritten = create_output_directory(output_path, opts.overwrite || settings.overwrite)
        .with_context(|| {
            format!(
                "Failed to create output directory: {}",
                output_path.display()
            )
        })?;

    log::init(&settings.log_level, Some(output_path))
        .context("Failed to initialise logging.")?;

    let scenario = Scenario::from_path(scenario_path).context("Failed to load scenario.")?;
    info!("Loaded scenario from {}", scenario_path.display());
    info!("Output folder: {}", output_path.display());

    // NB: We have to wait until the logger is initialised to display this warning
    if overwritten {
        warn!("Output folder was overwritten");
    }

    let evaluation = scenario.evaluate()?;
    log_recommendations(&scenario, &evaluation);

    write_results(output_path, scenario_path, &scenario, &evaluation)
        .context("Failed to write results.")?;
    info!("Evaluation complete!");

    Ok(())
}

/// Log the recommended purchases and portfolio totals
fn log_recommendations(scenario: &Scenario, evaluation: &Evaluation) {
    let solution = &evaluation.solution;
    if solution.is_heuristic() {
        info!("{} ({})", solution.status, solution.method.description());
    } else {
        info!("{}", solution.status);
    }

    if !evaluation.has_investment() {
        warn!("No viable investment: no project adds value within the budget");
        return;
    }

    for purchase in evaluation.iter_purchases() {
        info!(
            "Buy {} x {}: investment {}, profit {}",
            purchase.units,
            purchase.valued.project.name,
            format_currency(purchase.investment),
            format_currency(purchase.profit)
        );
    }

    let budget = scenario.parameters.budget;
    info!(
        "Total investment: {} of {} ({} of budget)",
        format_currency(solution.total_cost),
        format_currency(budget),
        format_percent(evaluation.budget_utilisation(budget))
    );
    info!("Total NPV: {}", format_currency(solution.total_npv));
}

/// Handle the `validate` command.
pub fn handle_validate_command(scenario_path: &Path, settings: Option<Settings>) -> Result<()> {
    let settings = load_settings(settings)?;

    // We won't save log files when running the validate command
    log::init(&settings.log_level, None).context("Failed to initialise logging.")?;

    Scenario::from_path(scenario_path).context("Failed to validate scenario.")?;
    info!("Scenario validation successful!");

    Ok(())
}
