use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dinnerplan::cli::plan::PlanOptions;

/// dinnerplan - weekly dinner rotation
#[derive(Parser)]
#[command(name = "dinnerplan")]
#[command(about = "Pick this week's dinners without repeating last week's", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    /// Dinner catalog (overrides config file)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Rotation state file (overrides config file)
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Seed for a reproducible selection
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Print the menu without saving the rotation
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Select and print this week's dinners (default)
    Plan,
    /// Print the stored rotation
    History,
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // Load configuration
    let mut config = dinnerplan::config::Config::load(cli.config.clone())?;

    if let Some(catalog) = cli.catalog {
        config.paths.catalog = catalog;
    }
    if let Some(state) = cli.state {
        config.paths.state = state;
    }

    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    // Initialize observability (tracing + logging)
    dinnerplan::observability::init_observability(
        "dinnerplan",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    let options = PlanOptions {
        seed: cli.seed,
        dry_run: cli.dry_run,
    };

    match cli.command.unwrap_or(Commands::Plan) {
        Commands::Plan => dinnerplan::cli::plan::run(config, options),
        Commands::History => dinnerplan::cli::history::run(config),
    }
}
