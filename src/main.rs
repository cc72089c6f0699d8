use anyhow::Result;
use chrono::{Local, Utc};
use clap::{Args, Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::warn;

use analyzer::analyze;
use fs::LocalFileSystem;
use report::{ConsoleReporter, JsonReporter, Reporter};
use scanner::SessionScanner;

mod analyzer;
mod config;
mod edge_lines;
mod fs;
mod logging;
mod project;
mod report;
mod scanner;
mod timestamp;
mod types;
mod utils;

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "session-hours")]
#[command(version)]
#[command(disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output stats as JSON instead of the console report
    #[arg(long)]
    json: bool,

    /// Transcript root containing `projects/` (defaults to ~/.claude)
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage configuration
    Config(ConfigArgs),
}

#[derive(Args)]
struct ConfigArgs {
    #[command(subcommand)]
    subcommand: ConfigSubcommands,
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Create default configuration file
    Init {
        #[arg(long, default_value_t = false)]
        overwrite: bool,
    },
    /// Show current configuration
    Show,
    /// Set configuration value
    Set {
        /// Configuration key (data-dir, timezone, number-comma, locale, long-session-hours,
        /// streak-warning-days, high-session-average-hours, high-daily-average-hours,
        /// interactive-cutoff-hours, min-file-bytes)
        key: String,
        /// Configuration value
        value: String,
    },
}

/// How a report run ended, short of an unexpected error.
enum Outcome {
    Reported,
    NothingToReport,
}

#[tokio::main]
async fn main() {
    logging::init();
    let cli = Cli::parse();

    match cli.command {
        None => match run_report(cli.json, cli.data_dir).await {
            Ok(Outcome::Reported) => {}
            Ok(Outcome::NothingToReport) => std::process::exit(1),
            Err(e) => {
                eprintln!("Error: {e:#}");
                std::process::exit(1);
            }
        },
        Some(Commands::Config(config_args)) => handle_config_subcommand(config_args),
    }
}

async fn run_report(json: bool, data_dir: Option<PathBuf>) -> Result<Outcome> {
    let config = config::Config::load()
        .unwrap_or_else(|e| {
            warn!("Ignoring unreadable config file: {e:#}");
            None
        })
        .unwrap_or_default();
    let timezone = config.timezone()?;
    let root = config.resolve_data_dir(data_dir)?;

    let reporter: Box<dyn Reporter> = if json {
        Box::new(JsonReporter)
    } else {
        Box::new(ConsoleReporter {
            color: std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
            number_format: utils::NumberFormatOptions {
                use_comma: config.formatting.number_comma,
                locale: config.formatting.locale.clone(),
            },
            timezone_name: timezone
                .map(|tz| tz.name().to_string())
                .unwrap_or_else(utils::get_local_timezone),
        })
    };

    let scanner = SessionScanner::new(LocalFileSystem, config.scan.clone());
    let sessions = scanner.scan(&root).await;

    let now = Utc::now();
    let result = match timezone {
        Some(tz) => analyze(&sessions, &config.analysis, &tz, now),
        None => analyze(&sessions, &config.analysis, &Local, now),
    };

    let Some(result) = result else {
        let reason = format!("No sessions found under {}.", root.display());
        println!("{}", reporter.nothing_to_report(&reason)?);
        return Ok(Outcome::NothingToReport);
    };

    println!("{}", reporter.report(&result)?);
    Ok(Outcome::Reported)
}

fn handle_config_subcommand(config_args: ConfigArgs) {
    let result = match config_args.subcommand {
        ConfigSubcommands::Init { overwrite } => config::create_default_config(overwrite),
        ConfigSubcommands::Show => config::show_config(),
        ConfigSubcommands::Set { key, value } => config::set_config_value(&key, &value),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
