//! AR Playground CLI - Command-line interface
//!
//! Replays scripted tracking sessions through the `arplayground` library and
//! manages its configuration file.

mod commands;
mod error;

use std::path::PathBuf;
use std::process;

use arplayground::config::ConfigFile;
use arplayground::logging::{init_logging, LoggingGuard};
use clap::{Parser, Subcommand};
use tracing::info;

use commands::config::ConfigCommands;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "arplayground")]
#[command(version = arplayground::VERSION)]
#[command(about = "Replay and inspect AR surface-tracking sessions", long_about = None)]
struct Cli {
    /// Also write log output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of ~/.arplayground/config.ini
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Replay a JSON session script and print the resulting surfaces
    Replay {
        /// Path to the script
        script: PathBuf,
    },

    /// Run a built-in session: scan a room, enter game mode, drop spheres
    Demo,

    /// View or modify configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Config { command } => commands::config::run(command, config_path),
        Commands::Replay { script } => {
            let config = commands::load_config(config_path)?;
            let _guard = start_logging(&config, cli.verbose, "replay")?;
            commands::replay::run_file(&script, &config)
        }
        Commands::Demo => {
            let config = commands::load_config(config_path)?;
            let _guard = start_logging(&config, cli.verbose, "demo")?;
            commands::replay::run_demo(&config)
        }
    }
}

fn start_logging(
    config: &ConfigFile,
    verbose: bool,
    command: &str,
) -> Result<LoggingGuard, CliError> {
    let logging = config.logging.clone().with_console(verbose);
    let guard = init_logging(&logging)?;
    info!(
        version = arplayground::VERSION,
        command,
        log_dir = %guard.directory().display(),
        "AR Playground starting"
    );
    Ok(guard)
}
