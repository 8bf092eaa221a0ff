//! Configuration management CLI commands.
//!
//! Provides `config get`, `config set`, `config list`, and `config path`.

use std::path::{Path, PathBuf};

use arplayground::config::{config_file_path, ConfigFile, ConfigKey};
use clap::Subcommand;

use super::load_config;
use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., placement.sphere_mass)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key in format section.key (e.g., placement.sphere_mass)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand against `path`, or the default config file.
pub fn run(command: ConfigCommands, path: Option<&Path>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => run_get(&key, path),
        ConfigCommands::Set { key, value } => run_set(&key, &value, path),
        ConfigCommands::List => run_list(path),
        ConfigCommands::Path => {
            println!("{}", resolve_path(path).display());
            Ok(())
        }
    }
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'arplayground config list' to see available keys.",
            key
        ))
    })
}

fn resolve_path(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf).unwrap_or_else(config_file_path)
}

fn run_get(key: &str, path: Option<&Path>) -> Result<(), CliError> {
    let config_key = parse_key(key)?;
    let config = load_config(path)?;
    println!("{}", config_key.get(&config));
    Ok(())
}

fn run_set(key: &str, value: &str, path: Option<&Path>) -> Result<(), CliError> {
    let config_key = parse_key(key)?;
    let mut config = load_config(path)?;
    set_value(&mut config, config_key, value)?;

    match path {
        Some(path) => config.save_to(path)?,
        None => config.save()?,
    }

    println!("Set {} = {}", config_key.name(), config_key.get(&config));
    Ok(())
}

fn set_value(config: &mut ConfigFile, key: ConfigKey, value: &str) -> Result<(), CliError> {
    key.set(config, value)
        .map_err(|e| CliError::Config(e.to_string()))
}

fn run_list(path: Option<&Path>) -> Result<(), CliError> {
    let config = load_config(path)?;
    print!("{}", render_list(&config));
    Ok(())
}

/// Render every setting grouped by section, INI style.
fn render_list(config: &ConfigFile) -> String {
    let mut out = String::from("Configuration Settings\n======================\n");
    let mut current_section = "";

    for key in ConfigKey::all() {
        let section = key.section();
        if section != current_section {
            out.push_str(&format!("\n[{}]\n", section));
            current_section = section;
        }
        out.push_str(&format!("  {} = {}\n", key.key_name(), key.get(config)));
    }

    out
}
