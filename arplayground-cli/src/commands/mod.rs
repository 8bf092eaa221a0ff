//! CLI command implementations.

pub mod config;
pub mod replay;

use std::path::Path;

use arplayground::config::ConfigFile;

use crate::error::CliError;

/// Load the config file at `path`, or from the default location.
///
/// A missing file yields the defaults in both cases.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let config = match path {
        Some(path) if path.exists() => ConfigFile::load_from(path)?,
        Some(_) => ConfigFile::default(),
        None => ConfigFile::load()?,
    };
    Ok(config)
}
