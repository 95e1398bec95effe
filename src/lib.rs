//! Valuation of real-estate projects and allocation of an investment budget between them.
#![warn(missing_docs)]
use anyhow::{Context, Result};
use std::path::PathBuf;

pub mod cli;
pub mod finance;
pub mod format;
pub mod id;
pub mod input;
pub mod log;
pub mod output;
pub mod project;
pub mod scenario;
pub mod settings;
pub mod solver;
pub mod units;
pub mod valuation;

#[cfg(test)]
mod fixture;

/// Get the directory in which program config files are stored
pub fn get_quantestate_config_dir() -> Result<PathBuf> {
    let dir = dirs::config_dir().context("Could not find config directory for this platform")?;
    Ok(dir.join("quantestate"))
}
