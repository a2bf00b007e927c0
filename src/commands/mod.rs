//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the `webdev`
//! command-line tool. Each subcommand is defined in its own file to keep the
//! logic separated and maintainable.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and the global
//!   `--color` value and performs the command's logic.
//!
//! Commands that act on an existing project treat the current directory as the
//! project root and read its settings through [`project_settings`].

pub mod build;
pub mod clean;
pub mod completions;
pub mod create;
pub mod deploy;
pub mod export;
pub mod generate_env;
pub mod get_in;
pub mod load;
pub mod loadbalancer;
pub mod setup;

use anyhow::Result;
use std::env;

use webdev_env::output::OutputConfig;
use webdev_env::settings::ProjectSettings;

/// Load the settings of the project in the current directory.
///
/// Warns when `.env` is missing and `.env.sample` was used instead.
pub fn project_settings(out: &OutputConfig) -> Result<ProjectSettings> {
    let root = env::current_dir()?;
    let settings = ProjectSettings::load(&root)?;
    if settings.used_sample {
        println!(
            "{}",
            out.warning(".env file is missing, using .env.sample. Create your .env file")
        );
    }
    Ok(settings)
}
