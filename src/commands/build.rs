//! # Build Command Implementation
//!
//! Builds and starts the project containers with `docker-compose`. The
//! development build layers `yml/docker-compose.dev.yml` over the base file;
//! the production build uses the base file alone.

use anyhow::Result;
use clap::Args;

use webdev_env::docker::BuildEnvironment;
use webdev_env::lifecycle;
use webdev_env::output::OutputConfig;
use webdev_env::process::SystemRunner;

use super::project_settings;

/// Build and start the containers
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Build environment
    #[arg(short, long, value_enum, value_name = "ENV", default_value_t = BuildEnvironment::Dev)]
    pub env: BuildEnvironment,
}

/// Execute the `build` command.
pub fn execute(args: BuildArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let settings = project_settings(&out)?;

    println!(
        "{}",
        out.step(&format!("Building {} ({})", settings.project_name, args.env))
    );
    lifecycle::build(&SystemRunner, &settings, args.env)?;
    println!("{}", out.success("Containers are up."));
    Ok(())
}
