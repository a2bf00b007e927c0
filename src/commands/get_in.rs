//! # Get-In Command Implementation
//!
//! Opens an interactive shell in a running container of this project. The
//! container is found by name: `{service}_{PROJECT_NAME}{BRANCH}`.

use anyhow::Result;
use clap::Args;

use webdev_env::lifecycle;
use webdev_env::output::OutputConfig;
use webdev_env::process::SystemRunner;

use super::project_settings;

/// Open a shell inside a running service container
#[derive(Args, Debug)]
pub struct GetInArgs {
    /// Service whose container to enter
    #[arg(short, long, value_name = "SERVICE")]
    pub service: String,

    /// Shell to start in the container
    #[arg(long, value_name = "SHELL", default_value = "sh")]
    pub shell: String,
}

/// Execute the `get-in` command.
pub fn execute(args: GetInArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let settings = project_settings(&out)?;
    lifecycle::get_in(&SystemRunner, &settings, &args.service, &args.shell)?;
    Ok(())
}
