//! # Clean Command Implementation
//!
//! Stops the project containers. With `--rm`, unused docker networks and
//! volumes are pruned first.

use anyhow::Result;
use clap::Args;

use webdev_env::lifecycle;
use webdev_env::output::OutputConfig;
use webdev_env::process::SystemRunner;

use super::project_settings;

/// Stop the containers
#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Also prune unused docker networks and volumes
    #[arg(short = 'r', long = "rm")]
    pub remove: bool,
}

/// Execute the `clean` command.
pub fn execute(args: CleanArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let settings = project_settings(&out)?;

    if args.remove {
        println!("{}", out.step("Pruning networks and volumes"));
    }
    println!("{}", out.step("Stopping containers"));
    lifecycle::clean(&SystemRunner, &settings, args.remove)?;
    println!("{}", out.success("Containers stopped."));
    Ok(())
}
