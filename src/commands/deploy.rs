//! # Deploy Command Implementation

use anyhow::Result;
use clap::Args;

use webdev_env::lifecycle;
use webdev_env::output::OutputConfig;

/// Deploy the project (not implemented)
#[derive(Args, Debug)]
pub struct DeployArgs {}

/// Execute the `deploy` command.
pub fn execute(_args: DeployArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    println!("{}", out.warning("Deploy is not available yet."));
    lifecycle::deploy()?;
    Ok(())
}
