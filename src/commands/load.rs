//! # Load Command Implementation
//!
//! Loads an image tarball written by `webdev export`.

use anyhow::Result;
use clap::Args;

use webdev_env::lifecycle;
use webdev_env::output::OutputConfig;
use webdev_env::process::SystemRunner;

use super::project_settings;

/// Load an exported image tarball
#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Service whose image to load
    #[arg(short, long, value_name = "SERVICE")]
    pub service: String,

    /// Image tag used at export time
    #[arg(short, long, value_name = "TAG", default_value = "latest")]
    pub tag: String,
}

/// Execute the `load` command.
pub fn execute(args: LoadArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let settings = project_settings(&out)?;

    println!("{}", out.step(&format!("Loading {}", args.service)));
    let printed = lifecycle::load(&SystemRunner, &settings, &args.service, &args.tag)?;
    if !printed.trim().is_empty() {
        println!("{}", out.process_output(&printed));
    }
    println!("{}", out.success("Image loaded."));
    Ok(())
}
