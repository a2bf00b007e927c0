//! # Export Command Implementation
//!
//! Commits a service container to an image and saves the image as
//! `dist/{service}_{project}{branch}_{tag}.tar`.

use anyhow::Result;
use clap::Args;

use webdev_env::lifecycle;
use webdev_env::output::OutputConfig;
use webdev_env::process::SystemRunner;

use super::project_settings;

/// Save a service container as an image tarball
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Service to export
    #[arg(short, long, value_name = "SERVICE")]
    pub service: String,

    /// Image tag
    #[arg(short, long, value_name = "TAG", default_value = "latest")]
    pub tag: String,
}

/// Execute the `export` command.
pub fn execute(args: ExportArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let settings = project_settings(&out)?;

    println!("{}", out.step(&format!("Exporting {}", args.service)));
    let tarball = lifecycle::export(&SystemRunner, &settings, &args.service, &args.tag)?;
    println!(
        "{}",
        out.success(&format!(
            "Saved {}",
            tarball.strip_prefix(&settings.root).unwrap_or(&tarball).display()
        ))
    );
    Ok(())
}
