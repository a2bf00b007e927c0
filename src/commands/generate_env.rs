//! # Generate-Env Command Implementation
//!
//! Rewrites every env file from the saved `config.json` without asking any
//! question. The output is byte-identical as long as the manifest is unchanged.

use anyhow::Result;
use clap::Args;
use std::env;
use std::path::PathBuf;

use webdev_env::envfile;
use webdev_env::manifest::{ConfigManifest, MANIFEST_FILE};
use webdev_env::output::OutputConfig;

/// Rewrite env files from the saved configuration
#[derive(Args, Debug)]
pub struct GenerateEnvArgs {
    /// Configuration manifest to read
    #[arg(long, value_name = "FILE", default_value = MANIFEST_FILE)]
    pub manifest: PathBuf,
}

/// Execute the `generate-env` command.
pub fn execute(args: GenerateEnvArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let root = env::current_dir()?;

    let manifest = ConfigManifest::load(&root.join(&args.manifest))?;
    let written = envfile::write_all(&root, &manifest)?;

    for path in &written {
        println!("   {}", path.strip_prefix(&root).unwrap_or(path).display());
    }
    println!(
        "{}",
        out.success(&format!("Env files generated ({}).", written.len()))
    );
    Ok(())
}
