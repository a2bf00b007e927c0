//! # Create Command Implementation
//!
//! Clones the template infrastructure repository into a new directory, drops
//! its git history and removes the template's own images, markdown files and
//! `.gitignore`.
//!
//! The template comes from `--repo`, else from `WEBDEV_TEMPLATE_REPO` in the
//! environment or the current directory's `.env`, else the default template.

use anyhow::Result;
use clap::Args;
use std::env;

use webdev_env::lifecycle;
use webdev_env::output::OutputConfig;
use webdev_env::process::SystemRunner;
use webdev_env::settings::ProjectSettings;

/// Create a new project from the template infrastructure
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Name of the project directory to create
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Template repository to clone
    #[arg(long, value_name = "URL")]
    pub repo: Option<String>,
}

/// Execute the `create` command.
pub fn execute(args: CreateArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let parent = env::current_dir()?;

    let repo = match args.repo {
        Some(repo) => repo,
        None => ProjectSettings::load(&parent)?.template_repo,
    };

    println!("{}", out.step("Cloning docker infrastructure"));
    let removed = lifecycle::create(&SystemRunner, &parent, &args.name, &repo)?;
    for name in &removed {
        log::debug!("Removed {}", name);
    }

    println!("{}", out.success("Project cloned."));
    println!(
        "💡 Run `cd {} && webdev setup` to configure your services",
        args.name
    );
    Ok(())
}
