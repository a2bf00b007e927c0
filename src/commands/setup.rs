//! # Setup Command Implementation
//!
//! Runs the configuration pipeline in the current project: asks which services
//! to use and how to configure them, then writes `config.json`, the per-service
//! env files and the pruned compose files.
//!
//! ## Answer Sources
//!
//! - **Interactive** (default): prompts in the terminal with `dialoguer`.
//! - **Answers file** (`--answers`): a YAML document replayed without prompting;
//!   a missing required answer or a failed validation aborts the run.
//!
//! ## Schemas
//!
//! Built-in schemas can be replaced or extended with `<name>.yaml` documents in
//! the user schema directory (e.g. `~/.config/webdev-env/services`) and in the
//! directory given with `--schemas`, which is applied last.

use anyhow::{Context, Result};
use clap::Args;
use std::env;
use std::path::{Path, PathBuf};

use webdev_env::compose::PruneOutcome;
use webdev_env::manifest::MANIFEST_FILE;
use webdev_env::output::OutputConfig;
use webdev_env::prompt::{AnswerFilePrompter, DialoguerPrompter, Prompter};
use webdev_env::schema::registry::user_schema_dir;
use webdev_env::schema::Registry;
use webdev_env::setup::{self, SetupOptions};

/// Configure the project's services
#[derive(Args, Debug)]
pub struct SetupArgs {
    /// Read answers from a YAML file instead of prompting
    #[arg(long, value_name = "FILE")]
    pub answers: Option<PathBuf>,

    /// Directory of schema documents overriding the built-in ones
    #[arg(long, value_name = "DIR", env = "WEBDEV_SCHEMAS")]
    pub schemas: Option<PathBuf>,

    /// Fail when a service depends on a service that was not selected
    #[arg(long)]
    pub strict: bool,

    /// Where to write the configuration manifest
    #[arg(long, value_name = "FILE", default_value = MANIFEST_FILE)]
    pub manifest: PathBuf,
}

/// Execute the `setup` command.
pub fn execute(args: SetupArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let root = env::current_dir()?;
    let registry = load_registry(args.schemas.as_ref())?;

    let mut prompter: Box<dyn Prompter> = match &args.answers {
        Some(path) => Box::new(
            AnswerFilePrompter::from_path(path)
                .with_context(|| format!("Failed to read answers from {}", path.display()))?,
        ),
        None => Box::new(DialoguerPrompter::new(out.clone())),
    };

    let options = SetupOptions {
        manifest: args.manifest,
        strict: args.strict,
    };
    let report = setup::run(&root, &registry, prompter.as_mut(), &options)?;

    println!();
    println!(
        "{}",
        out.success(&format!("Configured services: {}", report.services.join(", ")))
    );
    println!("   {}", relative(&root, &report.manifest));
    for file in &report.env_files {
        println!("   {}", relative(&root, file));
    }
    for (file, outcome) in &report.compose {
        match outcome {
            PruneOutcome::Missing => println!(
                "{}",
                out.warning(&format!("{} not found, not pruned", relative(&root, file)))
            ),
            PruneOutcome::Pruned { removed } if removed.is_empty() => {}
            PruneOutcome::Pruned { removed } => println!(
                "{}",
                out.step(&format!(
                    "Removed from {}: {}",
                    relative(&root, file),
                    removed.join(", ")
                ))
            ),
        }
    }
    println!("💡 Run `webdev build` to start the containers");
    Ok(())
}

fn load_registry(extra: Option<&PathBuf>) -> Result<Registry> {
    let mut registry = Registry::builtin()?;
    if let Some(dir) = user_schema_dir().filter(|d| d.is_dir()) {
        registry = registry.with_overrides(&dir)?;
    }
    if let Some(dir) = extra {
        registry = registry
            .with_overrides(dir)
            .with_context(|| format!("Failed to load schemas from {}", dir.display()))?;
    }
    Ok(registry)
}

fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
