//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Webdev - Bootstrap and drive a docker-compose web development environment
#[derive(Parser, Debug)]
#[command(name = "webdev")]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Clone the template infrastructure into a new project directory
    Create(commands::create::CreateArgs),

    /// Configure the selected services and write env and compose files
    Setup(commands::setup::SetupArgs),

    /// Build and start the containers
    Build(commands::build::BuildArgs),

    /// Stop the containers, optionally pruning networks and volumes
    Clean(commands::clean::CleanArgs),

    /// Start or remove the shared reverse proxy
    #[command(name = "loadbalancer", visible_alias = "lb")]
    LoadBalancer(commands::loadbalancer::LoadBalancerArgs),

    /// Rewrite env files from the saved configuration without prompting
    #[command(name = "generate-env", visible_alias = "gen")]
    GenerateEnv(commands::generate_env::GenerateEnvArgs),

    /// Open a shell inside a running service container
    #[command(name = "get-in", visible_alias = "run")]
    GetIn(commands::get_in::GetInArgs),

    /// Save a service container as an image tarball under dist/
    Export(commands::export::ExportArgs),

    /// Load an image tarball previously exported
    Load(commands::load::LoadArgs),

    /// Deploy the project (not implemented)
    Deploy(commands::deploy::DeployArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);
        let color = self.color.as_str();

        match self.command {
            Commands::Create(args) => commands::create::execute(args, color),
            Commands::Setup(args) => commands::setup::execute(args, color),
            Commands::Build(args) => commands::build::execute(args, color),
            Commands::Clean(args) => commands::clean::execute(args, color),
            Commands::LoadBalancer(args) => commands::loadbalancer::execute(args, color),
            Commands::GenerateEnv(args) => commands::generate_env::execute(args, color),
            Commands::GetIn(args) => commands::get_in::execute(args, color),
            Commands::Export(args) => commands::export::execute(args, color),
            Commands::Load(args) => commands::load::execute(args, color),
            Commands::Deploy(args) => commands::deploy::execute(args, color),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// `RUST_LOG` wins over `--log-level` when it is set.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // A second initialisation (tests) is harmless
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}
