//! # Load Balancer Command Implementation
//!
//! Manages the reverse proxy shared by every project on the machine. It lives
//! in `network/docker-compose.yml` and owns the `loadbalancer` docker network;
//! if that network already exists the proxy is assumed to be running.

use anyhow::Result;
use clap::Args;

use webdev_env::lifecycle::{self, LoadBalancerState};
use webdev_env::output::OutputConfig;
use webdev_env::process::SystemRunner;

use super::project_settings;

/// Start or remove the shared reverse proxy
#[derive(Args, Debug)]
pub struct LoadBalancerArgs {
    /// Remove the reverse proxy instead of starting it
    #[arg(short = 'r', long = "rm")]
    pub remove: bool,
}

/// Execute the `loadbalancer` command.
pub fn execute(args: LoadBalancerArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let settings = project_settings(&out)?;

    let state = lifecycle::loadbalancer(&SystemRunner, &settings, args.remove)?;
    let message = match state {
        LoadBalancerState::AlreadyRunning => out.warning("Load balancer network already exists."),
        LoadBalancerState::Started => out.success("Load balancer started."),
        LoadBalancerState::Removed => out.success("Load balancer removed."),
    };
    println!("{}", message);
    Ok(())
}
