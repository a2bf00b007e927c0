//! Lifecycle recipes: short, linear sequences of `git` / `docker` /
//! `docker-compose` invocations.
//!
//! Every recipe stops at the first failing step and returns its error; steps
//! that already ran are not undone. Nothing is retried.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::docker::{self, BuildEnvironment, DIST_DIR, LOADBALANCER_NETWORK};
use crate::error::{Error, Result};
use crate::git;
use crate::process::{run_all, ProcessOutput, Runner};
use crate::settings::ProjectSettings;

/// Clone the template into `parent/name` and strip it down to a fresh project.
///
/// Returns the names of the top-level files removed from the clone.
pub fn create(runner: &dyn Runner, parent: &Path, name: &str, repo: &str) -> Result<Vec<String>> {
    let target = parent.join(name);
    if target.exists() {
        return Err(Error::Precondition {
            message: format!("A directory named '{}' already exists", name),
            hint: Some("choose another project name or remove the directory".to_string()),
        });
    }

    git::clone(runner, repo, &target)?;
    git::strip_history(&target)?;
    let removed = git::remove_clutter(&target)?;
    info!("Created {} from {}", target.display(), repo);
    Ok(removed)
}

pub fn build(
    runner: &dyn Runner,
    settings: &ProjectSettings,
    environment: BuildEnvironment,
) -> Result<()> {
    runner.run(&docker::compose_up(settings, environment))?;
    Ok(())
}

/// Stop the stack; with `remove`, prune networks and volumes first.
pub fn clean(runner: &dyn Runner, settings: &ProjectSettings, remove: bool) -> Result<()> {
    let mut commands = Vec::new();
    if remove {
        commands.push(docker::prune_networks(settings));
        commands.push(docker::prune_volumes(settings));
    }
    commands.push(docker::compose_down(settings));
    run_all(runner, &commands)?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadBalancerState {
    /// The shared network already existed; nothing was started.
    AlreadyRunning,
    Started,
    Removed,
}

pub fn loadbalancer(
    runner: &dyn Runner,
    settings: &ProjectSettings,
    remove: bool,
) -> Result<LoadBalancerState> {
    if remove {
        runner.run(&docker::loadbalancer_down(settings))?;
        return Ok(LoadBalancerState::Removed);
    }

    let networks = runner.run(&docker::list_networks(settings))?;
    if has_network(&networks, LOADBALANCER_NETWORK) {
        debug!("Network {} found", LOADBALANCER_NETWORK);
        return Ok(LoadBalancerState::AlreadyRunning);
    }
    runner.run(&docker::loadbalancer_up(settings))?;
    Ok(LoadBalancerState::Started)
}

/// `docker network ls` prints `NETWORK ID  NAME  DRIVER  SCOPE`.
fn has_network(output: &ProcessOutput, name: &str) -> bool {
    output
        .stdout
        .lines()
        .skip(1)
        .any(|line| line.split_whitespace().nth(1) == Some(name))
}

pub fn get_in(
    runner: &dyn Runner,
    settings: &ProjectSettings,
    service: &str,
    shell: &str,
) -> Result<()> {
    runner.run(&docker::exec_shell(settings, service, shell))?;
    Ok(())
}

/// Commit the service container to an image and save it under `dist/`.
///
/// Returns the tarball path.
pub fn export(
    runner: &dyn Runner,
    settings: &ProjectSettings,
    service: &str,
    tag: &str,
) -> Result<PathBuf> {
    fs::create_dir_all(settings.path(DIST_DIR))?;
    run_all(
        runner,
        &[
            docker::commit(settings, service, tag),
            docker::save(settings, service, tag),
        ],
    )?;
    Ok(tarball_path(settings, service, tag))
}

/// Load a tarball written by [`export`]. Returns what `docker load` printed.
pub fn load(
    runner: &dyn Runner,
    settings: &ProjectSettings,
    service: &str,
    tag: &str,
) -> Result<String> {
    let tarball = tarball_path(settings, service, tag);
    if !tarball.exists() {
        return Err(Error::Precondition {
            message: format!("{} does not exist", tarball.display()),
            hint: Some(format!("export it first with `webdev export -s {}`", service)),
        });
    }
    let output = runner.run(&docker::load(settings, service, tag))?;
    Ok(output.stdout)
}

pub fn deploy() -> Result<()> {
    Err(Error::NotImplemented {
        feature: "deploy".to_string(),
    })
}

fn tarball_path(settings: &ProjectSettings, service: &str, tag: &str) -> PathBuf {
    settings
        .path(DIST_DIR)
        .join(docker::tarball_name(settings, service, tag))
}
