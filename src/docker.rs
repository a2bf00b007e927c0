//! Argument builders for `docker` and `docker-compose`.
//!
//! Nothing in here runs a process; each function returns the
//! [`ProcessCommand`]s a lifecycle recipe will hand to a runner. Names follow
//! the conventions of the template infrastructure:
//!
//! - container: `{service}_{project}{branch}`
//! - image: `{registry}/{project}/{service}:{tag}` (registry optional)
//! - exported tarball: `dist/{service}_{project}{branch}_{tag}.tar`

use std::fmt;

use crate::process::ProcessCommand;
use crate::settings::ProjectSettings;

/// Base compose file of the project stack.
pub const COMPOSE_FILE: &str = "yml/docker-compose.yml";
/// Development override compose file.
pub const COMPOSE_DEV_FILE: &str = "yml/docker-compose.dev.yml";
/// Compose file of the shared reverse proxy.
pub const LOADBALANCER_COMPOSE_FILE: &str = "network/docker-compose.yml";
/// Network shared by every project behind the reverse proxy.
pub const LOADBALANCER_NETWORK: &str = "loadbalancer";
/// Directory receiving exported image tarballs.
pub const DIST_DIR: &str = "dist";

/// Target environment of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BuildEnvironment {
    Dev,
    Prod,
}

impl fmt::Display for BuildEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildEnvironment::Dev => f.write_str("dev"),
            BuildEnvironment::Prod => f.write_str("prod"),
        }
    }
}

/// Container name for a service of this project.
pub fn container_name(settings: &ProjectSettings, service: &str) -> String {
    format!("{}_{}{}", service, settings.project_name, settings.branch)
}

/// Fully qualified image reference for a service.
pub fn image_name(settings: &ProjectSettings, service: &str, tag: &str) -> String {
    match &settings.registry {
        Some(registry) => format!(
            "{}/{}/{}:{}",
            registry, settings.project_name, service, tag
        ),
        None => format!("{}/{}:{}", settings.project_name, service, tag),
    }
}

/// File name (inside [`DIST_DIR`]) of an exported image.
pub fn tarball_name(settings: &ProjectSettings, service: &str, tag: &str) -> String {
    format!("{}_{}.tar", container_name(settings, service), tag)
}

fn compose(settings: &ProjectSettings) -> ProcessCommand {
    ProcessCommand::new(settings.compose_bin.clone()).current_dir(&settings.root)
}

fn docker(settings: &ProjectSettings) -> ProcessCommand {
    ProcessCommand::new(settings.docker_bin.clone()).current_dir(&settings.root)
}

/// `compose up` with the override files of the chosen environment.
pub fn compose_up(settings: &ProjectSettings, environment: BuildEnvironment) -> ProcessCommand {
    let command = compose(settings).args(["-f", COMPOSE_FILE]);
    match environment {
        BuildEnvironment::Dev => command.args([
            "-f",
            COMPOSE_DEV_FILE,
            "up",
            "-d",
            "--build",
            "--remove-orphans",
        ]),
        BuildEnvironment::Prod => command.args(["up", "-d", "--build"]),
    }
}

/// `compose down` run from the project's `yml/` directory.
pub fn compose_down(settings: &ProjectSettings) -> ProcessCommand {
    compose(settings)
        .arg("down")
        .current_dir(settings.path("yml"))
}

pub fn prune_networks(settings: &ProjectSettings) -> ProcessCommand {
    docker(settings).args(["network", "prune", "-f"])
}

pub fn prune_volumes(settings: &ProjectSettings) -> ProcessCommand {
    docker(settings).args(["volume", "prune", "-f"])
}

/// Lists docker networks; captured so the output can be inspected.
pub fn list_networks(settings: &ProjectSettings) -> ProcessCommand {
    docker(settings).args(["network", "ls"]).capture()
}

pub fn loadbalancer_up(settings: &ProjectSettings) -> ProcessCommand {
    compose(settings).args(["-f", LOADBALANCER_COMPOSE_FILE, "up", "-d", "--build"])
}

pub fn loadbalancer_down(settings: &ProjectSettings) -> ProcessCommand {
    compose(settings)
        .arg("down")
        .current_dir(settings.path("network"))
}

/// Interactive shell inside a running service container.
pub fn exec_shell(settings: &ProjectSettings, service: &str, shell: &str) -> ProcessCommand {
    docker(settings).args([
        "exec".to_string(),
        "-it".to_string(),
        container_name(settings, service),
        shell.to_string(),
    ])
}

pub fn commit(settings: &ProjectSettings, service: &str, tag: &str) -> ProcessCommand {
    docker(settings).args([
        "commit".to_string(),
        container_name(settings, service),
        image_name(settings, service, tag),
    ])
}

pub fn save(settings: &ProjectSettings, service: &str, tag: &str) -> ProcessCommand {
    docker(settings)
        .args([
            "save".to_string(),
            "-o".to_string(),
            format!("{}/{}", DIST_DIR, tarball_name(settings, service, tag)),
            image_name(settings, service, tag),
        ])
        .capture()
}

pub fn load(settings: &ProjectSettings, service: &str, tag: &str) -> ProcessCommand {
    docker(settings)
        .args([
            "load".to_string(),
            "-i".to_string(),
            format!("{}/{}", DIST_DIR, tarball_name(settings, service, tag)),
        ])
        .capture()
}
