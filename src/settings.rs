//! Project settings read from `.env` files.
//!
//! Lifecycle commands need a handful of process-wide values (project name,
//! branch, image registry, which binaries to call). They come from, in
//! increasing precedence:
//!
//! 1. `.env.sample`, only when `.env` does not exist
//! 2. `.env`
//! 3. `yml/.env` (written by `webdev setup`)
//! 4. the process environment
//!
//! Files are parsed with `dotenvy` into a map; the process environment is
//! never modified.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::Result;

/// Template infrastructure cloned by `webdev create`.
pub const DEFAULT_TEMPLATE_REPO: &str = "https://github.com/caffeinalab/docker-webdev-env";

const KEYS: &[&str] = &[
    "PROJECT_NAME",
    "BRANCH",
    "REGISTRY",
    "DOCKER_BIN",
    "COMPOSE_BIN",
    "WEBDEV_TEMPLATE_REPO",
];

/// Resolved settings for one project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSettings {
    pub root: PathBuf,
    pub project_name: String,
    pub branch: String,
    pub registry: Option<String>,
    pub docker_bin: String,
    pub compose_bin: String,
    pub template_repo: String,
    /// True when `.env` was missing and `.env.sample` was used instead.
    pub used_sample: bool,
}

impl ProjectSettings {
    /// Load settings for the project rooted at `root`, consulting the real
    /// process environment.
    pub fn load(root: &Path) -> Result<Self> {
        let env: HashMap<String, String> = KEYS
            .iter()
            .filter_map(|key| std::env::var(key).ok().map(|v| (key.to_string(), v)))
            .collect();
        Self::load_with_env(root, &env)
    }

    /// Load settings with an explicit process environment.
    pub fn load_with_env(root: &Path, process_env: &HashMap<String, String>) -> Result<Self> {
        let mut values: HashMap<String, String> = HashMap::new();
        let mut used_sample = false;

        let dot_env = root.join(".env");
        if dot_env.exists() {
            merge_file(&mut values, &dot_env)?;
        } else {
            let sample = root.join(".env.sample");
            if sample.exists() {
                merge_file(&mut values, &sample)?;
                used_sample = true;
            }
        }

        let yml_env = root.join("yml").join(".env");
        if yml_env.exists() {
            merge_file(&mut values, &yml_env)?;
        }

        for (key, value) in process_env {
            values.insert(key.clone(), value.clone());
        }

        let get = |key: &str| values.get(key).filter(|v| !v.is_empty()).cloned();

        let project_name = get("PROJECT_NAME").unwrap_or_else(|| {
            root.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "project".to_string())
        });

        Ok(Self {
            root: root.to_path_buf(),
            project_name,
            branch: get("BRANCH").unwrap_or_default(),
            registry: get("REGISTRY").map(|r| r.trim_end_matches('/').to_string()),
            docker_bin: get("DOCKER_BIN").unwrap_or_else(|| "docker".to_string()),
            compose_bin: get("COMPOSE_BIN").unwrap_or_else(|| "docker-compose".to_string()),
            template_repo: get("WEBDEV_TEMPLATE_REPO")
                .unwrap_or_else(|| DEFAULT_TEMPLATE_REPO.to_string()),
            used_sample,
        })
    }

    /// Path of a file or directory relative to the project root.
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }
}

fn merge_file(values: &mut HashMap<String, String>, path: &Path) -> Result<()> {
    debug!("Reading settings from {}", path.display());
    for item in dotenvy::from_path_iter(path)? {
        let (key, value) = item?;
        values.insert(key, value);
    }
    Ok(())
}
