//! The `setup` pipeline.
//!
//! selector prompt → per-service prompts → normalize → link → manifest →
//! env files → compose pruning. Each stage hands its output to the next;
//! nothing is kept between runs except what is written to disk.

use std::path::{Path, PathBuf};

use log::info;
use serde_json::Value;

use crate::compose::{self, PruneOutcome};
use crate::docker::{COMPOSE_DEV_FILE, COMPOSE_FILE};
use crate::envfile;
use crate::error::{Error, Result};
use crate::manifest::ConfigManifest;
use crate::prompt::{self, Prompter};
use crate::resolve;
use crate::schema::registry::{MAIN, SERVICES};
use crate::schema::{Answers, Registry, Target};

#[derive(Debug, Clone)]
pub struct SetupOptions {
    /// Manifest location, relative to the project root unless absolute.
    pub manifest: PathBuf,
    /// Fail on dependency pointers to services that were not selected.
    pub strict: bool,
}

/// What a setup run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupReport {
    pub services: Vec<String>,
    pub manifest: PathBuf,
    pub env_files: Vec<PathBuf>,
    pub compose: Vec<(PathBuf, PruneOutcome)>,
}

pub fn run(
    root: &Path,
    registry: &Registry,
    prompter: &mut dyn Prompter,
    options: &SetupOptions,
) -> Result<SetupReport> {
    let selector = prompt::collect_service(registry, SERVICES, prompter)?;
    if selector.schema.is_none() {
        return Err(Error::Schema {
            schema: SERVICES.to_string(),
            message: "no service selector schema is available".to_string(),
        });
    }
    let services = selected_services(selector.batches.get(&Target::Main));
    info!("Selected services: {}", services.join(", "));

    let mut names = vec![MAIN.to_string()];
    names.extend(services.iter().cloned());

    let mut answers = vec![selector];
    answers.extend(prompt::collect(registry, &names, prompter)?);
    let buckets = resolve::resolve(answers, options.strict)?;

    let manifest = ConfigManifest::from_buckets(&buckets);
    let manifest_path = root.join(&options.manifest);
    manifest.save(&manifest_path)?;
    let env_files = envfile::write_all(root, &manifest)?;

    let keep = compose_keys(registry, &services);
    let mut pruned = Vec::new();
    for file in [COMPOSE_FILE, COMPOSE_DEV_FILE] {
        let path = root.join(file);
        let outcome = compose::prune(&path, &keep)?;
        pruned.push((path, outcome));
    }

    Ok(SetupReport {
        services,
        manifest: manifest_path,
        env_files,
        compose: pruned,
    })
}

fn selected_services(answers: Option<&Answers>) -> Vec<String> {
    match answers.and_then(|a| a.get(SERVICES)) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::String(single)) if !single.is_empty() => vec![single.clone()],
        _ => Vec::new(),
    }
}

/// Compose service keys of the selected services, in selection order.
pub fn compose_keys(registry: &Registry, services: &[String]) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for service in services {
        let key = registry
            .get(service)
            .map(|schema| schema.compose_key().to_string())
            .unwrap_or_else(|| service.clone());
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}
