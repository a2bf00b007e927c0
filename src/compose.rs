//! Compose manifest pruning.
//!
//! The template ships compose files declaring every service it knows about.
//! After `setup` only the selected ones are kept. The first run copies the
//! file to `<file>.orig`; every run prunes from that copy, so running `setup`
//! again with a different selection never loses services.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde_yaml::{Mapping, Value};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PruneOutcome {
    /// The compose file does not exist; nothing was written.
    Missing,
    /// Services that were dropped, in document order.
    Pruned { removed: Vec<String> },
}

/// Backup path of a compose file.
pub fn backup_path(file: &Path) -> PathBuf {
    let mut name = file.as_os_str().to_os_string();
    name.push(".orig");
    PathBuf::from(name)
}

/// Keep only the services named in `keep`, working from the `.orig` backup.
pub fn prune(file: &Path, keep: &[String]) -> Result<PruneOutcome> {
    let backup = backup_path(file);
    if !backup.exists() {
        if !file.exists() {
            warn!("{} not found, skipping", file.display());
            return Ok(PruneOutcome::Missing);
        }
        debug!("Saving original {} as {}", file.display(), backup.display());
        fs::copy(file, &backup)?;
    }

    let original: Value = serde_yaml::from_str(&fs::read_to_string(&backup)?)?;
    let (pruned, removed) = prune_document(original, keep);
    fs::write(file, serde_yaml::to_string(&pruned)?)?;
    Ok(PruneOutcome::Pruned { removed })
}

/// Drop unselected services and every `depends_on` / `links` entry that
/// points at one. Top-level keys other than `services` are untouched.
pub fn prune_document(mut document: Value, keep: &[String]) -> (Value, Vec<String>) {
    let mut removed = Vec::new();
    let Some(services) = document
        .get_mut("services")
        .and_then(Value::as_mapping_mut)
    else {
        return (document, removed);
    };

    services.retain(|name, _| {
        let name = name.as_str().unwrap_or_default();
        let selected = keep.iter().any(|k| k == name);
        if !selected {
            removed.push(name.to_string());
        }
        selected
    });

    for (_, service) in services.iter_mut() {
        if let Some(service) = service.as_mapping_mut() {
            prune_references(service, "depends_on", keep);
            prune_references(service, "links", keep);
        }
    }
    (document, removed)
}

fn prune_references(service: &mut Mapping, key: &str, keep: &[String]) {
    let is_kept = |reference: &str| {
        // links may carry an alias: "mysql:db"
        let name = reference.split(':').next().unwrap_or(reference);
        keep.iter().any(|k| k == name)
    };

    let now_empty = match service.get_mut(key) {
        Some(Value::Sequence(items)) => {
            items.retain(|item| item.as_str().is_some_and(is_kept));
            items.is_empty()
        }
        Some(Value::Mapping(items)) => {
            items.retain(|name, _| name.as_str().is_some_and(is_kept));
            items.is_empty()
        }
        _ => false,
    };
    if now_empty {
        service.shift_remove(key);
    }
}
