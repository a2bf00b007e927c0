//! The persisted configuration manifest (`config.json`).
//!
//! Resolved buckets are stripped down to their output path before they are
//! written; prompt and default definitions never reach the file. Buckets
//! without a path (the service selector, unknown services) are dropped. The
//! first remaining bucket is the global `main` entry.

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::resolve::{Bucket, EnvMap};

/// Default manifest location, relative to the project root.
pub const MANIFEST_FILE: &str = "config.json";

/// What is kept of a schema in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaStub {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub service: String,
    pub schema: SchemaStub,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<EnvMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev: Option<EnvMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prod: Option<EnvMap>,
}

impl ManifestEntry {
    pub fn path(&self) -> &str {
        &self.schema.path
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigManifest {
    pub main: Option<ManifestEntry>,
    #[serde(default)]
    pub services: Vec<ManifestEntry>,
}

impl ConfigManifest {
    pub fn from_buckets(buckets: &[Bucket<'_>]) -> Self {
        let mut entries = buckets.iter().filter_map(|bucket| {
            let path = bucket.path()?;
            Some(ManifestEntry {
                service: bucket.service.clone(),
                schema: SchemaStub {
                    path: path.to_string(),
                },
                main: bucket.main.clone(),
                dev: bucket.dev.clone(),
                prod: bucket.prod.clone(),
            })
        });

        let main = entries.next();
        Self {
            main,
            services: entries.collect(),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        debug!("Writing manifest {}", path.display());
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ManifestNotFound {
                path: path.display().to_string(),
            });
        }
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Selected services in manifest order, `main` excluded.
    pub fn service_names(&self) -> impl Iterator<Item = &str> {
        self.services.iter().map(|e| e.service.as_str())
    }
}
