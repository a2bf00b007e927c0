//! Lookup of service schemas by name.
//!
//! The built-in schemas ship inside the binary. A directory of `<name>.yaml`
//! documents can be layered on top to replace a built-in schema or add new
//! service kinds.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use super::ServiceSchema;
use crate::error::Result;

/// Name of the selector schema asking which services to configure.
pub const SERVICES: &str = "services";
/// Name of the global configuration schema.
pub const MAIN: &str = "main";

const BUILTIN: &[(&str, &str)] = &[
    ("services", include_str!("services/services.yaml")),
    ("main", include_str!("services/main.yaml")),
    ("mysql", include_str!("services/mysql.yaml")),
    ("nginx", include_str!("services/nginx.yaml")),
    ("node", include_str!("services/node.yaml")),
    ("php", include_str!("services/php.yaml")),
    ("redis", include_str!("services/redis.yaml")),
];

/// Selection names that share a schema with another service.
const ALIASES: &[(&str, &str)] = &[
    ("php7", "php"),
    ("mariadb", "mysql"),
    ("nodejs", "node"),
];

/// Read-only set of schemas, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Registry {
    schemas: BTreeMap<String, ServiceSchema>,
    aliases: BTreeMap<String, String>,
}

impl Registry {
    /// The schemas compiled into the binary.
    pub fn builtin() -> Result<Self> {
        let schemas = BUILTIN
            .iter()
            .map(|(name, text)| Ok((name.to_string(), ServiceSchema::from_yaml(name, text)?)))
            .collect::<Result<BTreeMap<_, _>>>()?;
        let aliases = ALIASES
            .iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect();
        Ok(Self { schemas, aliases })
    }

    /// An empty registry, for callers assembling their own schemas.
    pub fn empty() -> Self {
        Self {
            schemas: BTreeMap::new(),
            aliases: BTreeMap::new(),
        }
    }

    /// Add or replace a schema under its own name.
    pub fn insert(&mut self, schema: ServiceSchema) {
        self.schemas.insert(schema.name.clone(), schema);
    }

    /// Layer every `*.yaml` / `*.yml` document in `dir` over the current set.
    pub fn with_overrides(mut self, dir: &Path) -> Result<Self> {
        let mut files: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .and_then(|e| e.to_str())
                        .is_some_and(|e| e == "yaml" || e == "yml")
            })
            .collect();
        files.sort();

        for path in files {
            debug!("Loading schema override {}", path.display());
            let text = fs::read_to_string(&path)?;
            let schema = ServiceSchema::from_yaml(&path.display().to_string(), &text)?;
            self.insert(schema);
        }
        Ok(self)
    }

    /// Schema for a selected service name, following aliases.
    pub fn get(&self, name: &str) -> Option<&ServiceSchema> {
        self.schemas
            .get(name)
            .or_else(|| self.aliases.get(name).and_then(|n| self.schemas.get(n)))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }
}

/// Per-user schema directory, e.g. `~/.config/webdev-env/services` on Linux.
pub fn user_schema_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("webdev-env").join("services"))
}
