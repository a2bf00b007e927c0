//! # Configuration Resolver
//!
//! Turns the collector's raw answers into flat environment buckets in two
//! stages.
//!
//! ## Normalization
//!
//! Each [`RawAnswer`] becomes one [`Bucket`]. Answer keys are renamed through
//! the schema's `map` (a string renames, a list fans the same value out to
//! every listed key, an empty list drops the key, no entry passes the key
//! through). Schema defaults are merged *underneath*, so an explicit answer
//! always wins. Flat schemas fill `main`; split schemas fill `dev` and, when
//! there are production answers or defaults, `prod`.
//!
//! ## Dependency linking
//!
//! A single forward pass over the buckets in selection order. For every
//! dependency pointer `target ← service.key` the source bucket is found by
//! schema or service name. Then:
//!
//! - source `main` has the key: copy it into `dev` (overwriting) and into
//!   `prod` when `prod[target]` is unset
//! - otherwise: copy source `dev[key]` into `dev` (overwriting) and source
//!   `prod[key]` into `prod` when unset
//!
//! "Unset" means missing or empty. Linking never creates buckets, and chains
//! of pointers are not followed transitively. A pointer to a service that was
//! not selected is skipped with a warning, or is an error in strict mode.

use std::collections::BTreeMap;

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::prompt::RawAnswer;
use crate::schema::{env_value, Answers, DependencyPointer, ServiceSchema, Target, TargetKind};

/// Flat environment of one service and one target.
pub type EnvMap = BTreeMap<String, String>;

/// Resolved environments of one selected service.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket<'a> {
    pub service: String,
    pub schema: Option<&'a ServiceSchema>,
    pub main: Option<EnvMap>,
    pub dev: Option<EnvMap>,
    pub prod: Option<EnvMap>,
}

impl<'a> Bucket<'a> {
    /// Output path prefix of the schema, if any.
    pub fn path(&self) -> Option<&str> {
        self.schema.and_then(|s| s.path.as_deref())
    }

    /// Whether this bucket answers to `name` in a dependency pointer.
    pub fn is_named(&self, name: &str) -> bool {
        self.service == name || self.schema.is_some_and(|s| s.name == name)
    }

    fn dependencies(&self) -> &'a [DependencyPointer] {
        self.schema.map(|s| s.dependencies.as_slice()).unwrap_or(&[])
    }
}

/// Normalize every answer, then link dependencies.
pub fn resolve<'a>(answers: Vec<RawAnswer<'a>>, strict: bool) -> Result<Vec<Bucket<'a>>> {
    let mut buckets: Vec<Bucket<'a>> = answers.into_iter().map(normalize).collect();
    link(&mut buckets, strict)?;
    Ok(buckets)
}

/// Rename answer keys and lay the schema defaults underneath.
pub fn normalize(answer: RawAnswer<'_>) -> Bucket<'_> {
    let RawAnswer {
        service,
        schema,
        batches,
    } = answer;

    let Some(schema) = schema else {
        return Bucket {
            service,
            schema: None,
            main: None,
            dev: None,
            prod: None,
        };
    };

    let build = |target: Target| -> EnvMap {
        let mut env = batches
            .get(&target)
            .map(|answers| rename(schema, answers))
            .unwrap_or_default();
        for (key, value) in schema.defaults.for_target(target) {
            if let Some(value) = env_value(value) {
                env.entry(key.clone()).or_insert(value);
            }
        }
        env
    };

    match schema.target_kind() {
        TargetKind::Main => Bucket {
            service,
            schema: Some(schema),
            main: Some(build(Target::Main)),
            dev: None,
            prod: None,
        },
        TargetKind::Service => {
            let has_prod =
                batches.contains_key(&Target::Prod) || !schema.defaults.prod.is_empty();
            Bucket {
                service,
                schema: Some(schema),
                main: None,
                dev: Some(build(Target::Dev)),
                prod: has_prod.then(|| build(Target::Prod)),
            }
        }
    }
}

fn rename(schema: &ServiceSchema, answers: &Answers) -> EnvMap {
    let mut env = EnvMap::new();
    for (key, value) in answers {
        let Some(value) = env_value(value) else {
            continue;
        };
        match schema.map.get(key) {
            None => {
                env.insert(key.clone(), value);
            }
            Some(target) => {
                for renamed in target.keys() {
                    env.insert(renamed.to_string(), value.clone());
                }
            }
        }
    }
    env
}

/// Copy values along dependency pointers in one forward pass.
pub fn link(buckets: &mut [Bucket<'_>], strict: bool) -> Result<()> {
    for index in 0..buckets.len() {
        for pointer in buckets[index].dependencies() {
            let Some(source) = buckets.iter().position(|b| b.is_named(&pointer.service)) else {
                if strict {
                    return Err(Error::UnresolvedDependency {
                        service: buckets[index].service.clone(),
                        target_key: pointer.target.clone(),
                        source_service: pointer.service.clone(),
                        source_key: pointer.key.clone(),
                    });
                }
                warn!(
                    "{}: {} depends on {}.{}, but {} is not configured; keeping the default",
                    buckets[index].service,
                    pointer.target,
                    pointer.service,
                    pointer.key,
                    pointer.service
                );
                continue;
            };

            let lookup = |env: &Option<EnvMap>| env.as_ref().and_then(|e| e.get(&pointer.key)).cloned();
            let from_main = lookup(&buckets[source].main);
            let (dev_value, prod_value) = match from_main {
                Some(value) => (Some(value.clone()), Some(value)),
                None => (lookup(&buckets[source].dev), lookup(&buckets[source].prod)),
            };

            if dev_value.is_none() && prod_value.is_none() {
                debug!(
                    "{}: {}.{} has no value for {}",
                    buckets[index].service, pointer.service, pointer.key, pointer.target
                );
                continue;
            }

            let current = &mut buckets[index];
            if let (Some(dev), Some(value)) = (current.dev.as_mut(), dev_value) {
                dev.insert(pointer.target.clone(), value);
            }
            if let (Some(prod), Some(value)) = (current.prod.as_mut(), prod_value) {
                if is_unset(prod, &pointer.target) {
                    prod.insert(pointer.target.clone(), value);
                }
            }
        }
    }
    Ok(())
}

fn is_unset(env: &EnvMap, key: &str) -> bool {
    env.get(key).is_none_or(|v| v.is_empty())
}
