//! # Docker Web Development Environment
//!
//! This library scaffolds and drives a docker-compose based local web
//! development environment. It is used by the `webdev` command-line tool.
//!
//! ## Quick Example
//!
//! ```
//! use webdev_env::envfile;
//! use webdev_env::prompt::{collect, AnswerFilePrompter};
//! use webdev_env::resolve;
//! use webdev_env::schema::Registry;
//!
//! let registry = Registry::builtin().unwrap();
//! let mut answers = AnswerFilePrompter::from_value(serde_json::json!({
//!     "mysql": {
//!         "development": { "MYSQL_DATABASE": "shop", "GEN_UP": "yes" },
//!         "production": { "MYSQL_DATABASE": "shop", "GEN_UP": "yes" }
//!     },
//!     "php": {
//!         "development": { "PUBLIC_URL": "http://shop.local" },
//!         "production": { "PUBLIC_URL": "https://shop.example.com" }
//!     }
//! }));
//!
//! let selected = vec!["mysql".to_string(), "php".to_string()];
//! let raw = collect(&registry, &selected, &mut answers).unwrap();
//! let buckets = resolve::resolve(raw, false).unwrap();
//!
//! let php_dev = buckets[1].dev.as_ref().unwrap();
//! assert_eq!(php_dev["DB_NAME"], "shop");
//! assert!(envfile::render(php_dev).contains("DB_NAME=shop\n"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Schemas (`schema`)**: static YAML descriptions of each service kind:
//!   questions, key renames, defaults and cross-service dependencies.
//! - **Collector (`prompt`)**: asks each selected service's questions, from a
//!   terminal or an answers file.
//! - **Resolver (`resolve`)**: renames answers, applies defaults and copies
//!   values along dependency pointers.
//! - **Outputs (`manifest`, `envfile`, `compose`)**: the `config.json`
//!   manifest, per-service `.env` files and pruned compose files.
//! - **Lifecycle (`lifecycle`, `docker`, `git`, `process`)**: recipes that
//!   shell out to `git`, `docker` and `docker-compose`.
//!
//! ## Setup Flow
//!
//! `setup::run` chains the stages:
//!
//! 1.  **Select**: ask which services the project uses.
//! 2.  **Collect**: ask the global and per-service questions in order.
//! 3.  **Normalize**: turn answers into `main` / `dev` / `prod` buckets.
//! 4.  **Link**: copy dependency values between buckets in one pass.
//! 5.  **Persist**: write `config.json` and the env files.
//! 6.  **Prune**: keep only the selected services in the compose files.

pub mod compose;
pub mod docker;
pub mod envfile;
pub mod error;
pub mod git;
pub mod lifecycle;
pub mod manifest;
pub mod output;
pub mod process;
pub mod prompt;
pub mod resolve;
pub mod schema;
pub mod settings;
pub mod setup;

#[cfg(test)]
mod resolve_proptest;
