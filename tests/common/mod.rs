//! Shared test utilities for E2E tests.
//!
//! This module provides a project fixture and helpers to run the `webdev`
//! binary against it without touching docker: `DOCKER_BIN` and `COMPOSE_BIN`
//! point at `echo`, so every external command prints its own arguments.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_project();
//!     fixture.command().arg("build").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::Path;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::files;
    pub use super::TestFixture;
}

/// File contents of a minimal project.
#[allow(dead_code)]
pub mod files {
    pub const DOT_ENV: &str = "PROJECT_NAME=shop\nBRANCH=\n";

    pub const COMPOSE: &str = r#"version: "3"
services:
  php:
    image: php
    depends_on:
      - mysql
      - redis
  mysql:
    image: mysql
  redis:
    image: redis
  nginx:
    image: nginx
    links:
      - php
"#;

    pub const COMPOSE_DEV: &str = r#"version: "3"
services:
  php:
    volumes:
      - ../www:/www
  redis:
    ports:
      - "6379:6379"
"#;

    /// Answers for php + mysql + an unknown service.
    pub const ANSWERS: &str = r#"
services:
  services: [php7, mysql, hhvm]
main:
  PROJECT_NAME: shop
mysql:
  development:
    MYSQL_DATABASE: shop
    GEN_UP: "no"
    MYSQL_USER: shopper
    MYSQL_PASSWORD: secret
  production:
    MYSQL_DATABASE: shop
    GEN_UP: "yes"
php:
  development:
    PUBLIC_URL: http://shop.local
  production:
    PUBLIC_URL: https://shop.example.com
"#;

    pub const MANIFEST: &str = r#"{
  "main": {
    "service": "main",
    "schema": { "path": "yml/" },
    "main": { "PROJECT_NAME": "shop", "PROXY_HTTP": "8080" }
  },
  "services": [
    {
      "service": "redis",
      "schema": { "path": "images/redis/cache" },
      "dev": { "REDIS_PASSWORD": "", "REDIS_MAXMEMORY": "128mb" },
      "prod": { "REDIS_PASSWORD": "a long secret" }
    }
  ]
}
"#;
}

/// A temporary project directory.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add `.env`, the compose files and the `network/` directory.
    pub fn with_project(self) -> Self {
        self.with_file(".env", files::DOT_ENV)
            .with_file("yml/docker-compose.yml", files::COMPOSE)
            .with_file("yml/docker-compose.dev.yml", files::COMPOSE_DEV)
            .with_file("network/docker-compose.yml", "services: {}\n")
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Read a file of the project.
    #[allow(dead_code)]
    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.path().join(path)).expect("Failed to read file")
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixture {
    /// Create a command running in this fixture with `echo` standing in for
    /// docker and a clean environment for the settings `webdev` reads.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("webdev");
        cmd.current_dir(self.path())
            .env("DOCKER_BIN", "echo")
            .env("COMPOSE_BIN", "echo")
            .env("NO_COLOR", "1")
            .env("XDG_CONFIG_HOME", self.path().join(".config"))
            .env_remove("PROJECT_NAME")
            .env_remove("BRANCH")
            .env_remove("REGISTRY")
            .env_remove("WEBDEV_SCHEMAS")
            .env_remove("WEBDEV_TEMPLATE_REPO")
            .env_remove("RUST_LOG");
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_with_project() {
        let fixture = TestFixture::new().with_project();
        assert!(fixture.path().join("yml/docker-compose.yml").exists());
        assert!(fixture.path().join("network").is_dir());
    }

    #[test]
    fn test_fixture_documents_are_valid() {
        for yaml in [files::COMPOSE, files::COMPOSE_DEV, files::ANSWERS] {
            serde_yaml::from_str::<serde_yaml::Value>(yaml).expect("fixture should be valid YAML");
        }
        serde_json::from_str::<serde_json::Value>(files::MANIFEST)
            .expect("fixture should be valid JSON");
    }
}
