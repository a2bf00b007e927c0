//! # Error Handling
//!
//! This module defines the centralized error type for the `webdev-env`
//! library. It uses `thiserror` to derive one `Error` enum that covers every
//! failure mode the tool reports to the operator.
//!
//! The variants fall into three groups:
//!
//! - **Preconditions**: the target directory already exists, the manifest is
//!   missing, a tarball to load is not there. Nothing is started.
//! - **Subprocess failures**: `git`, `docker` or `docker-compose` could not be
//!   spawned or exited with a non-zero status. The captured output is kept so
//!   it can be shown verbatim.
//! - **Configuration failures**: schema documents that do not parse, answers
//!   that do not validate in non-interactive mode, dependency pointers that do
//!   not resolve in strict mode.
//!
//! Validation failures during interactive prompting never become errors; the
//! operator is asked again in place.

use thiserror::Error;

/// Main error type for webdev-env operations
#[derive(Error, Debug)]
pub enum Error {
    /// A condition that must hold before a command starts does not.
    ///
    /// Carries an optional hint telling the operator how to fix it.
    #[error("{message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Precondition {
        message: String,
        /// Optional hint for how to resolve the issue
        hint: Option<String>,
    },

    /// An external program could not be started at all.
    #[error("Failed to start `{command}`: {message}")]
    ProcessSpawn { command: String, message: String },

    /// An external program ran and exited unsuccessfully.
    ///
    /// `code` is `None` when the process was terminated by a signal.
    #[error("Command `{command}` failed{}{}",
        code.map(|c| format!(" with exit code {}", c)).unwrap_or_default(),
        if output.trim().is_empty() { String::new() } else { format!(":\n{}", output.trim_end()) })]
    ProcessFailed {
        command: String,
        code: Option<i32>,
        /// Captured stdout and stderr; empty when output went to the terminal
        output: String,
    },

    /// A `git` operation failed.
    #[error("Git clone error for {url}: {message}")]
    GitClone { url: String, message: String },

    /// A schema document could not be understood.
    #[error("Schema error in '{schema}': {message}")]
    Schema { schema: String, message: String },

    /// An answer supplied non-interactively was missing or invalid.
    #[error("Invalid answer for {service}.{question}: {message}")]
    InvalidAnswer {
        service: String,
        question: String,
        message: String,
    },

    /// A dependency pointer names a service that was not selected.
    #[error("Service '{service}' depends on '{source_service}.{source_key}' for {target_key}, but '{source_service}' is not configured")]
    UnresolvedDependency {
        service: String,
        target_key: String,
        source_service: String,
        source_key: String,
    },

    /// The persisted configuration manifest does not exist.
    #[error("Configuration manifest not found: {path}\n  hint: run `webdev setup` first")]
    ManifestNotFound { path: String },

    /// The command exists but does nothing yet.
    #[error("Feature not implemented: {feature}")]
    NotImplemented { feature: String },

    /// An interactive prompt failed, e.g. the terminal went away.
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML error, wrapped from `serde_yaml::Error`.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A regular expression in a schema did not compile.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A `.env` file could not be parsed.
    #[error("Env file error: {0}")]
    Dotenv(#[from] dotenvy::Error),
}

impl Error {
    /// The exit code the binary should terminate with for this error.
    ///
    /// A failing subprocess propagates its own exit code; everything else is 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::ProcessFailed {
                code: Some(code), ..
            } => u8::try_from(*code).ok().filter(|c| *c > 0).unwrap_or(1),
            _ => 1,
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
