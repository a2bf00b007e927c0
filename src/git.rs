//! Cloning the template infrastructure repository.
//!
//! This uses the system `git` command, which automatically handles:
//! - SSH keys from ~/.ssh/
//! - Git credential helpers
//! - Personal access tokens
//! - Any authentication configured in ~/.gitconfig

use std::fs;
use std::path::Path;

use log::debug;

use crate::error::{Error, Result};
use crate::process::{ProcessCommand, Runner};

/// Top-level files of the template that make no sense in a new project.
const CLUTTER_EXTENSIONS: &[&str] = &["png", "md"];
const CLUTTER_FILES: &[&str] = &[".gitignore"];

/// Clone `url` into `target_dir`.
pub fn clone(runner: &dyn Runner, url: &str, target_dir: &Path) -> Result<()> {
    let command = ProcessCommand::new("git")
        .args(["clone", url])
        .arg(target_dir.to_string_lossy())
        .capture();

    runner.run(&command).map_err(|e| match e {
        Error::ProcessFailed { output, .. } => {
            // Provide helpful error message for common auth failures
            let message = if output.contains("Authentication failed")
                || output.contains("Permission denied")
                || output.contains("Could not read from remote repository")
            {
                format!(
                    "Authentication failed. Make sure you have access to the repository.\n\
                    For private repos, ensure you have:\n\
                    - SSH key added to ssh-agent\n\
                    - Git credentials configured\n\
                    - Personal access token set up\n\
                    Error: {}",
                    output
                )
            } else {
                output
            };
            Error::GitClone {
                url: url.to_string(),
                message,
            }
        }
        Error::ProcessSpawn { message, .. } => Error::GitClone {
            url: url.to_string(),
            message,
        },
        other => other,
    })?;

    Ok(())
}

/// Remove the `.git` directory so the clone starts without history.
pub fn strip_history(dir: &Path) -> Result<()> {
    let git_dir = dir.join(".git");
    if git_dir.exists() {
        debug!("Removing {}", git_dir.display());
        fs::remove_dir_all(git_dir)?;
    }
    Ok(())
}

/// Delete images, markdown files and `.gitignore` from the top level of `dir`.
///
/// Returns the names of the removed files.
pub fn remove_clutter(dir: &Path) -> Result<Vec<String>> {
    let mut removed = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type()?.is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        let by_extension = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| CLUTTER_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));

        if by_extension || CLUTTER_FILES.contains(&name.as_str()) {
            fs::remove_file(&path)?;
            removed.push(name);
        }
    }
    removed.sort();
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::fake::RecordingRunner;
    use tempfile::TempDir;

    #[test]
    fn test_clone_invokes_git() {
        let runner = RecordingRunner::new();
        clone(&runner, "https://example.com/infra.git", Path::new("shop")).unwrap();
        assert_eq!(
            runner.command_lines(),
            vec!["git clone https://example.com/infra.git shop"]
        );
    }

    #[test]
    fn test_clone_failure_becomes_git_error() {
        let runner = RecordingRunner::new().failing_on("git clone");
        let err = clone(&runner, "https://example.com/infra.git", Path::new("shop")).unwrap_err();
        match err {
            Error::GitClone { url, message } => {
                assert_eq!(url, "https://example.com/infra.git");
                assert!(message.contains("simulated failure"));
            }
            other => panic!("expected GitClone, got {:?}", other),
        }
    }

    #[test]
    fn test_strip_history() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".git/objects")).unwrap();
        fs::write(temp.path().join(".git/HEAD"), "ref: refs/heads/master").unwrap();

        strip_history(temp.path()).unwrap();
        assert!(!temp.path().join(".git").exists());

        // Missing history is fine
        strip_history(temp.path()).unwrap();
    }

    #[test]
    fn test_remove_clutter_only_touches_top_level_files() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("README.md"), "# infra").unwrap();
        fs::write(root.join("logo.PNG"), [0u8; 4]).unwrap();
        fs::write(root.join(".gitignore"), "dist/").unwrap();
        fs::write(root.join(".env.sample"), "PROJECT_NAME=test").unwrap();
        fs::create_dir_all(root.join("images/php")).unwrap();
        fs::write(root.join("images/php/NOTES.md"), "keep").unwrap();

        let removed = remove_clutter(root).unwrap();
        assert_eq!(removed, vec![".gitignore", "README.md", "logo.PNG"]);
        assert!(root.join(".env.sample").exists());
        assert!(root.join("images/php/NOTES.md").exists());
    }
}
