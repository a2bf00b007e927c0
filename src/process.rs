//! # Process Runner
//!
//! Every external program (`git`, `docker`, `docker-compose`) is started
//! through this module. A [`ProcessCommand`] describes the program, its
//! arguments, an optional working directory and a [`RunMode`]:
//!
//! - [`RunMode::Inherit`] blocks until the child exits while it shares the
//!   terminal, so interactive output (and `docker exec -it`) works.
//! - [`RunMode::Capture`] buffers stdout and stderr until the child exits and
//!   returns them to the caller.
//!
//! A non-zero exit status is always turned into [`Error::ProcessFailed`]
//! carrying whatever output was captured. There are no retries and no timeouts.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use log::debug;

use crate::error::{Error, Result};

/// How the child process is wired to the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Share stdin/stdout/stderr with the child.
    Inherit,
    /// Collect stdout and stderr and hand them back after exit.
    Capture,
}

/// A single external command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCommand {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub mode: RunMode,
}

impl ProcessCommand {
    /// A new command in [`RunMode::Inherit`] mode with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            mode: RunMode::Inherit,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn capture(mut self) -> Self {
        self.mode = RunMode::Capture;
        self
    }

    /// The command line as the operator would type it.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for ProcessCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Output of a successful process run.
///
/// Both fields are empty for [`RunMode::Inherit`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Something that can execute a [`ProcessCommand`].
pub trait Runner {
    fn run(&self, command: &ProcessCommand) -> Result<ProcessOutput>;
}

/// Runs commands on the host with `std::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn run(&self, command: &ProcessCommand) -> Result<ProcessOutput> {
        debug!(
            "Running `{}` ({:?}) in {}",
            command,
            command.mode,
            command
                .cwd
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| ".".to_string())
        );

        let mut process = Command::new(&command.program);
        process.args(&command.args);
        if let Some(dir) = &command.cwd {
            process.current_dir(dir);
        }

        let spawn_error = |e: std::io::Error| Error::ProcessSpawn {
            command: command.command_line(),
            message: e.to_string(),
        };

        match command.mode {
            RunMode::Inherit => {
                let status = process
                    .stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit())
                    .status()
                    .map_err(spawn_error)?;

                if !status.success() {
                    return Err(Error::ProcessFailed {
                        command: command.command_line(),
                        code: status.code(),
                        output: String::new(),
                    });
                }
                Ok(ProcessOutput::default())
            }
            RunMode::Capture => {
                let spinner = spinner(command);
                let output = process.stdin(Stdio::null()).output();
                spinner.finish_and_clear();
                let output = output.map_err(spawn_error)?;

                let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
                let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
                debug!("`{}` exited with {}", command, output.status);

                if !output.status.success() {
                    return Err(Error::ProcessFailed {
                        command: command.command_line(),
                        code: output.status.code(),
                        output: format!("{}{}", stdout, stderr),
                    });
                }
                Ok(ProcessOutput { stdout, stderr })
            }
        }
    }
}

fn spinner(command: &ProcessCommand) -> ProgressBar {
    let spinner = ProgressBar::new_spinner().with_message(command.command_line());
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Runs each command in order, stopping at the first failure.
pub fn run_all(runner: &dyn Runner, commands: &[ProcessCommand]) -> Result<Vec<ProcessOutput>> {
    commands.iter().map(|command| runner.run(command)).collect()
}


#[cfg(test)]
mod tests {
    use super::fake::RecordingRunner;
    use super::*;

    #[test]
    fn test_command_line_joins_program_and_args() {
        let command = ProcessCommand::new("docker-compose")
            .args(["-f", "yml/docker-compose.yml"])
            .arg("down");
        assert_eq!(
            command.command_line(),
            "docker-compose -f yml/docker-compose.yml down"
        );
        assert_eq!(command.mode, RunMode::Inherit);
    }

    #[test]
    fn test_builder_sets_cwd_and_mode() {
        let command = ProcessCommand::new("docker")
            .arg("network")
            .current_dir("/tmp")
            .capture();
        assert_eq!(command.cwd, Some(PathBuf::from("/tmp")));
        assert_eq!(command.mode, RunMode::Capture);
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_captures_stdout() {
        let command = ProcessCommand::new("sh")
            .args(["-c", "echo hello; echo oops >&2"])
            .capture();
        let output = SystemRunner.run(&command).unwrap();
        assert_eq!(output.stdout, "hello\n");
        assert_eq!(output.stderr, "oops\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_reports_exit_code_and_output() {
        let command = ProcessCommand::new("sh")
            .args(["-c", "echo broken >&2; exit 4"])
            .capture();
        match SystemRunner.run(&command) {
            Err(Error::ProcessFailed { code, output, .. }) => {
                assert_eq!(code, Some(4));
                assert!(output.contains("broken"));
            }
            other => panic!("expected ProcessFailed, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_inherit_mode_reports_failure() {
        let command = ProcessCommand::new("false");
        let result = SystemRunner.run(&command);
        assert!(matches!(
            result,
            Err(Error::ProcessFailed { code: Some(1), .. })
        ));
    }

    #[test]
    fn test_system_runner_missing_program() {
        let command = ProcessCommand::new("definitely-not-a-real-binary-4242").capture();
        let result = SystemRunner.run(&command);
        assert!(matches!(result, Err(Error::ProcessSpawn { .. })));
    }

    #[test]
    fn test_run_all_stops_at_first_failure() {
        let runner = RecordingRunner::new().failing_on("docker volume");
        let commands = vec![
            ProcessCommand::new("docker").args(["network", "prune", "-f"]),
            ProcessCommand::new("docker").args(["volume", "prune", "-f"]),
            ProcessCommand::new("docker-compose").arg("down"),
        ];
        let result = run_all(&runner, &commands);
        assert!(result.is_err());
        assert_eq!(
            runner.command_lines(),
            vec!["docker network prune -f", "docker volume prune -f"]
        );
    }
}
