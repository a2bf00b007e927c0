//! # Webdev CLI
//!
//! This is the binary entry point for the `webdev` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Executing the appropriate command based on the parsed arguments.
//! - Turning errors into a message on stderr and a process exit code. When a
//!   child process failed, its exit code is passed through.
//!
//! The core application logic is defined in the `lib.rs` library crate, ensuring
//! that the binary is a thin wrapper around the reusable library functionality.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            let code = err
                .downcast_ref::<webdev_env::error::Error>()
                .map(webdev_env::error::Error::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}
