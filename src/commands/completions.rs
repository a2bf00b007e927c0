//! # Completions Command Implementation
//!
//! Prints a completion script for `webdev` covering every subcommand, alias
//! and option.
//!
//! ```bash
//! webdev completions bash > ~/.local/share/bash-completion/completions/webdev
//! webdev completions zsh > ~/.zfunc/_webdev
//! ```

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::io;

use crate::cli::Cli;

/// Generate shell completion scripts
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum, value_name = "SHELL")]
    pub shell: Shell,
}

pub fn execute(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    let bin = cmd.get_name().to_string();
    generate(args.shell, &mut cmd, bin, &mut io::stdout());
    Ok(())
}
