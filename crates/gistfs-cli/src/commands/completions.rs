//! Shell completion generation command.
//!
//! Generates shell completion scripts for bash, zsh, fish, elvish and
//! `PowerShell`.

use crate::cli::ExitCode;
use anyhow::Result;
use clap::Command;
use clap_complete::{Shell, generate};
use std::io::{self, Write};
use tracing::info;

/// Writes the completion script for `shell` into `out`.
pub fn generate_completions<W: Write>(shell: Shell, cmd: &mut Command, out: &mut W) {
    info!("Generating {shell} completions");
    let name = cmd.get_name().to_string();
    generate(shell, cmd, name, out);
}

/// Runs the completions command, printing the script to stdout.
///
/// Returns `Ok(ExitCode::SUCCESS)` once the script is written.
pub fn run(shell: Shell, cmd: &mut Command) -> Result<ExitCode> {
    generate_completions(shell, cmd, &mut io::stdout());
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Arg;

    fn command() -> Command {
        Command::new("gistfs")
            .subcommand(Command::new("ls").arg(Arg::new("gist_id")))
            .subcommand(Command::new("cat"))
    }

    #[test]
    fn test_generate_bash() {
        let mut out = Vec::new();
        generate_completions(Shell::Bash, &mut command(), &mut out);

        let script = String::from_utf8(out).unwrap();
        assert!(script.contains("gistfs"));
        assert!(script.contains("ls"));
    }

    #[test]
    fn test_generate_every_shell() {
        for shell in [
            Shell::Bash,
            Shell::Zsh,
            Shell::Fish,
            Shell::Elvish,
            Shell::PowerShell,
        ] {
            let mut out = Vec::new();
            generate_completions(shell, &mut command(), &mut out);
            assert!(!out.is_empty(), "{shell} produced no output");
        }
    }
}
