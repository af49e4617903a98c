//! gistfs CLI.
//!
//! Browses a GitHub Gist as a read-only filesystem: list its files, print
//! them, inspect metadata, or export everything into a local directory.
//!
//! # Examples
//!
//! ```bash
//! # List the files of a gist
//! gistfs ls ded2f6727d98e6b0095e62a7813aa7cf
//!
//! # Print two files
//! gistfs cat ded2f6727d98e6b0095e62a7813aa7cf test1.txt test2.txt
//!
//! # Copy every file into ./out without touching existing ones
//! gistfs export ded2f6727d98e6b0095e62a7813aa7cf ./out --no-overwrite
//! ```

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use gistfs_cli::ConfigAction;
use gistfs_cli::cli::{ExitCode, OutputFormat};
use gistfs_cli::commands::{self, common::GistOptions};
use gistfs_cli::config::Config;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Read-only access to GitHub Gists as a filesystem.
#[derive(Parser, Debug)]
#[command(name = "gistfs")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (defaults to the config file setting, then pretty)
    #[arg(long = "format", global = true, value_enum)]
    format: Option<OutputFormat>,

    /// GitHub token for private gists and higher rate limits
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// GitHub REST API base URL
    #[arg(long, global = true, env = "GISTFS_API_URL")]
    api_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..=600))]
    timeout: Option<u64>,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the files of a gist.
    Ls {
        /// Gist id
        gist_id: String,
    },

    /// Print the content of one or more files.
    Cat {
        /// Gist id
        gist_id: String,

        /// File names, printed in the given order
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Show metadata of a file, or of the root directory.
    Stat {
        /// Gist id
        gist_id: String,

        /// File name (default: the root directory)
        name: Option<String>,
    },

    /// Write every file of a gist into an existing local directory.
    ///
    /// Files are written atomically: a temporary file is filled and then
    /// renamed into place.
    Export {
        /// Gist id
        gist_id: String,

        /// Target directory
        dir: PathBuf,

        /// Leave files that already exist untouched
        #[arg(long)]
        no_overwrite: bool,
    },

    /// Manage the configuration file.
    Config {
        /// Configuration action
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell for completion generation
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    let exit_code = match execute_command(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::for_error(&e)
        }
    };

    std::process::exit(exit_code.as_i32());
}

/// Initializes logging to stderr.
///
/// `--verbose` forces debug level; otherwise `RUST_LOG` applies, falling back
/// to info.
fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}

/// Routes the parsed command to its handler.
async fn execute_command(cli: Cli) -> Result<ExitCode> {
    let options = GistOptions {
        token: cli.token,
        api_url: cli.api_url,
        timeout: cli.timeout,
    };

    match cli.command {
        Commands::Ls { gist_id } => {
            let (config, format) = settings(cli.format)?;
            commands::ls::run(&gist_id, &options, &config, format).await
        }
        Commands::Cat { gist_id, names } => {
            let (config, _) = settings(cli.format)?;
            commands::cat::run(&gist_id, &names, &options, &config).await
        }
        Commands::Stat { gist_id, name } => {
            let (config, format) = settings(cli.format)?;
            commands::stat::run(&gist_id, name.as_deref(), &options, &config, format).await
        }
        Commands::Export {
            gist_id,
            dir,
            no_overwrite,
        } => {
            let (config, format) = settings(cli.format)?;
            commands::export::run(&gist_id, &dir, !no_overwrite, &options, &config, format).await
        }
        Commands::Config { action } => {
            commands::config::run(&action, cli.format.unwrap_or_default())
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            commands::completions::run(shell, &mut cmd)
        }
    }
}

/// Loads the config file and resolves the output format, letting the
/// `--format` flag win over the file.
fn settings(format: Option<OutputFormat>) -> Result<(Config, OutputFormat)> {
    let config = Config::load()?;
    let format = match format {
        Some(format) => format,
        None => config.output_format()?,
    };
    Ok((config, format))
}
