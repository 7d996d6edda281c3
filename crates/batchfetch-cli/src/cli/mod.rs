//! CLI for batchfetch.

mod commands;

use anyhow::Result;
use batchfetch_core::config::{self, FetchConfig};
use batchfetch_core::logging;
use batchfetch_core::pool::MAX_POOL_SIZE;
use batchfetch_core::RunError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use commands::{run_fetch, run_show_config};

/// Top-level CLI for batchfetch.
#[derive(Debug, Parser)]
#[command(name = "batchfetch")]
#[command(about = "Fetch a list of URLs in parallel and save each body to disk", long_about = None)]
pub struct Cli {
    /// Use this config file instead of ~/.config/batchfetch/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download every URL in the input list.
    Run(RunArgs),

    /// Show the config file path and the effective settings.
    Config,
}

/// Flags for `batchfetch run`. Anything left unset comes from the config file.
#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// Path to the newline-delimited URL list.
    #[arg(long, short = 'i', value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Directory receiving `{index}.html` files.
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Number of parallel workers (at most 1024).
    #[arg(long, short = 'w', visible_alias = "threads", value_name = "N",
          value_parser = clap::value_parser!(u64).range(1..=MAX_POOL_SIZE as u64))]
    pub workers: Option<u64>,

    /// Per-request timeout in seconds.
    #[arg(long, short = 't', value_name = "SECS",
          value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Create the output directory if it does not exist.
    #[arg(long)]
    pub create_output_dir: bool,

    /// Write a JSON report of every task to this file.
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Append logs here instead of ~/.local/state/batchfetch/batchfetch.log.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl RunArgs {
    /// Overlay the flags that were given onto `cfg`.
    pub fn apply(&self, mut cfg: FetchConfig) -> FetchConfig {
        if let Some(input) = &self.input {
            cfg.input = input.clone();
        }
        if let Some(output) = &self.output {
            cfg.output_dir = output.clone();
        }
        if let Some(workers) = self.workers {
            cfg.workers = usize::try_from(workers).unwrap_or(MAX_POOL_SIZE);
        }
        if let Some(timeout) = self.timeout {
            cfg.timeout_secs = timeout;
        }
        if let Some(log_file) = &self.log_file {
            cfg.log_file = Some(log_file.clone());
        }
        cfg
    }
}

/// How a command finished; mapped to the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Everything succeeded (or there was nothing to do).
    Clean,
    /// The run completed but some tasks failed.
    PartialFailure,
}

impl RunStatus {
    pub fn exit_code(self) -> ExitCode {
        match self {
            RunStatus::Clean => ExitCode::SUCCESS,
            RunStatus::PartialFailure => ExitCode::from(2),
        }
    }
}

impl Cli {
    pub async fn run_from_args() -> Result<RunStatus> {
        let cli = Cli::parse();
        let (cfg, created) = match &cli.config {
            Some(path) => (config::load_from_path(path)?, None),
            None => {
                let (cfg, created) = config::load_or_init()?;
                let created = if created { Some(config::config_path()?) } else { None };
                (cfg, created)
            }
        };
        let cfg = cli.effective_config(cfg);

        match logging::init_logging(cfg.log_file.as_deref()) {
            Ok(path) => tracing::debug!("logging to {}", path.display()),
            Err(e) => {
                logging::init_logging_stderr();
                tracing::warn!("could not open log file, logging to stderr: {:#}", e);
            }
        }
        if let Some(path) = created {
            tracing::info!("created default config at {}", path.display());
        }

        match cli.command {
            CliCommand::Run(args) => run_fetch(cfg, &args).await,
            CliCommand::Config => {
                run_show_config(cli.config.as_deref(), &cfg)?;
                Ok(RunStatus::Clean)
            }
        }
    }

    /// Config file values with this command's flags laid over them.
    pub fn effective_config(&self, cfg: FetchConfig) -> FetchConfig {
        match &self.command {
            CliCommand::Run(args) => args.apply(cfg),
            CliCommand::Config => cfg,
        }
    }
}

/// Whether `err` already reached the log before propagating to `main`.
/// An unreadable input list is logged by the dispatcher's event sink.
pub fn already_logged(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<RunError>(),
        Some(RunError::InputUnavailable { .. })
    )
}

#[cfg(test)]
mod tests;
