//! CLI parse and config-overlay tests.

use super::{already_logged, Cli, CliCommand, RunArgs, RunStatus};
use batchfetch_core::config::FetchConfig;
use batchfetch_core::pool::MAX_POOL_SIZE;
use batchfetch_core::RunError;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

fn run_args(args: &[&str]) -> RunArgs {
    match parse(args).command {
        CliCommand::Run(a) => a,
        _ => panic!("expected Run"),
    }
}

#[test]
fn cli_parse_run_defaults() {
    let a = run_args(&["batchfetch", "run"]);
    assert!(a.input.is_none());
    assert!(a.output.is_none());
    assert!(a.workers.is_none());
    assert!(a.timeout.is_none());
    assert!(!a.create_output_dir);
    assert!(a.report.is_none());
}

#[test]
fn cli_parse_run_all_flags() {
    let a = run_args(&[
        "batchfetch",
        "run",
        "--input",
        "list.txt",
        "--output",
        "pages",
        "--workers",
        "8",
        "--timeout",
        "15",
        "--create-output-dir",
        "--report",
        "report.json",
    ]);
    assert_eq!(a.input.as_deref(), Some(Path::new("list.txt")));
    assert_eq!(a.output.as_deref(), Some(Path::new("pages")));
    assert_eq!(a.workers, Some(8));
    assert_eq!(a.timeout, Some(15));
    assert!(a.create_output_dir);
    assert_eq!(a.report.as_deref(), Some(Path::new("report.json")));
}

#[test]
fn cli_parse_threads_alias() {
    let a = run_args(&["batchfetch", "run", "--threads", "3"]);
    assert_eq!(a.workers, Some(3));
}

#[test]
fn cli_rejects_zero_workers_and_timeout() {
    assert!(Cli::try_parse_from(["batchfetch", "run", "--workers", "0"]).is_err());
    assert!(Cli::try_parse_from(["batchfetch", "run", "--timeout", "0"]).is_err());
}

#[test]
fn cli_rejects_worker_count_above_cap() {
    assert!(Cli::try_parse_from(["batchfetch", "run", "--workers", "1025"]).is_err());
    assert!(
        Cli::try_parse_from(["batchfetch", "run", "--workers", "18446744073709551615"]).is_err()
    );
    let a = run_args(&["batchfetch", "run", "--workers", "1024"]);
    assert_eq!(a.workers, Some(MAX_POOL_SIZE as u64));
}

#[test]
fn effective_config_carries_run_log_file() {
    let cli = parse(&["batchfetch", "run", "--log-file", "/tmp/run.log", "-w", "2"]);
    let cfg = cli.effective_config(FetchConfig::default());
    assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/run.log")));
    assert_eq!(cfg.workers, 2);

    let cli = parse(&["batchfetch", "config"]);
    assert_eq!(cli.effective_config(FetchConfig::default()), FetchConfig::default());
}

#[test]
fn unreadable_input_is_not_logged_twice() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err = anyhow::Error::from(RunError::InputUnavailable {
        path: PathBuf::from("urls.txt"),
        source: io,
    });
    assert!(already_logged(&err));
    assert!(!already_logged(&anyhow::anyhow!("invalid config")));
}

#[test]
fn cli_parse_global_config() {
    let cli = parse(&["batchfetch", "config", "--config", "/etc/batchfetch.toml"]);
    assert!(matches!(cli.command, CliCommand::Config));
    assert_eq!(cli.config, Some(PathBuf::from("/etc/batchfetch.toml")));
}

#[test]
fn cli_requires_subcommand() {
    assert!(Cli::try_parse_from(["batchfetch"]).is_err());
}

#[test]
fn flags_override_config() {
    let cfg = FetchConfig {
        workers: 4,
        timeout_secs: 60,
        ..FetchConfig::default()
    };
    let a = run_args(&["batchfetch", "run", "-o", "elsewhere", "-t", "5"]);
    let merged = a.apply(cfg);
    assert_eq!(merged.output_dir, PathBuf::from("elsewhere"));
    assert_eq!(merged.timeout_secs, 5);
    assert_eq!(merged.workers, 4);
    assert_eq!(merged.input, PathBuf::from("urls.txt"));
}

#[test]
fn unset_flags_keep_config() {
    let cfg = FetchConfig {
        input: PathBuf::from("/srv/urls.txt"),
        log_file: Some(PathBuf::from("/tmp/bf.log")),
        ..FetchConfig::default()
    };
    let merged = RunArgs::default().apply(cfg.clone());
    assert_eq!(merged, cfg);
}

#[test]
fn exit_codes_distinguish_partial_failure() {
    assert_eq!(RunStatus::Clean.exit_code(), ExitCode::SUCCESS);
    assert_eq!(RunStatus::PartialFailure.exit_code(), ExitCode::from(2));
}
