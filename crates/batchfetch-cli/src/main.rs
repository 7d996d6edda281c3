use std::process::ExitCode;

mod cli;

use crate::cli::{already_logged, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    // Logging is initialized once the config (and its log_file) is known.
    match Cli::run_from_args().await {
        Ok(status) => status.exit_code(),
        Err(err) => {
            if !already_logged(&err) {
                tracing::error!("{:#}", err);
            }
            eprintln!("batchfetch error: {:#}", err);
            ExitCode::from(1)
        }
    }
}
