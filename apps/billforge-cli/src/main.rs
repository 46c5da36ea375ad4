//! Billforge binary entry point.

use std::process::ExitCode;

use billforge_cli::cli::Cli;
use clap::Parser;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    billforge_cli::init_tracing();

    match billforge_cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("error: {e:#}");
            ExitCode::from(billforge_cli::exit_code(&e))
        }
    }
}
