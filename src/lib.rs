pub mod cli;
mod commands;
pub mod core;

use std::process::ExitCode;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::core::state::AppState;

pub fn run() -> ExitCode {
    let args = cli::Args::parse();

    // Initialize structured logging
    let default_filter = if args.verbose {
        "info,mod_transfer_lib=debug"
    } else {
        "warn,mod_transfer_lib=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("CrossCore mod transfer starting...");

    // One transfer at a time on the calling thread.
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: could not start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut state = AppState::load(args.settings);
    let code = runtime.block_on(commands::dispatch(&mut state, args.command));

    if let Err(e) = state.save_on_shutdown() {
        warn!("Could not save settings: {}", e);
    }

    code
}
