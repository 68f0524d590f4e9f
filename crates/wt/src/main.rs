//! `wt` — command-line client for the Whooktown smart-city platform.
//!
//! Every command is a thin request/response cycle: parse arguments, call
//! the platform, format the result, and map failures to exit code 1.

mod cli;
mod client;
mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use whooktown_config::ConfigStore;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help, version, and the bare-invocation help screen are not
            // failures; every real parse error exits 1.
            use clap::error::ErrorKind;
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp
                | ErrorKind::DisplayVersion
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    let _guard = init_tracing(&cli);

    let mut store = match ConfigStore::open() {
        Ok(store) => store,
        Err(err) => return report(CliError::from(err)),
    };

    match commands::dispatch(cli.command, &mut store).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(err),
    }
}

fn report(err: CliError) -> ExitCode {
    use miette::Diagnostic;
    output::error(&err.to_string());
    if let Some(hint) = err.help() {
        output::error_detail(&hint.to_string());
    }
    ExitCode::FAILURE
}

/// Set up tracing keyed by `-v` count. The dashboard logs to a file so
/// log lines never corrupt the terminal UI; the returned guard must be
/// held until exit to flush it.
fn init_tracing(cli: &Cli) -> Option<WorkerGuard> {
    let level = match cli.global.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if matches!(cli.command, Command::Tui(_)) {
        let appender = tracing_appender::rolling::never(std::env::temp_dir(), "wt-tui.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .with_target(false)
            .init();
        Some(guard)
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
        None
    }
}
