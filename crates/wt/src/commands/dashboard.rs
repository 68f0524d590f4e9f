//! `wt tui` -- launch the interactive dashboard.

use std::time::Duration;

use whooktown_config::ConfigStore;

use crate::cli::TuiArgs;
use crate::client::create_client;
use crate::error::CliError;

/// Smallest accepted auto-refresh interval.
const MIN_REFRESH_MS: u64 = 1000;

pub async fn handle(args: TuiArgs, store: &ConfigStore) -> Result<(), CliError> {
    if args.refresh < MIN_REFRESH_MS {
        return Err(CliError::validation(format!(
            "Refresh interval must be at least {MIN_REFRESH_MS}ms"
        )));
    }

    let client = create_client(store)?;
    whooktown_tui::run(client, Duration::from_millis(args.refresh))
        .await
        .map_err(|e| CliError::Dashboard {
            message: format!("{e:#}"),
        })
}
