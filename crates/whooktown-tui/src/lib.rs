//! Interactive terminal dashboard for the Whooktown platform.
//!
//! A single-screen live view cycling between three panels (sensors,
//! camera, traffic), polling the platform on a fixed interval and on
//! manual refresh. Strictly observational; no data mutation.
//!
//! The dashboard is split into an explicit event loop ([`app`]), a pure
//! state machine ([`state`], testable without a terminal), and a render
//! step that is a pure function of the state ([`panels`]).

mod app;
mod event;
mod panels;
mod state;
mod tui;

use std::time::Duration;

use color_eyre::eyre::Result;
use whooktown_api::WhooktownClient;

pub use state::{DashState, FetchOutcome, Msg, Panel};

/// Run the dashboard until the user quits.
///
/// Installs panic hooks that restore the terminal, so a crash mid-frame
/// does not leave the shell in raw mode.
pub async fn run(client: WhooktownClient, refresh_interval: Duration) -> Result<()> {
    tui::install_hooks()?;
    app::App::new(client, refresh_interval).run().await
}
