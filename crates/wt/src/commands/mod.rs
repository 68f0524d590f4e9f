//! Command handlers, one module per resource.

pub mod dashboard;
pub mod layout;
pub mod login;
pub mod logout;
pub mod popup;
pub mod sensor;
pub mod traffic;

use whooktown_config::ConfigStore;

use crate::cli::Command;
use crate::error::CliError;

/// Dispatch a parsed command to its handler.
pub async fn dispatch(command: Command, store: &mut ConfigStore) -> Result<(), CliError> {
    match command {
        Command::Login(args) => login::handle(args, store).await,
        Command::Logout => logout::handle(store),
        Command::Sensor(args) => sensor::handle(args.command, store).await,
        Command::Traffic(args) => traffic::handle(args.command, store).await,
        Command::Layout(args) => layout::handle(args.command, store).await,
        Command::Popup(args) => popup::handle(args.command, store).await,
        Command::Tui(args) => dashboard::handle(args, store).await,
    }
}
