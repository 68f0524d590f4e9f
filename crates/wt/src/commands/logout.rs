//! `wt logout` -- clear the saved token.

use whooktown_config::ConfigStore;

use crate::error::CliError;
use crate::output;

pub fn handle(store: &mut ConfigStore) -> Result<(), CliError> {
    if !store.is_logged_in() {
        output::info("Not logged in");
        return Ok(());
    }

    store.clear_token()?;
    output::success("Logged out successfully");
    Ok(())
}
