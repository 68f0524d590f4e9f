//! `wt login <token>` -- validate and persist a sensor token.

use whooktown_config::ConfigStore;

use crate::cli::LoginArgs;
use crate::client::create_unauth_client;
use crate::error::CliError;
use crate::output;

/// The only token type this CLI accepts.
const REQUIRED_TOKEN_TYPE: &str = "sensor";

/// The exact role grant a sensor token must carry.
const REQUIRED_ROLE: (&str, &str) = ("sensor", "rw");

pub async fn handle(args: LoginArgs, store: &mut ConfigStore) -> Result<(), CliError> {
    if store.is_logged_in() {
        output::warn("Already logged in. Use \"wt logout\" first to switch accounts.");
    }

    if args.no_validate {
        output::warn("Skipping token validation");
        store.set_token(&args.token, "")?;
        output::success("Token saved");
        output::detail(&format!("Config: {}", store.config_path().display()));
        return Ok(());
    }

    output::info("Validating token...");

    let client = create_unauth_client(store)?;
    let token_info = client.check_token(&args.token).await.map_err(|e| {
        CliError::validation_with_hint("Token validation failed", e.to_string())
    })?;

    if token_info.token_type != REQUIRED_TOKEN_TYPE {
        return Err(CliError::validation_with_hint(
            format!("Invalid token type: {}", token_info.token_type),
            "This CLI only accepts sensor tokens.\nExpected type: sensor",
        ));
    }

    let (role, grant) = REQUIRED_ROLE;
    if token_info.roles.get(role).map(String::as_str) != Some(grant) {
        let roles = serde_json::to_string(&token_info.roles).unwrap_or_default();
        return Err(CliError::validation_with_hint(
            format!("Invalid token roles: {roles}"),
            r#"Expected roles: {"sensor": "rw"}"#,
        ));
    }

    let account_id = token_info.account_id.unwrap_or_default();
    store.set_token(&args.token, &account_id)?;

    output::success("Logged in successfully!");
    output::detail(&format!("Account ID: {account_id}"));
    output::detail(&format!("Token type: {}", token_info.token_type));
    output::detail(&format!("Config: {}", store.config_path().display()));
    Ok(())
}
