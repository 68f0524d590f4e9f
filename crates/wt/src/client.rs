//! Client construction from stored credentials and environment variables.

use whooktown_api::{ClientConfig, Environment, ServiceUrls, WhooktownClient};
use whooktown_config::ConfigStore;

use crate::error::CliError;

/// Env var overriding the auth service base URL.
pub const AUTH_URL_VAR: &str = "WHOOKTOWN_AUTH_URL";

/// Env var overriding the sensor service base URL.
pub const SENSOR_URL_VAR: &str = "WHOOKTOWN_SENSOR_URL";

fn environment_for(store: &ConfigStore) -> Environment {
    match store.environment() {
        whooktown_config::Environment::Prod => Environment::Production,
        whooktown_config::Environment::Dev => Environment::Development,
    }
}

fn resolve_urls(env: Environment) -> Result<ServiceUrls, CliError> {
    let auth = std::env::var(AUTH_URL_VAR).ok();
    let sensor = std::env::var(SENSOR_URL_VAR).ok();
    ServiceUrls::resolve(env, auth.as_deref(), sensor.as_deref()).map_err(|e| {
        CliError::validation_with_hint(
            format!("Invalid service URL override: {e}"),
            format!("Check {AUTH_URL_VAR} / {SENSOR_URL_VAR}"),
        )
    })
}

/// Build an authenticated client from the stored token.
///
/// A missing token is a hard precondition failure, not a recoverable
/// error: every authenticated command needs it.
pub fn create_client(store: &ConfigStore) -> Result<WhooktownClient, CliError> {
    let token = store.token().ok_or(CliError::NotLoggedIn)?.to_owned();
    let urls = resolve_urls(environment_for(store))?;
    let client = WhooktownClient::new(ClientConfig {
        token: Some(token),
        urls,
    })?;
    Ok(client)
}

/// Build an unauthenticated client, used only by login's validation step
/// before a token is known to be good.
pub fn create_unauth_client(store: &ConfigStore) -> Result<WhooktownClient, CliError> {
    let urls = resolve_urls(environment_for(store))?;
    let client = WhooktownClient::new(ClientConfig { token: None, urls })?;
    Ok(client)
}
