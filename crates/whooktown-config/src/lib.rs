//! Persisted credential store for the Whooktown CLI.
//!
//! One JSON file (`config.json`) under the platform config directory,
//! namespaced by the project name `whooktown`. It holds a single
//! credential record: token, token type, account id, and environment
//! selector. Reads substitute defaults for anything missing or corrupt;
//! writes go through [`ConfigStore::set_token`] / [`ConfigStore::clear_token`].
//!
//! The store is an explicit object constructed once at process start and
//! passed to command handlers; there is no ambient global. Concurrent
//! invocations racing on the same file are an accepted limitation.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Project name used to key the config directory.
pub const PROJECT_NAME: &str = "whooktown";

/// Env var forcing the development environment.
pub const ENV_VAR: &str = "WHOOKTOWN_ENV";

/// Env var overriding the config directory (tests, diagnostics).
pub const CONFIG_DIR_VAR: &str = "WHOOKTOWN_CONFIG_DIR";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine a config directory for this platform")]
    NoConfigDir,

    #[error("failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] serde_json::Error),
}

// ── Environment ─────────────────────────────────────────────────────

/// Which platform deployment the CLI talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Environment {
    #[default]
    #[serde(rename = "PROD")]
    Prod,
    #[serde(rename = "DEV")]
    Dev,
}

/// Resolve the effective environment from an optional `WHOOKTOWN_ENV`
/// value and the persisted selector. The env var wins when set to `DEV`.
pub fn resolve_environment(env_var: Option<&str>, stored: Environment) -> Environment {
    match env_var {
        Some("DEV") => Environment::Dev,
        _ => stored,
    }
}

// ── Stored record ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCredential {
    #[serde(default)]
    token: String,

    #[serde(default = "default_token_type")]
    token_type: String,

    #[serde(default)]
    account_id: String,

    #[serde(default)]
    environment: Environment,
}

fn default_token_type() -> String {
    "sensor".into()
}

impl Default for StoredCredential {
    fn default() -> Self {
        Self {
            token: String::new(),
            token_type: default_token_type(),
            account_id: String::new(),
            environment: Environment::default(),
        }
    }
}

// ── Store ───────────────────────────────────────────────────────────

/// The credential store: an in-memory copy of the config file that
/// persists itself on every mutation.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    values: StoredCredential,
}

impl ConfigStore {
    /// Open the store at the default per-user location, honoring the
    /// `WHOOKTOWN_CONFIG_DIR` override.
    pub fn open() -> Result<Self, ConfigError> {
        let dir = match std::env::var_os(CONFIG_DIR_VAR) {
            Some(dir) => PathBuf::from(dir),
            None => ProjectDirs::from("", "", PROJECT_NAME)
                .ok_or(ConfigError::NoConfigDir)?
                .config_dir()
                .to_path_buf(),
        };
        Ok(Self::open_at(dir.join("config.json")))
    }

    /// Open the store backed by an explicit file path.
    pub fn open_at(path: PathBuf) -> Self {
        let values = Self::load(&path);
        Self { path, values }
    }

    /// Read the file, substituting defaults when it is absent or corrupt.
    fn load(path: &Path) -> StoredCredential {
        match std::fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                debug!("config file {} unreadable ({e}), using defaults", path.display());
                StoredCredential::default()
            }),
            Err(_) => StoredCredential::default(),
        }
    }

    fn persist(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        let raw = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, raw).map_err(|source| ConfigError::Write {
            path: self.path.clone(),
            source,
        })
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The stored token, or `None` when empty.
    pub fn token(&self) -> Option<&str> {
        if self.values.token.is_empty() {
            None
        } else {
            Some(&self.values.token)
        }
    }

    /// An empty token means "not logged in" regardless of other fields.
    pub fn is_logged_in(&self) -> bool {
        !self.values.token.is_empty()
    }

    /// The stored account id, or `None` when empty.
    pub fn account_id(&self) -> Option<&str> {
        if self.values.account_id.is_empty() {
            None
        } else {
            Some(&self.values.account_id)
        }
    }

    /// Effective environment: `WHOOKTOWN_ENV=DEV` wins over the persisted
    /// selector; the default is PROD.
    pub fn environment(&self) -> Environment {
        let var = std::env::var(ENV_VAR).ok();
        resolve_environment(var.as_deref(), self.values.environment)
    }

    /// Path of the backing file, for diagnostics.
    pub fn config_path(&self) -> &Path {
        &self.path
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Save a token after successful login. Always resets the token type
    /// to the single supported value.
    pub fn set_token(&mut self, token: &str, account_id: &str) -> Result<(), ConfigError> {
        self.values.token = token.to_owned();
        self.values.token_type = default_token_type();
        self.values.account_id = account_id.to_owned();
        self.persist()
    }

    /// Clear the token and account id on logout. The environment selector
    /// is left untouched.
    pub fn clear_token(&mut self) -> Result<(), ConfigError> {
        self.values.token.clear();
        self.values.account_id.clear();
        self.persist()
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> ConfigStore {
        ConfigStore::open_at(dir.path().join("config.json"))
    }

    #[test]
    fn token_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        assert!(!store.is_logged_in());
        store.set_token("abc", "acct1").unwrap();
        assert_eq!(store.token(), Some("abc"));
        assert_eq!(store.account_id(), Some("acct1"));
        assert!(store.is_logged_in());

        // A fresh store re-reads the same file.
        let reopened = store_in(&dir);
        assert_eq!(reopened.token(), Some("abc"));
    }

    #[test]
    fn clear_token_logs_out_but_keeps_environment() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.set_token("abc", "acct1").unwrap();
        store.clear_token().unwrap();

        assert!(!store.is_logged_in());
        assert_eq!(store.token(), None);
        assert_eq!(store.account_id(), None);

        let raw = std::fs::read_to_string(store.config_path()).unwrap();
        assert!(raw.contains("\"environment\": \"PROD\""));
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = ConfigStore::open_at(path);
        assert!(!store.is_logged_in());
    }

    #[test]
    fn env_var_override_wins() {
        assert_eq!(
            resolve_environment(Some("DEV"), Environment::Prod),
            Environment::Dev
        );
        assert_eq!(
            resolve_environment(None, Environment::Prod),
            Environment::Prod
        );
        // Anything other than DEV leaves the stored value in charge.
        assert_eq!(
            resolve_environment(Some("staging"), Environment::Prod),
            Environment::Prod
        );
    }
}
