//! CLI error types with miette diagnostics.
//!
//! Remote failures are classified through [`FailureKind`] predicates in a
//! fixed priority order; every error path exits the process with code 1.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Preconditions ────────────────────────────────────────────────
    #[error("Not logged in")]
    #[diagnostic(code(wt::not_logged_in), help("Run: wt login <token>"))]
    NotLoggedIn,

    // ── Input validation ─────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(wt::validation))]
    Validation {
        message: String,
        #[help]
        hint: Option<String>,
    },

    // ── Remote failures, in classification priority order ────────────
    #[error("Authentication failed. Your token may be invalid or expired.")]
    #[diagnostic(code(wt::unauthorized), help("Run: wt login <token>"))]
    Unauthorized,

    #[error("Network error. Check your internet connection.")]
    #[diagnostic(code(wt::network))]
    Network,

    #[error("Request timed out. The server may be slow or unreachable.")]
    #[diagnostic(code(wt::timeout))]
    Timeout,

    #[error("Bad request: {message}")]
    #[diagnostic(code(wt::bad_request))]
    BadRequest { message: String },

    #[error("Not found. The resource does not exist.")]
    #[diagnostic(code(wt::not_found))]
    NotFound,

    #[error("Error: {message}")]
    #[diagnostic(code(wt::remote))]
    Remote { message: String },

    // ── Local subsystems ─────────────────────────────────────────────
    #[error("Config error: {0}")]
    #[diagnostic(code(wt::config))]
    Config(#[from] whooktown_config::ConfigError),

    #[error("Dashboard error: {message}")]
    #[diagnostic(code(wt::dashboard))]
    Dashboard { message: String },
}

impl CliError {
    /// Input-validation error without a hint.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            hint: None,
        }
    }

    /// Input-validation error with a corrective hint.
    pub fn validation_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }
}

// ── Classification ───────────────────────────────────────────────────

/// Predicates a remote failure exposes for classification. The CLI never
/// inspects error internals beyond these and the display message.
pub trait FailureKind: std::fmt::Display {
    fn is_unauthorized(&self) -> bool;
    fn is_network_error(&self) -> bool;
    fn is_timeout(&self) -> bool;
    fn is_bad_request(&self) -> bool;
    fn is_not_found(&self) -> bool;
}

impl FailureKind for whooktown_api::Error {
    fn is_unauthorized(&self) -> bool {
        self.is_unauthorized()
    }
    fn is_network_error(&self) -> bool {
        self.is_network_error()
    }
    fn is_timeout(&self) -> bool {
        self.is_timeout()
    }
    fn is_bad_request(&self) -> bool {
        self.is_bad_request()
    }
    fn is_not_found(&self) -> bool {
        self.is_not_found()
    }
}

/// Map a remote failure to its user-facing category.
///
/// Priority order matters: an error satisfying several predicates is
/// reported as the first matching category.
pub fn classify(err: &impl FailureKind) -> CliError {
    if err.is_unauthorized() {
        CliError::Unauthorized
    } else if err.is_network_error() {
        CliError::Network
    } else if err.is_timeout() {
        CliError::Timeout
    } else if err.is_bad_request() {
        CliError::BadRequest {
            message: err.to_string(),
        }
    } else if err.is_not_found() {
        CliError::NotFound
    } else {
        CliError::Remote {
            message: err.to_string(),
        }
    }
}

impl From<whooktown_api::Error> for CliError {
    fn from(err: whooktown_api::Error) -> Self {
        classify(&err)
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Fake failure with every predicate individually controllable.
    #[derive(Default)]
    struct FakeFailure {
        unauthorized: bool,
        network: bool,
        timeout: bool,
        bad_request: bool,
        not_found: bool,
    }

    impl std::fmt::Display for FakeFailure {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "fake failure")
        }
    }

    impl FailureKind for FakeFailure {
        fn is_unauthorized(&self) -> bool {
            self.unauthorized
        }
        fn is_network_error(&self) -> bool {
            self.network
        }
        fn is_timeout(&self) -> bool {
            self.timeout
        }
        fn is_bad_request(&self) -> bool {
            self.bad_request
        }
        fn is_not_found(&self) -> bool {
            self.not_found
        }
    }

    #[test]
    fn unauthorized_wins_over_not_found() {
        let err = FakeFailure {
            unauthorized: true,
            not_found: true,
            ..FakeFailure::default()
        };
        assert!(matches!(classify(&err), CliError::Unauthorized));
    }

    #[test]
    fn network_wins_over_timeout() {
        let err = FakeFailure {
            network: true,
            timeout: true,
            ..FakeFailure::default()
        };
        assert!(matches!(classify(&err), CliError::Network));
    }

    #[test]
    fn bad_request_carries_the_message() {
        let err = FakeFailure {
            bad_request: true,
            ..FakeFailure::default()
        };
        let CliError::BadRequest { message } = classify(&err) else {
            panic!("expected bad request");
        };
        assert_eq!(message, "fake failure");
    }

    #[test]
    fn unmatched_failures_fall_through_to_generic() {
        let err = FakeFailure::default();
        assert!(matches!(classify(&err), CliError::Remote { .. }));
    }

    #[test]
    fn api_timeout_classifies_as_timeout() {
        let classified = classify(&whooktown_api::Error::Timeout);
        assert!(matches!(classified, CliError::Timeout));
    }
}
