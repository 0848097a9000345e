//! Error handling for reloadserver.
//!
//! This module provides a hierarchical error type system using `thiserror` for
//! structured error handling with actionable messages. Startup failures are
//! fatal and each category maps to its own process exit status, so scripts
//! driving the server can tell a bad certificate from a bad watch root.
//!
//! # Architecture
//!
//! - **Top-level errors** (`CliError`) represent broad categories of failures
//! - **Domain-specific errors** (`ConfigError`) provide detailed context
//! - **Error conversion** is automatic via `#[from]` attributes
//!
//! # Example
//!
//! ```rust
//! use reloadserver::error::{CliError, ConfigError};
//! use std::path::PathBuf;
//!
//! let err: CliError = ConfigError::NotFound(PathBuf::from("reloadserver.json")).into();
//! assert_eq!(err.exit_code(), 1);
//! ```

use std::path::PathBuf;
use thiserror::Error;

mod miette;

pub use self::miette::cli_error_to_miette;

/// Top-level CLI error type.
///
/// This is the primary error type returned by the server bootstrap. It
/// automatically converts from domain-specific errors via `From`
/// implementations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration-related errors (invalid values, bad patterns, unreadable file)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// HTTP server errors (bind failures, accept loop errors)
    #[error("Server error: {0}")]
    Server(String),

    /// File watching errors
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// The root directory to watch could not be used
    #[error("Cannot watch {}: {reason}", .path.display())]
    Unwatchable {
        /// Root that was requested
        path: PathBuf,
        /// Why it cannot be watched
        reason: String,
    },

    /// The configured TLS certificate does not exist
    #[error("Server certificate \"{}\" not found, exiting", .0.display())]
    CertificateNotFound(PathBuf),

    /// TLS context could not be created from the certificate/key material
    #[error("SSL error: \"{0}\", exiting")]
    Tls(String),
}

impl CliError {
    /// Process exit status for this error.
    ///
    /// | Status | Meaning |
    /// |--------|---------|
    /// | 1 | invalid configuration |
    /// | 2 | command-line usage error (reported by clap) |
    /// | 3 | watch root missing or subscription failed |
    /// | 4 | TLS certificate not found |
    /// | 5 | TLS context creation failed |
    /// | 6 | server could not bind or crashed |
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Config(_) => 1,
            CliError::Watch(_) | CliError::Unwatchable { .. } => 3,
            CliError::CertificateNotFound(_) => 4,
            CliError::Tls(_) => 5,
            CliError::Server(_) => 6,
        }
    }
}

/// Configuration-specific errors.
///
/// These errors occur during config file loading, merging, and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file given with `--config` doesn't exist
    #[error("Config file not found: {}\n\nHint: Create the file or drop --config to use defaults", .0.display())]
    NotFound(PathBuf),

    /// Layered configuration could not be extracted (bad JSON, wrong types)
    #[error("Could not load configuration: {0}\n\nHint: Check reloadserver.json syntax and RELOADSERVER_* variables")]
    Extract(String),

    /// A glob pattern failed to compile
    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// Pattern as written by the user
        pattern: String,
        /// Parser message
        reason: String,
    },

    /// Invalid value for a configuration option
    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The invalid value
        value: String,
        /// Helpful hint for correct values
        hint: String,
    },
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_invalid_value() {
        let err = ConfigError::InvalidValue {
            field: "debounce_interval".to_string(),
            value: "5".to_string(),
            hint: "Must be at least 10 ms".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Invalid value for 'debounce_interval'"));
        assert!(msg.contains("5"));
        assert!(msg.contains("Hint: Must be at least 10 ms"));
    }

    #[test]
    fn test_config_error_invalid_pattern() {
        let err = ConfigError::InvalidPattern {
            pattern: "[".to_string(),
            reason: "unclosed character class".to_string(),
        };
        assert!(err.to_string().contains("Invalid glob pattern '['"));
    }

    #[test]
    fn test_cli_error_from_config_error() {
        let config_err = ConfigError::NotFound(PathBuf::from("reloadserver.json"));
        let cli_err: CliError = config_err.into();
        assert!(matches!(cli_err, CliError::Config(_)));
    }

    #[test]
    fn test_exit_codes_are_distinct_per_startup_failure() {
        let config: CliError = ConfigError::Extract("bad".to_string()).into();
        let watch = CliError::Unwatchable {
            path: PathBuf::from("/nope"),
            reason: "missing".to_string(),
        };
        let cert = CliError::CertificateNotFound(PathBuf::from("server.pem"));
        let tls = CliError::Tls("no private key".to_string());
        let server = CliError::Server("address in use".to_string());

        let codes = [
            config.exit_code(),
            watch.exit_code(),
            cert.exit_code(),
            tls.exit_code(),
            server.exit_code(),
        ];
        assert_eq!(codes, [1, 3, 4, 5, 6]);
        assert!(codes.iter().all(|code| *code != 0 && *code != 2));
    }

    #[test]
    fn test_certificate_messages() {
        let err = CliError::CertificateNotFound(PathBuf::from("/tmp/server.pem"));
        assert_eq!(
            err.to_string(),
            "Server certificate \"/tmp/server.pem\" not found, exiting"
        );

        let err = CliError::Tls("no private key found".to_string());
        assert_eq!(err.to_string(), "SSL error: \"no private key found\", exiting");
    }
}
