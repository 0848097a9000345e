//! Miette diagnostic conversion for CLI errors.
//!
//! This module provides conversion from CLI errors to miette diagnostics
//! for readable error reporting on the terminal.

use crate::error::{CliError, ConfigError};
use ::miette::Report;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(e) => config_error_to_miette(e),
        CliError::Watch(e) => ::miette::miette!(
            help = "Check that the directory exists and is readable, or run with --blind",
            "File watcher error: {}",
            e
        ),
        CliError::Unwatchable { path, reason } => ::miette::miette!(
            help = "Check that the directory exists and is readable, or run with --blind",
            "Cannot watch {}: {}",
            path.display(),
            reason
        ),
        _ => ::miette::miette!("{}", err),
    }
}

/// Convert ConfigError to miette Report
fn config_error_to_miette(err: ConfigError) -> Report {
    match err {
        ConfigError::InvalidPattern { pattern, reason } => ::miette::miette!(
            help = "Patterns use glob syntax, e.g. '*.js', 'src/**', '*.{css,scss}'",
            "Invalid glob pattern '{}': {}",
            pattern,
            reason
        ),
        _ => ::miette::miette!("Configuration error: {}", err),
    }
}
