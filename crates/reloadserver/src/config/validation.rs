use crate::config::{ServerConfig, MIN_DEBOUNCE_INTERVAL_MS};
use crate::error::{CliError, ConfigError, Result};
use crate::reload::WatchFilter;

impl ServerConfig {
    /// Validate configuration for logical consistency.
    ///
    /// Runs before anything is bound or watched, so every failure here is a
    /// clean startup error.
    pub fn validate(&self) -> Result<()> {
        if self.debounce_interval < MIN_DEBOUNCE_INTERVAL_MS {
            return Err(ConfigError::InvalidValue {
                field: "debounce_interval".to_string(),
                value: self.debounce_interval.to_string(),
                hint: format!(
                    "Debouncing interval must be at least {} ms (-D, --debounce-interval)",
                    MIN_DEBOUNCE_INTERVAL_MS
                ),
            }
            .into());
        }

        if !self.directory.is_dir() {
            return Err(CliError::Unwatchable {
                path: self.directory.clone(),
                reason: "not an existing directory".to_string(),
            });
        }

        if self.key.is_some() && self.certificate.is_none() {
            return Err(ConfigError::InvalidValue {
                field: "key".to_string(),
                value: "set".to_string(),
                hint: "A private key is only used together with a certificate".to_string(),
            }
            .into());
        }

        if self.blind {
            return Ok(());
        }

        if self.watch.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "watch".to_string(),
                value: "[]".to_string(),
                hint: "Provide at least one pattern, or use --blind to disable watching".to_string(),
            }
            .into());
        }

        // Compiling the filter reports the first malformed pattern
        self.watch_filter().map(|_| ())
    }

    /// Build the filter applied to filesystem events.
    pub fn watch_filter(&self) -> Result<WatchFilter> {
        WatchFilter::new(&self.watch, &self.ignore, !self.skip_built_in_ignores)
    }
}
