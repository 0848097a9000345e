use std::path::PathBuf;

/// Smallest accepted debounce interval, in milliseconds.
pub const MIN_DEBOUNCE_INTERVAL_MS: u64 = 10;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "reloadserver.json";

/// Prefix for environment overrides (`RELOADSERVER_PORT`, ...).
pub const ENV_PREFIX: &str = "RELOADSERVER_";

pub fn default_port() -> u16 {
    8000
}

pub fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

pub fn default_watch() -> Vec<String> {
    vec!["*".to_string()]
}

pub fn default_debounce_interval() -> u64 {
    500
}
