use crate::cli::Cli;
use crate::config::{ServerConfig, DEFAULT_CONFIG_FILE, ENV_PREFIX};
use crate::error::{ConfigError, Result};
use figment::{
    providers::{Env, Format as _, Json, Serialized},
    Figment,
};
use serde::Serialize;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

/// Settings that may come from `RELOADSERVER_*` variables.
const ENV_KEYS: [&str; 10] = [
    "port",
    "bind",
    "certificate",
    "key",
    "directory",
    "watch",
    "ignore",
    "skip_built_in_ignores",
    "blind",
    "debounce_interval",
];

/// The subset of settings given explicitly on the command line.
///
/// Unset options are skipped during serialization so they don't mask values
/// from the config file or environment.
#[derive(Debug, Default, Serialize)]
struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bind: Option<IpAddr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    certificate: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    directory: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    watch: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ignore: Option<Vec<String>>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    skip_built_in_ignores: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    blind: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    debounce_interval: Option<u64>,
}

impl From<&Cli> for CliOverrides {
    fn from(args: &Cli) -> Self {
        Self {
            port: args.port,
            bind: args.bind,
            certificate: args.certificate.clone(),
            key: args.key.clone(),
            directory: args.directory.clone(),
            watch: args.watch.clone(),
            ignore: args.ignore.clone(),
            skip_built_in_ignores: args.skip_built_in_ignores,
            blind: args.blind,
            debounce_interval: args.debounce_interval,
        }
    }
}

impl ServerConfig {
    /// Load configuration from multiple sources.
    /// Priority: CLI args > environment variables > config file > defaults
    pub fn load(args: &Cli) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        if let Some(path) = Self::config_file(args.config.as_deref())? {
            tracing::debug!("Loading configuration from {}", path.display());
            figment = figment.merge(Json::file(path));
        }

        // RELOADSERVER_PORT, RELOADSERVER_DEBOUNCE_INTERVAL, ...; other
        // RELOADSERVER_* variables belong to someone else
        figment = figment.merge(Env::prefixed(ENV_PREFIX).only(&ENV_KEYS));

        figment = figment.merge(Serialized::defaults(CliOverrides::from(args)));

        figment
            .extract()
            .map_err(|e| ConfigError::Extract(e.to_string()).into())
    }

    /// Resolve which config file to read, if any.
    ///
    /// An explicit path must exist; the default file is optional.
    fn config_file(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        match explicit {
            Some(path) if path.is_file() => Ok(Some(path.to_path_buf())),
            Some(path) => Err(ConfigError::NotFound(path.to_path_buf()).into()),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                Ok(default_path.is_file().then(|| default_path.to_path_buf()))
            }
        }
    }
}
