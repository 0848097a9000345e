//! Configuration system for reloadserver with multi-source loading.
//!
//! Merges settings from CLI args, environment variables, and a JSON file.
//! Priority: CLI > Environment > File > Defaults

mod defaults;
mod loading;
mod validation;

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

pub use defaults::*;

/// Server configuration - loaded from reloadserver.json, env and CLI args.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// TCP port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Address to bind; all interfaces (dual-stack when possible) if unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<IpAddr>,

    /// PEM certificate chain; enables HTTPS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<PathBuf>,

    /// PEM private key, when not bundled with the certificate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<PathBuf>,

    /// Directory served and watched
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// Glob patterns a changed file must match to trigger a reload
    #[serde(default = "default_watch")]
    pub watch: Vec<String>,

    /// Glob patterns that never trigger a reload
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Disable the dotfile / node_modules / __pycache__ excludes
    #[serde(default)]
    pub skip_built_in_ignores: bool,

    /// Do not watch the filesystem; reload only through the trigger endpoint
    #[serde(default)]
    pub blind: bool,

    /// Quiet period after the last change before clients reload, in ms
    #[serde(default = "default_debounce_interval")]
    pub debounce_interval: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: None,
            certificate: None,
            key: None,
            directory: default_directory(),
            watch: default_watch(),
            ignore: Vec::new(),
            skip_built_in_ignores: false,
            blind: false,
            debounce_interval: default_debounce_interval(),
        }
    }
}

impl ServerConfig {
    /// Debounce interval as a `Duration`.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_interval)
    }

    /// Whether the server should speak HTTPS.
    pub fn is_tls(&self) -> bool {
        self.certificate.is_some()
    }

    /// Socket addresses to try binding, in order.
    ///
    /// An explicit `bind` yields exactly that address. Otherwise the IPv6
    /// wildcard comes first (it accepts IPv4 too on dual-stack hosts) with
    /// the IPv4 wildcard as fallback for hosts without IPv6.
    pub fn bind_candidates(&self) -> Vec<SocketAddr> {
        match self.bind {
            Some(ip) => vec![SocketAddr::new(ip, self.port)],
            None => vec![
                SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), self.port),
                SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), self.port),
            ],
        }
    }

    /// Get the scheme clients should use.
    pub fn scheme(&self) -> &'static str {
        if self.is_tls() {
            "https"
        } else {
            "http"
        }
    }
}
