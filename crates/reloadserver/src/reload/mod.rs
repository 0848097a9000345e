//! Live-reload core: change detection, debouncing, broadcast and delivery.
//!
//! Data flows one way:
//!
//! ```text
//! notify events ─► FileWatcher ─► WatchFilter ─► ReloadCoordinator (debounce)
//!                                                       │
//!                       POST trigger-reload ──────────► ReloadSignal::fire
//!                                                       │
//!                       GET wait-for-reload ◄───────────┘ (204, client reloads)
//! ```
//!
//! Independently every HTML response passes through the [`inject`] middleware
//! so pages carry the script that long-polls the wait endpoint.

mod coordinator;
mod filter;
pub mod inject;
mod listing;
mod server;
mod signal;
mod tls;
mod watcher;

pub use coordinator::ReloadCoordinator;
pub use filter::{WatchFilter, BUILT_IN_EXCLUDES};
pub use inject::{inject_reload_script, PendingResponse, RELOAD_SCRIPT};
pub use server::{bind_listener, AppState, ReloadServer, RunningServer, SharedState};
pub use signal::ReloadSignal;
pub use tls::load_tls_config;
pub use watcher::FileWatcher;

/// Long-poll endpoint answered with 204 on the next reload.
pub const WAIT_FOR_RELOAD_PATH: &str = "/api-reloadserver/wait-for-reload";

/// Endpoint that reloads every client immediately.
pub const TRIGGER_RELOAD_PATH: &str = "/api-reloadserver/trigger-reload";
