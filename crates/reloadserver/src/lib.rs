//! reloadserver - HTTP(S) static file server with automatic browser reload.
//!
//! Serves a directory and reloads every open page when a watched file
//! changes. HTML responses get a small script that long-polls
//! `/api-reloadserver/wait-for-reload`; the server answers those requests
//! once a debounced burst of file changes settles, or immediately on
//! `POST /api-reloadserver/trigger-reload`.
//!
//! # Architecture
//!
//! - [`reload`] - Watcher, debouncer, broadcast, HTML rewriting and routes
//! - [`config`] - Layered configuration (defaults, file, env, CLI)
//! - [`cli`] - Command-line definition
//! - [`commands`] - Server orchestration
//! - [`error`] - Error types and exit statuses
//! - [`logger`] - Structured logging with tracing
//! - [`ui`] - Colored status lines
//!
//! # Example
//!
//! ```rust,no_run
//! use reloadserver::reload::{ReloadCoordinator, ReloadServer};
//! use std::time::Duration;
//!
//! # async fn run() -> reloadserver::Result<()> {
//! let coordinator = ReloadCoordinator::new(
//!     Duration::from_millis(500),
//!     tokio::runtime::Handle::current(),
//! );
//! let server = ReloadServer::new(".".into(), coordinator);
//! let mut running = server
//!     .bind(&["127.0.0.1:8000".parse().unwrap()], None)
//!     .await?;
//! running.wait().await
//! # }
//! ```

// Public modules
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod reload;
pub mod ui;

// Re-export commonly used types
pub use error::{CliError, ConfigError, Result};
