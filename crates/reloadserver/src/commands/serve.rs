//! Serve command implementation.
//!
//! Orchestrates the server lifecycle:
//! - Configuration loading and validation
//! - File watching with debounced reloads (unless blind)
//! - Optional TLS
//! - HTTP(S) server with the reload endpoints
//! - Shutdown on Ctrl+C

use crate::cli::Cli;
use crate::config::ServerConfig;
use crate::error::{CliError, Result};
use crate::reload::{
    load_tls_config, FileWatcher, ReloadCoordinator, ReloadServer, TRIGGER_RELOAD_PATH,
};
use crate::ui;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::signal;

/// Execute the serve command.
///
/// # Errors
///
/// Every startup failure is returned before anything is served; see
/// [`CliError::exit_code`] for how they map to exit statuses.
pub async fn execute(args: Cli) -> Result<()> {
    // Step 1: Load and validate configuration
    let config = ServerConfig::load(&args)?;
    config.validate()?;

    let root = config
        .directory
        .canonicalize()
        .map_err(|e| CliError::Unwatchable {
            path: config.directory.clone(),
            reason: e.to_string(),
        })?;

    // Step 2: Reload coordination
    let coordinator = ReloadCoordinator::new(config.debounce(), Handle::current());

    // Step 3: File watcher, kept alive until we return
    let _watcher = start_watcher(&config, Arc::clone(&coordinator))?;

    // Step 4: TLS
    let tls = match &config.certificate {
        Some(certificate) => Some(load_tls_config(certificate, config.key.as_deref()).await?),
        None => None,
    };

    // Step 5: Server
    let server = ReloadServer::new(root, coordinator);
    let mut running = server.bind(&config.bind_candidates(), tls).await?;

    ui::success(&serving_banner(config.scheme(), running.local_addr()));
    ui::info(&format!(
        "Modify a watched file or POST to {} to reload clients",
        TRIGGER_RELOAD_PATH
    ));

    let interrupted = tokio::select! {
        result = running.wait() => {
            result?;
            false
        }
        _ = signal::ctrl_c() => true,
    };

    if interrupted {
        ui::info("Shutting down...");
        running.shutdown();
    } else {
        ui::warning("Server stopped unexpectedly");
    }

    Ok(())
}

/// Start the filesystem watcher, or nothing in blind mode.
pub fn start_watcher(
    config: &ServerConfig,
    coordinator: Arc<ReloadCoordinator>,
) -> Result<Option<FileWatcher>> {
    if config.blind {
        ui::info(&format!(
            "Blind mode: not watching files, POST to {} to reload",
            TRIGGER_RELOAD_PATH
        ));
        return Ok(None);
    }

    if config.skip_built_in_ignores {
        ui::warning("Built-in ignores disabled, dotfiles and node_modules trigger reloads");
    }

    let watcher = FileWatcher::new(&config.directory, config.watch_filter()?, coordinator)?;
    ui::info(&format!(
        "Watching {} for {}",
        watcher.root().display(),
        config.watch.join(", ")
    ));
    Ok(Some(watcher))
}

/// `Serving HTTP on :: port 8000 (http://[::]:8000/) ...`
fn serving_banner(scheme: &str, addr: SocketAddr) -> String {
    let host = match addr {
        SocketAddr::V6(v6) => format!("[{}]", v6.ip()),
        SocketAddr::V4(v4) => v4.ip().to_string(),
    };
    format!(
        "Serving {} on {} port {} ({}://{}:{}/) ...",
        scheme.to_uppercase(),
        addr.ip(),
        addr.port(),
        scheme,
        host,
        addr.port()
    )
}
