//! HTTP surface: reload endpoints layered over static file serving.

use crate::error::{CliError, Result};
use crate::reload::{
    inject::inject_reload_middleware, listing, ReloadCoordinator, TRIGGER_RELOAD_PATH,
    WAIT_FOR_RELOAD_PATH,
};
use axum::{
    extract::{Request, State},
    handler::Handler,
    http::{Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use axum_server::{tls_rustls::RustlsConfig, Handle};
use socket2::{Domain, Protocol, Socket, Type};
use std::future::Future;
use std::io;
use std::net::{SocketAddr, TcpListener as StdTcpListener};
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tower::ServiceExt;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{debug, Level};

/// State shared by every request handler.
#[derive(Debug)]
pub struct AppState {
    /// Debouncer and broadcast behind the reload endpoints
    pub coordinator: Arc<ReloadCoordinator>,
    /// Directory served as `/`
    pub root: Arc<PathBuf>,
}

pub type SharedState = Arc<AppState>;

type ServeFuture = Pin<Box<dyn Future<Output = io::Result<()>> + Send>>;

/// Static file server with live reload.
pub struct ReloadServer {
    state: SharedState,
}

impl ReloadServer {
    /// Create a server for `root` whose reloads go through `coordinator`.
    pub fn new(root: PathBuf, coordinator: Arc<ReloadCoordinator>) -> Self {
        Self {
            state: Arc::new(AppState {
                coordinator,
                root: Arc::new(root),
            }),
        }
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    /// Build the axum router with all routes.
    pub fn router(&self) -> Router {
        Router::new()
            .route(WAIT_FOR_RELOAD_PATH, get(wait_for_reload))
            .route(TRIGGER_RELOAD_PATH, post(trigger_reload))
            // Everything else is a static file, a listing or a 404
            .fallback(serve_static)
            .layer(middleware::from_fn(inject_reload_middleware))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .with_state(Arc::clone(&self.state))
    }

    /// Bind the first usable address and start serving in the background.
    ///
    /// Candidates are tried in order; the IPv6 wildcard fails on hosts
    /// without IPv6 and the next candidate is used instead. The socket is
    /// bound before the accept loop is spawned, so a busy port is reported
    /// here rather than from the background task.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Server`] if no candidate can be bound.
    pub async fn bind(
        &self,
        candidates: &[SocketAddr],
        tls: Option<RustlsConfig>,
    ) -> Result<RunningServer> {
        let mut last_error = None;

        for &addr in candidates {
            match bind_listener(addr) {
                Ok(listener) => return self.serve_listener(listener, tls),
                Err(e) => {
                    debug!("Could not bind {}: {}", addr, e);
                    last_error = Some(format!("Failed to bind to {}: {}", addr, e));
                }
            }
        }

        Err(CliError::Server(
            last_error.unwrap_or_else(|| "No address to bind".to_string()),
        ))
    }

    fn serve_listener(
        &self,
        listener: StdTcpListener,
        tls: Option<RustlsConfig>,
    ) -> Result<RunningServer> {
        let local_addr = listener
            .local_addr()
            .map_err(|e| CliError::Server(format!("Failed to read bound address: {}", e)))?;
        let handle: Handle<SocketAddr> = Handle::new();
        let app = self.router().into_make_service();

        let serve: ServeFuture = match tls {
            Some(config) => Box::pin(
                axum_server::tls_rustls::from_tcp_rustls(listener, config)
                    .map_err(|e| server_error(local_addr, e))?
                    .handle(handle.clone())
                    .serve(app),
            ),
            None => Box::pin(
                axum_server::from_tcp(listener)
                    .map_err(|e| server_error(local_addr, e))?
                    .handle(handle.clone())
                    .serve(app),
            ),
        };

        Ok(RunningServer {
            local_addr,
            handle,
            task: tokio::spawn(serve),
        })
    }
}

fn server_error(addr: SocketAddr, e: io::Error) -> CliError {
    CliError::Server(format!("Failed to serve on {}: {}", addr, e))
}

/// Open a non-blocking listening socket on `addr`.
///
/// IPv6 sockets accept IPv4-mapped connections too, so `[::]` covers
/// both stacks where the OS allows it.
pub fn bind_listener(addr: SocketAddr) -> io::Result<StdTcpListener> {
    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
    if addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    // Windows lets a second socket steal the port with this set
    #[cfg(not(windows))]
    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(1024)?;
    socket.set_nonblocking(true)?;
    Ok(socket.into())
}

/// A server accepting connections on a background task.
pub struct RunningServer {
    local_addr: SocketAddr,
    handle: Handle<SocketAddr>,
    task: JoinHandle<io::Result<()>>,
}

impl RunningServer {
    /// Address actually bound (resolves port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Wait for the accept loop to end.
    pub async fn wait(&mut self) -> Result<()> {
        match (&mut self.task).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(CliError::Server(e.to_string())),
            Err(e) => Err(CliError::Server(format!("Server task failed: {}", e))),
        }
    }

    /// Stop accepting and drop open connections, including pending long-polls.
    pub fn shutdown(&self) {
        self.handle.shutdown();
    }
}

/// Long-poll until the next reload.
async fn wait_for_reload(State(state): State<SharedState>) -> StatusCode {
    state.coordinator.wait_for_next().await;
    StatusCode::NO_CONTENT
}

/// Reload every client now.
async fn trigger_reload(State(state): State<SharedState>) -> StatusCode {
    state.coordinator.force_reload();
    StatusCode::NO_CONTENT
}

/// Fallback for all other paths.
async fn serve_static(State(state): State<SharedState>, request: Request) -> Response {
    if request.method() == Method::POST {
        return (
            StatusCode::NOT_FOUND,
            format!("Can only POST to {}", TRIGGER_RELOAD_PATH),
        )
            .into_response();
    }

    let listing = listing::directory_listing.with_state(Arc::clone(&state.root));
    match ServeDir::new(state.root.as_path())
        .fallback(listing)
        .oneshot(request)
        .await
    {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}
