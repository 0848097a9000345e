//! TLS configuration for `--certificate`.

use crate::error::{CliError, Result};
use axum_server::tls_rustls::RustlsConfig;
use std::path::Path;
use tracing::debug;

/// Build the rustls configuration from PEM files.
///
/// `certificate` holds the chain and, when `key` is `None`, the private key
/// as well.
///
/// # Errors
///
/// [`CliError::CertificateNotFound`] when a file is missing,
/// [`CliError::Tls`] when the PEM material is unusable.
pub async fn load_tls_config(certificate: &Path, key: Option<&Path>) -> Result<RustlsConfig> {
    // Only the ring provider is compiled in; a second install is harmless
    let _ = rustls::crypto::ring::default_provider().install_default();

    let cert_pem = read_pem(certificate).await?;
    let key_pem = match key {
        Some(key) => read_pem(key).await?,
        None => cert_pem.clone(),
    };

    debug!("Loading TLS certificate from {}", certificate.display());
    RustlsConfig::from_pem(cert_pem, key_pem)
        .await
        .map_err(|e| CliError::Tls(e.to_string()))
}

async fn read_pem(path: &Path) -> Result<Vec<u8>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::CertificateNotFound(path.to_path_buf()))
        }
        Err(e) => Err(CliError::Tls(format!("{}: {}", path.display(), e))),
    }
}
