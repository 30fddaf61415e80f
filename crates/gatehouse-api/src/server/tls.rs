//! TLS termination for the primary listener.

use std::fs::File;
use std::io::{BufReader, Seek};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::http::Request;
use hyper::body::Incoming;
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};
use tokio::process::Command;
use tokio::sync::watch;
use tokio_rustls::TlsAcceptor;
use tokio_rustls::rustls::ServerConfig;
use tokio_rustls::rustls::crypto::ring;
use tokio_rustls::rustls::pki_types::{CertificateDer, PrivateKeyDer};
use tower::Service;
use tracing::{debug, info, warn};

use gatehouse_core::config::TlsConfig;
use gatehouse_core::error::{AppError, ErrorKind};
use gatehouse_core::result::AppResult;

/// Makes sure the certificate and key files exist.
///
/// When either is missing and self-signed generation is enabled, runs
/// `openssl` to write a fresh pair.
pub async fn ensure_certificate(config: &TlsConfig) -> AppResult<()> {
    let cert_path = Path::new(&config.cert_path);
    let key_path = Path::new(&config.key_path);
    if cert_path.exists() && key_path.exists() {
        return Ok(());
    }

    if !config.generate_self_signed {
        return Err(AppError::configuration(format!(
            "TLS certificate '{}' or key '{}' not found",
            config.cert_path, config.key_path
        )));
    }

    for path in [cert_path, key_path] {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    info!(cert = %config.cert_path, "Generating self-signed certificate");
    let output = Command::new("openssl")
        .args(["req", "-x509", "-newkey", "rsa:4096", "-nodes", "-days", "365"])
        .arg("-keyout")
        .arg(key_path)
        .arg("-out")
        .arg(cert_path)
        .arg("-subj")
        .arg(&config.subject)
        .output()
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Configuration, "Failed to run openssl", e))?;

    if !output.status.success() {
        return Err(AppError::configuration(format!(
            "openssl exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(())
}

/// Builds a rustls acceptor from PEM files.
///
/// The key may be PKCS#8 or PKCS#1 (RSA).
pub fn load_acceptor(config: &TlsConfig) -> AppResult<TlsAcceptor> {
    let cert_file = File::open(&config.cert_path)
        .map_err(|e| AppError::configuration(format!("Open cert '{}' failed: {e}", config.cert_path)))?;
    let mut cert_reader = BufReader::new(cert_file);
    let certs: Vec<CertificateDer<'static>> = rustls_pemfile::certs(&mut cert_reader)
        .collect::<Result<_, _>>()
        .map_err(|e| AppError::configuration(format!("Read certs failed: {e}")))?;

    let key_file = File::open(&config.key_path)
        .map_err(|e| AppError::configuration(format!("Open key '{}' failed: {e}", config.key_path)))?;
    let mut key_reader = BufReader::new(key_file);
    let mut keys: Vec<PrivateKeyDer<'static>> = rustls_pemfile::pkcs8_private_keys(&mut key_reader)
        .map(|k| k.map(Into::into))
        .collect::<Result<_, _>>()
        .map_err(|e| AppError::configuration(format!("Read private key failed: {e}")))?;
    if keys.is_empty() {
        key_reader.rewind()?;
        keys = rustls_pemfile::rsa_private_keys(&mut key_reader)
            .map(|k| k.map(Into::into))
            .collect::<Result<_, _>>()
            .map_err(|e| AppError::configuration(format!("Read RSA key failed: {e}")))?;
    }
    let key = keys
        .pop()
        .ok_or_else(|| AppError::configuration("No private key found"))?;

    let server_config = ServerConfig::builder_with_provider(Arc::new(ring::default_provider()))
        .with_safe_default_protocol_versions()
        .map_err(|e| AppError::configuration(format!("TLS protocol setup failed: {e}")))?
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .map_err(|e| AppError::configuration(format!("TLS config failed: {e}")))?;

    Ok(TlsAcceptor::from(Arc::new(server_config)))
}

/// Accepts TLS connections and serves `app` on each until shutdown.
pub async fn serve_tls(
    listener: TcpListener,
    acceptor: TlsAcceptor,
    app: Router,
    mut shutdown: watch::Receiver<bool>,
) -> AppResult<()> {
    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((stream, peer_addr)) => {
                        let acceptor = acceptor.clone();
                        let app = app.clone();
                        tokio::spawn(async move {
                            handle_connection(acceptor, app, stream, peer_addr).await;
                        });
                    }
                    Err(e) => {
                        warn!(error = %e, "TLS accept error");
                    }
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    info!("TLS listener shutting down");
                    break;
                }
            }
        }
    }

    Ok(())
}

async fn handle_connection(
    acceptor: TlsAcceptor,
    app: Router,
    stream: TcpStream,
    peer_addr: SocketAddr,
) {
    let tls_stream = match acceptor.accept(stream).await {
        Ok(s) => s,
        Err(e) => {
            debug!(peer = %peer_addr, error = %e, "TLS handshake failed");
            return;
        }
    };

    let io = TokioIo::new(tls_stream);
    let service = hyper::service::service_fn(move |req: Request<Incoming>| app.clone().call(req));

    if let Err(e) = hyper::server::conn::http1::Builder::new()
        .serve_connection(io, service)
        .await
    {
        debug!(peer = %peer_addr, error = %e, "TLS connection error");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_files_without_generation_fail() {
        let dir = tempfile::tempdir().unwrap();
        let config = TlsConfig {
            cert_path: dir.path().join("server.crt").display().to_string(),
            key_path: dir.path().join("server.key").display().to_string(),
            generate_self_signed: false,
            ..TlsConfig::default()
        };
        let err = ensure_certificate(&config).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_load_acceptor_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let cert = dir.path().join("server.crt");
        let key = dir.path().join("server.key");
        std::fs::write(&cert, "not a certificate").unwrap();
        std::fs::write(&key, "not a key").unwrap();

        let config = TlsConfig {
            cert_path: cert.display().to_string(),
            key_path: key.display().to_string(),
            ..TlsConfig::default()
        };
        assert!(load_acceptor(&config).is_err());
    }
}
