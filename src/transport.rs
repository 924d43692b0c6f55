//! Shared outbound TLS transport
//!
//! Every connection opened through a [`TlsTransport`] is verified with
//! the [`TrustPolicy`] it was built with. Build one transport at startup
//! and share it; the policy travels with it instead of living in global
//! state.

use crate::config::TransportConfig;
use crate::error::{Error, Result};
use crate::trust::{PolicyVerifier, TrustPolicy};
use rustls::RootCertStore;
use rustls::pki_types::ServerName;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;
use tracing::{debug, info};

/// A TLS client transport with the trust policy baked in.
#[derive(Clone)]
pub struct TlsTransport {
    config: Arc<rustls::ClientConfig>,
}

impl TlsTransport {
    /// Build the transport from the bundled web roots plus any extra
    /// anchors named in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the extra roots file cannot be read or
    /// contains an unusable certificate.
    pub fn new(policy: TrustPolicy, config: &TransportConfig) -> Result<Self> {
        let mut roots = RootCertStore {
            roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
        };
        if let Some(path) = &config.extra_roots {
            let added = add_pem_roots(&mut roots, path)?;
            info!("Loaded {} extra trust anchors from {}", added, path.display());
        }
        Self::with_roots(policy, roots)
    }

    /// Build the transport over an explicit root store.
    ///
    /// # Errors
    ///
    /// Returns an error if the root store is empty.
    pub fn with_roots(policy: TrustPolicy, roots: RootCertStore) -> Result<Self> {
        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let verifier = PolicyVerifier::new(policy, Arc::new(roots), provider.clone())
            .map_err(|e| Error::Tls(e.to_string()))?;

        let config = rustls::ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .map_err(|e| Error::Tls(e.to_string()))?
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(verifier))
            .with_no_client_auth();

        Ok(Self {
            config: Arc::new(config),
        })
    }

    /// The rustls configuration, for HTTP stacks that take one directly.
    #[must_use]
    pub fn client_config(&self) -> Arc<rustls::ClientConfig> {
        Arc::clone(&self.config)
    }

    /// Open a TLS connection to `host:port`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TrustRejected`] if the server certificate fails
    /// the policy, [`Error::Tls`] for other handshake failures, and
    /// [`Error::Io`] if the TCP connection fails.
    pub async fn connect(&self, host: &str, port: u16) -> Result<TlsStream<TcpStream>> {
        let addr = format!("{host}:{port}");
        debug!("Connecting to {}", addr);

        let tcp_stream = TcpStream::connect(&addr).await?;

        let server_name = ServerName::try_from(host.to_string())
            .map_err(|e| Error::Tls(format!("Invalid server name: {e}")))?;

        let connector = TlsConnector::from(self.client_config());
        let tls_stream = connector
            .connect(server_name, tcp_stream)
            .await
            .map_err(handshake_error)?;

        info!("TLS established with {}", addr);
        Ok(tls_stream)
    }
}

impl std::fmt::Debug for TlsTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsTransport").finish_non_exhaustive()
    }
}

fn handshake_error(e: std::io::Error) -> Error {
    match e
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<rustls::Error>())
    {
        Some(rustls::Error::InvalidCertificate(cert_err)) => {
            Error::TrustRejected(cert_err.to_string())
        }
        Some(other) => Error::Tls(other.to_string()),
        None => Error::Tls(e.to_string()),
    }
}

fn add_pem_roots(roots: &mut RootCertStore, path: &Path) -> Result<usize> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut added = 0;
    for cert in rustls_pemfile::certs(&mut reader) {
        roots
            .add(cert?)
            .map_err(|e| {
                Error::Config(format!("Bad trust anchor in {}: {e}", path.display()))
            })?;
        added += 1;
    }
    if added == 0 {
        return Err(Error::Config(format!(
            "No certificates found in {}",
            path.display()
        )));
    }
    Ok(added)
}
