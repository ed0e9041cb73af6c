use std::sync::Arc;
use tokio_rustls::TlsConnector;
use rustls::{ClientConfig, RootCertStore};
use rustls::pki_types::ServerName;
use crate::domain::{TlsSummary, ResptimeError};
use crate::ports::{TlsHandshaker, TlsSession, BoxedIoStream};

pub struct RustlsTlsHandshaker {
    connector: TlsConnector,
}

impl RustlsTlsHandshaker {
    /// Trusts the bundled Mozilla root set.
    pub fn new() -> Result<Self, ResptimeError> {
        Self::with_roots(RootCertStore::from_iter(webpki_roots::TLS_SERVER_ROOTS.iter().cloned()))
    }

    pub fn with_roots(root_store: RootCertStore) -> Result<Self, ResptimeError> {
        let mut config = ClientConfig::builder_with_provider(Arc::new(rustls::crypto::ring::default_provider()))
            .with_safe_default_protocol_versions()
            .map_err(|e| ResptimeError::tls(format!("failed to build TLS config: {}", e)))?
            .with_root_certificates(root_store)
            .with_no_client_auth();
        config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];
        // Session resumption would shortcut the handshake on repeat visits.
        config.resumption = rustls::client::Resumption::disabled();
        Ok(Self { connector: TlsConnector::from(Arc::new(config)) })
    }
}

impl TlsHandshaker for RustlsTlsHandshaker {
    async fn handshake(&self, stream: BoxedIoStream, server_name: &str) -> Result<TlsSession, ResptimeError> {
        let name = ServerName::try_from(server_name.to_string())
            .map_err(|_| ResptimeError::tls(format!("invalid server name: {}", server_name)))?;

        let tls_stream = self.connector.connect(name, stream).await
            .map_err(|e| ResptimeError::tls(format!("TLS handshake failed: {}", e)))?;

        let (_, conn) = tls_stream.get_ref();
        let version = match conn.protocol_version() {
            Some(rustls::ProtocolVersion::TLSv1_2) => "TLS1.2".to_string(),
            Some(rustls::ProtocolVersion::TLSv1_3) => "TLS1.3".to_string(),
            Some(v) => format!("{:?}", v),
            None => "unknown".to_string(),
        };
        let alpn = conn.alpn_protocol().map(|p| String::from_utf8_lossy(p).to_string());
        let cipher = conn.negotiated_cipher_suite()
            .map(|cs| format!("{:?}", cs.suite()))
            .unwrap_or_else(|| "unknown".to_string());
        tracing::debug!(server_name, %version, alpn = ?alpn, "TLS established");

        Ok(TlsSession {
            stream: Box::new(tls_stream),
            summary: TlsSummary::new(version, alpn, cipher),
        })
    }
}

/// Self-signed certificate for `127.0.0.1` and `localhost`, shared by the
/// TLS tests in this crate.
#[cfg(test)]
pub(crate) mod test_pki {
    use std::sync::Arc;
    use rustls::RootCertStore;
    use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};

    const CERT_DER: &[u8] = include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/testdata/localhost.cert.der"));
    const KEY_DER: &[u8] = include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/testdata/localhost.key.der"));

    pub(crate) fn roots() -> RootCertStore {
        let mut roots = RootCertStore::empty();
        roots.add(CertificateDer::from(CERT_DER.to_vec())).unwrap();
        roots
    }

    pub(crate) fn server_config(alpn: &[&[u8]]) -> Arc<rustls::ServerConfig> {
        let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(KEY_DER.to_vec()));
        let mut config = rustls::ServerConfig::builder_with_provider(Arc::new(rustls::crypto::ring::default_provider()))
            .with_safe_default_protocol_versions()
            .unwrap()
            .with_no_client_auth()
            .with_single_cert(vec![CertificateDer::from(CERT_DER.to_vec())], key)
            .unwrap();
        config.alpn_protocols = alpn.iter().map(|p| p.to_vec()).collect();
        Arc::new(config)
    }
}
