mod dns;
mod tcp;
mod tls;
mod http;
mod clock;

pub use dns::HickoryDnsResolver;
pub use tcp::TokioTcpDialer;
pub use tls::RustlsTlsHandshaker;
pub use http::HybridHttpClient;
pub use clock::TokioClock;

#[cfg(test)]
pub(crate) use tls::test_pki;
