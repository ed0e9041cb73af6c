use crate::domain::{TlsSummary, ResptimeError};
use super::io::BoxedIoStream;

pub struct TlsSession {
    pub stream: BoxedIoStream,
    pub summary: TlsSummary,
}

pub trait TlsHandshaker: Send + Sync {
    fn handshake(&self, stream: BoxedIoStream, server_name: &str) -> impl std::future::Future<Output = Result<TlsSession, ResptimeError>> + Send;
}
