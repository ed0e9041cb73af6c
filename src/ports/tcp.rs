use std::net::SocketAddr;
use crate::domain::ResptimeError;
use super::io::BoxedIoStream;

pub trait TcpDialer: Send + Sync {
    fn connect(&self, addr: SocketAddr) -> impl std::future::Future<Output = Result<BoxedIoStream, ResptimeError>> + Send;
}
