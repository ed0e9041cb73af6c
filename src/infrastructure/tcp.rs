use std::net::SocketAddr;
use tokio::net::TcpStream;
use crate::domain::ResptimeError;
use crate::ports::{TcpDialer, BoxedIoStream};

#[derive(Debug, Default, Clone, Copy)]
pub struct TokioTcpDialer;

impl TokioTcpDialer {
    pub fn new() -> Self { Self }
}

impl TcpDialer for TokioTcpDialer {
    async fn connect(&self, addr: SocketAddr) -> Result<BoxedIoStream, ResptimeError> {
        let stream = TcpStream::connect(addr).await.map_err(|e| {
            let msg = match e.kind() {
                std::io::ErrorKind::ConnectionRefused => format!("connection refused: {}", addr),
                std::io::ErrorKind::TimedOut => format!("connection timed out: {}", addr),
                _ => format!("TCP connect failed to {}: {}", addr, e),
            };
            ResptimeError::tcp(msg)
        })?;
        stream.set_nodelay(true).ok();
        Ok(Box::new(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorClass;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn refused_port_is_tcp_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = TokioTcpDialer::new().connect(addr).await.err().unwrap();
        assert_eq!(err.class, ErrorClass::Tcp);
        assert!(err.message.contains(&addr.to_string()), "{}", err.message);
    }

    #[tokio::test]
    async fn connects_to_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let accept = tokio::spawn(async move { listener.accept().await.map(|_| ()) });

        assert!(TokioTcpDialer::new().connect(addr).await.is_ok());
        accept.await.unwrap().unwrap();
    }
}
