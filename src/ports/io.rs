use tokio::io::{AsyncRead, AsyncWrite};

/// Byte stream a request runs over: plain TCP, or TLS layered on top of it.
pub trait IoStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> IoStream for T {}

pub type BoxedIoStream = Box<dyn IoStream>;
