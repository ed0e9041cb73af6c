mod dns;
mod tcp;
mod tls;
mod http;
mod clock;
mod io;

pub use dns::DnsResolver;
pub use tcp::TcpDialer;
pub use tls::{TlsHandshaker, TlsSession};
pub use http::{HttpClient, HttpResponse, ResponseHeaders};
pub use clock::Clock;
pub use io::{IoStream, BoxedIoStream};
