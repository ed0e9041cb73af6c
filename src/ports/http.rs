use std::time::Instant;
use crate::domain::{HttpSummary, ResptimeError};
use super::io::BoxedIoStream;

#[derive(Debug, Clone, Default)]
pub struct ResponseHeaders {
    pub location: Option<String>,
    pub content_length: Option<u64>,
    pub transfer_encoding: Option<String>,
}

/// A fully read response. `first_byte_at` is when the first response byte
/// arrived; the exchange has finished reading by the time this is returned.
pub struct HttpResponse {
    pub summary: HttpSummary,
    pub headers: ResponseHeaders,
    pub first_byte_at: Option<Instant>,
    pub body_bytes: u64,
}

/// Sends one GET over an already established connection and reads the whole
/// response. The connection is closed afterwards.
pub trait HttpClient: Send + Sync {
    fn request_h1(&self, stream: BoxedIoStream, authority: &str, path: &str)
        -> impl std::future::Future<Output = Result<HttpResponse, ResptimeError>> + Send;

    fn request_h2(&self, stream: BoxedIoStream, authority: &str, path: &str)
        -> impl std::future::Future<Output = Result<HttpResponse, ResptimeError>> + Send;
}
