use std::net::IpAddr;
use crate::domain::ResptimeError;

pub trait DnsResolver: Send + Sync {
    /// Resolves `host` afresh; implementations must not answer from a cache
    /// shared with earlier calls.
    fn resolve(&self, host: &str) -> impl std::future::Future<Output = Result<Vec<IpAddr>, ResptimeError>> + Send;
}
