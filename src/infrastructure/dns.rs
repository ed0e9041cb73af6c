use std::net::IpAddr;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use crate::domain::ResptimeError;
use crate::ports::DnsResolver;

/// Resolver that builds a new hickory resolver per lookup, so no answer is
/// ever served from an earlier measurement's cache.
pub struct HickoryDnsResolver {
    config: ResolverConfig,
    opts: ResolverOpts,
}

impl HickoryDnsResolver {
    /// Uses the system resolver configuration, falling back to hickory's
    /// defaults when it cannot be read.
    pub fn new() -> Result<Self, ResptimeError> {
        let (config, opts) = match hickory_resolver::system_conf::read_system_conf() {
            Ok(conf) => conf,
            Err(e) => {
                tracing::warn!(error = %e, "system resolver config unavailable, using defaults");
                (ResolverConfig::default(), ResolverOpts::default())
            }
        };
        Ok(Self::with_config(config, opts))
    }

    pub fn with_config(config: ResolverConfig, mut opts: ResolverOpts) -> Self {
        opts.cache_size = 0;
        Self { config, opts }
    }
}

impl DnsResolver for HickoryDnsResolver {
    async fn resolve(&self, host: &str) -> Result<Vec<IpAddr>, ResptimeError> {
        let resolver = TokioAsyncResolver::tokio(self.config.clone(), self.opts.clone());
        let response = resolver.lookup_ip(host).await
            .map_err(|e| ResptimeError::dns(format!("DNS lookup failed for '{}': {}", host, e)))?;
        let ips: Vec<IpAddr> = response.iter().collect();
        if ips.is_empty() {
            return Err(ResptimeError::dns(format!("no DNS records for '{}'", host)));
        }
        tracing::debug!(host, count = ips.len(), "resolved");
        Ok(ips)
    }
}
