use std::net::SocketAddr;
use std::time::Duration;
use chrono::Local;
use crate::domain::*;
use crate::ports::*;
use super::{Config, ParsedUrl};

/// Runs one fully instrumented GET and turns it into a [`Measurement`].
///
/// Every call opens a fresh connection: new DNS lookup, new TCP connect and,
/// for `https`, a new TLS handshake. Redirects are reported, never followed.
/// The use case holds no per-request state, so one instance can be shared
/// by successive measurements.
pub struct MeasureUseCase<D, T, L, H, C>
where
    D: DnsResolver,
    T: TcpDialer,
    L: TlsHandshaker,
    H: HttpClient,
    C: Clock,
{
    dns: D,
    tcp: T,
    tls: L,
    http: H,
    clock: C,
    config: Config,
}

fn expired(phase: &str, limit: Duration) -> ResptimeError {
    ResptimeError::timeout(format!("{} timed out after {:?}", phase, limit))
}

impl<D, T, L, H, C> MeasureUseCase<D, T, L, H, C>
where
    D: DnsResolver,
    T: TcpDialer,
    L: TlsHandshaker,
    H: HttpClient,
    C: Clock,
{
    pub fn new(dns: D, tcp: T, tls: L, http: H, clock: C, config: Config) -> Self {
        Self { dns, tcp, tls, http, clock, config }
    }

    /// Measures `target` and stamps the result with `id`.
    pub async fn execute(&self, target: &ParsedUrl, id: u32) -> Result<Measurement, ResptimeError> {
        let limit = self.config.connect_timeout;
        let mut timer = PhaseTimer::new();
        timer.mark_at(Boundary::RequestStart, self.clock.now());

        let resolved = match target.literal_ip {
            Some(ip) => ResolvedTarget::literal(ip, target.port),
            None => {
                timer.mark_at(Boundary::DnsStart, self.clock.now());
                let ips = tokio::time::timeout(limit, self.dns.resolve(&target.host)).await
                    .map_err(|_| expired("DNS lookup", limit))??;
                timer.mark_at(Boundary::DnsDone, self.clock.now());
                ResolvedTarget::resolved(ips, target.port)
            }
        };

        let (stream, connection_address) = self.connect(&resolved, &mut timer).await?;

        let (stream, tls) = if target.is_https() {
            timer.mark_at(Boundary::TlsStart, self.clock.now());
            let session = tokio::time::timeout(limit, self.tls.handshake(stream, &target.host)).await
                .map_err(|_| expired("TLS handshake", limit))??;
            timer.mark_at(Boundary::TlsDone, self.clock.now());
            (session.stream, Some(session.summary))
        } else {
            (stream, None)
        };

        timer.mark_at(Boundary::GotConnection, self.clock.now());
        let use_h2 = tls.as_ref().map(TlsSummary::is_h2).unwrap_or(false);
        let response_limit = self.config.response_timeout;
        let response = if use_h2 {
            tokio::time::timeout(response_limit, self.http.request_h2(stream, &target.authority, &target.path_and_query)).await
        } else {
            tokio::time::timeout(response_limit, self.http.request_h1(stream, &target.authority, &target.path_and_query)).await
        };
        let response = response.map_err(|_| expired("HTTP response", response_limit))??;
        timer.mark_at(Boundary::RequestEnd, self.clock.now());
        if let Some(at) = response.first_byte_at {
            timer.mark_at(Boundary::FirstResponseByte, at);
        }

        let timings = timer.durations();
        tracing::info!(
            id,
            url = target.as_str(),
            status = response.summary.status,
            total_ms = timings.total.as_secs_f64() * 1000.0,
            "measurement finished"
        );

        Ok(Measurement {
            id,
            url: target.as_str().to_string(),
            resolved_addresses: resolved.addresses,
            connection_address,
            http: response.summary,
            tls,
            location: response.headers.location,
            body_bytes: response.body_bytes,
            timings,
            measured_at: Local::now(),
        })
    }

    /// Tries each candidate address in order. Connect boundaries are
    /// re-marked per attempt, so only the successful attempt is timed.
    async fn connect(&self, resolved: &ResolvedTarget, timer: &mut PhaseTimer) -> Result<(BoxedIoStream, SocketAddr), ResptimeError> {
        let limit = self.config.connect_timeout;
        let mut last_err = ResptimeError::dns("no addresses to connect to");
        for addr in resolved.candidates() {
            timer.mark_at(Boundary::ConnectStart, self.clock.now());
            let attempt = tokio::time::timeout(limit, self.tcp.connect(addr)).await
                .map_err(|_| expired("TCP connect", limit))
                .and_then(|r| r);
            match attempt {
                Ok(stream) => {
                    timer.mark_at(Boundary::ConnectDone, self.clock.now());
                    return Ok((stream, addr));
                }
                Err(e) => {
                    tracing::debug!(%addr, error = %e, "connect attempt failed");
                    last_err = e;
                }
            }
        }
        Err(last_err)
    }
}
