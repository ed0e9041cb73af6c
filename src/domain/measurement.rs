use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use chrono::{DateTime, Local};
use super::{HttpSummary, PhaseDurations, TlsSummary};

/// Result of one completed request. Built once by the measurement use case
/// and never modified afterwards.
#[derive(Debug, Clone)]
pub struct Measurement {
    pub id: u32,
    pub url: String,
    pub resolved_addresses: Vec<IpAddr>,
    pub connection_address: SocketAddr,
    pub http: HttpSummary,
    pub tls: Option<TlsSummary>,
    pub location: Option<String>,
    pub body_bytes: u64,
    pub timings: PhaseDurations,
    pub measured_at: DateTime<Local>,
}

impl Measurement {
    pub fn status_line(&self) -> String {
        self.http.status_line()
    }

    /// Name of the phase that took longest, or `None` when everything was fast.
    pub fn slowest_phase(&self) -> Option<&'static str> {
        let t = &self.timings;
        let phases = [
            ("dns", t.dns_lookup),
            ("tcp", t.connect),
            ("tls", t.tls_handshake),
            ("server", t.server_processing),
            ("transfer", t.content_transfer),
        ];
        let (name, longest) = phases.iter().copied().max_by_key(|(_, d)| *d)?;
        if longest < Duration::from_millis(10) {
            return None;
        }
        Some(name)
    }
}

#[cfg(test)]
pub(crate) fn sample(id: u32, url: &str) -> Measurement {
    Measurement {
        id,
        url: url.to_string(),
        resolved_addresses: vec!["192.0.2.1".parse().unwrap()],
        connection_address: "192.0.2.1:443".parse().unwrap(),
        http: HttpSummary::new(200, Some("OK".into()), "http/1.1".into()),
        tls: None,
        location: None,
        body_bytes: 0,
        timings: PhaseDurations::default(),
        measured_at: Local::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slowest_phase_ignores_fast_requests() {
        let m = sample(1, "https://example.com");
        assert_eq!(m.slowest_phase(), None);
    }

    #[test]
    fn slowest_phase_picks_longest() {
        let mut m = sample(1, "https://example.com");
        m.timings.tls_handshake = Duration::from_millis(80);
        m.timings.server_processing = Duration::from_millis(120);
        assert_eq!(m.slowest_phase(), Some("server"));
    }
}
