use std::time::{Duration, Instant};

/// A named point in the lifecycle of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    RequestStart,
    DnsStart,
    DnsDone,
    ConnectStart,
    ConnectDone,
    TlsStart,
    TlsDone,
    GotConnection,
    FirstResponseByte,
    RequestEnd,
}

/// Timestamps captured while a single request runs.
///
/// Every slot starts empty and is filled as the matching boundary is
/// crossed. Durations are only derived once, after the request has
/// terminated; a phase whose start or end never fired reads as zero.
#[derive(Debug, Clone, Default)]
pub struct PhaseTimer {
    request_start: Option<Instant>,
    dns_start: Option<Instant>,
    dns_done: Option<Instant>,
    connect_start: Option<Instant>,
    connect_done: Option<Instant>,
    tls_start: Option<Instant>,
    tls_done: Option<Instant>,
    got_connection: Option<Instant>,
    first_response_byte: Option<Instant>,
    request_end: Option<Instant>,
}

impl PhaseTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `at` for `boundary`, replacing an earlier value. Repeated
    /// connect attempts rely on this so only the winning attempt counts.
    pub fn mark_at(&mut self, boundary: Boundary, at: Instant) {
        *self.slot(boundary) = Some(at);
    }

    pub fn get(&self, boundary: Boundary) -> Option<Instant> {
        match boundary {
            Boundary::RequestStart => self.request_start,
            Boundary::DnsStart => self.dns_start,
            Boundary::DnsDone => self.dns_done,
            Boundary::ConnectStart => self.connect_start,
            Boundary::ConnectDone => self.connect_done,
            Boundary::TlsStart => self.tls_start,
            Boundary::TlsDone => self.tls_done,
            Boundary::GotConnection => self.got_connection,
            Boundary::FirstResponseByte => self.first_response_byte,
            Boundary::RequestEnd => self.request_end,
        }
    }

    fn slot(&mut self, boundary: Boundary) -> &mut Option<Instant> {
        match boundary {
            Boundary::RequestStart => &mut self.request_start,
            Boundary::DnsStart => &mut self.dns_start,
            Boundary::DnsDone => &mut self.dns_done,
            Boundary::ConnectStart => &mut self.connect_start,
            Boundary::ConnectDone => &mut self.connect_done,
            Boundary::TlsStart => &mut self.tls_start,
            Boundary::TlsDone => &mut self.tls_done,
            Boundary::GotConnection => &mut self.got_connection,
            Boundary::FirstResponseByte => &mut self.first_response_byte,
            Boundary::RequestEnd => &mut self.request_end,
        }
    }

    fn between(&self, from: Boundary, to: Boundary) -> Duration {
        match (self.get(from), self.get(to)) {
            (Some(a), Some(b)) => b.saturating_duration_since(a),
            _ => Duration::ZERO,
        }
    }

    pub fn durations(&self) -> PhaseDurations {
        PhaseDurations {
            dns_lookup: self.between(Boundary::DnsStart, Boundary::DnsDone),
            connect: self.between(Boundary::ConnectStart, Boundary::ConnectDone),
            tls_handshake: self.between(Boundary::TlsStart, Boundary::TlsDone),
            server_processing: self.between(Boundary::GotConnection, Boundary::FirstResponseByte),
            content_transfer: self.between(Boundary::FirstResponseByte, Boundary::RequestEnd),
            total: self.between(Boundary::RequestStart, Boundary::RequestEnd),
        }
    }
}

/// The six per-phase durations of one request.
///
/// `server_processing` runs from connection readiness to the first
/// response byte, so it also contains request transmission and one network
/// round trip. The phases are independent and need not add up to `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseDurations {
    pub dns_lookup: Duration,
    pub connect: Duration,
    pub tls_handshake: Duration,
    pub server_processing: Duration,
    pub content_transfer: Duration,
    pub total: Duration,
}

/// Human readable duration in the style `12.345ms`, `1.2s` or `850µs`.
pub fn format_duration(d: Duration) -> String {
    let micros = d.as_micros();
    if micros == 0 {
        "0s".to_string()
    } else if micros < 1_000 {
        format!("{}µs", micros)
    } else if micros < 1_000_000 {
        format!("{:.3}ms", d.as_secs_f64() * 1000.0)
    } else {
        format!("{:.3}s", d.as_secs_f64())
    }
}
