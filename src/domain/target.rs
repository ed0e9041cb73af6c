use std::net::{IpAddr, SocketAddr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpFamily {
    IPv4,
    IPv6,
}

impl IpFamily {
    pub fn of(addr: &SocketAddr) -> Self {
        match addr.ip() {
            IpAddr::V4(_) => IpFamily::IPv4,
            IpAddr::V6(_) => IpFamily::IPv6,
        }
    }
}

impl std::fmt::Display for IpFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IpFamily::IPv4 => write!(f, "ipv4"),
            IpFamily::IPv6 => write!(f, "ipv6"),
        }
    }
}

/// Addresses a host name resolved to, in resolver order.
///
/// `addresses` stays empty when the URL carried a literal IP and no lookup
/// happened; `literal` then holds that IP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub addresses: Vec<IpAddr>,
    pub literal: Option<IpAddr>,
    pub port: u16,
}

impl ResolvedTarget {
    pub fn resolved(addresses: Vec<IpAddr>, port: u16) -> Self {
        Self { addresses, literal: None, port }
    }

    pub fn literal(ip: IpAddr, port: u16) -> Self {
        Self { addresses: Vec::new(), literal: Some(ip), port }
    }

    /// Socket addresses to try, in order.
    pub fn candidates(&self) -> Vec<SocketAddr> {
        match self.literal {
            Some(ip) => vec![SocketAddr::new(ip, self.port)],
            None => self.addresses.iter().map(|ip| SocketAddr::new(*ip, self.port)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_target_has_no_resolved_addresses() {
        let ip: IpAddr = "127.0.0.1".parse().unwrap();
        let target = ResolvedTarget::literal(ip, 8080);
        assert!(target.addresses.is_empty());
        assert_eq!(target.candidates(), vec![SocketAddr::new(ip, 8080)]);
    }

    #[test]
    fn candidates_keep_resolver_order() {
        let a: IpAddr = "2001:db8::1".parse().unwrap();
        let b: IpAddr = "192.0.2.7".parse().unwrap();
        let target = ResolvedTarget::resolved(vec![a, b], 443);
        let c = target.candidates();
        assert_eq!(c[0].to_string(), "[2001:db8::1]:443");
        assert_eq!(c[1].to_string(), "192.0.2.7:443");
        assert_eq!(IpFamily::of(&c[0]), IpFamily::IPv6);
    }
}
