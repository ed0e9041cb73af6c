use std::net::IpAddr;
use url::{Host, Url};
use crate::domain::ResptimeError;

/// Turns user input into an absolute http(s) URL.
///
/// Input without an `http://` or `https://` prefix gets `https://` prepended.
/// The result must parse and carry a host. Apart from trimming surrounding
/// whitespace the text is kept as typed: no trailing slash, no punycode, no
/// query rewriting. The returned value is what the request pipeline runs on.
pub fn normalize(raw: &str) -> Result<ParsedUrl, ResptimeError> {
    let trimmed = raw.trim();
    let candidate = if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    ParsedUrl::parse(&candidate)
        .map_err(|e| ResptimeError::invalid_url(format!("invalid url '{}': {}", trimmed, e.message)))
}

fn has_http_scheme(s: &str) -> bool {
    let lower = s.get(..8).unwrap_or(s).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// A normalized URL split into the pieces the request pipeline needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    text: String,
    pub scheme: String,
    /// Host without IPv6 brackets, used for DNS and SNI.
    pub host: String,
    /// Set when the host is an IP literal and no lookup is needed.
    pub literal_ip: Option<IpAddr>,
    pub port: u16,
    /// `host[:port]` as sent in the Host header / `:authority`.
    pub authority: String,
    pub path_and_query: String,
}

impl ParsedUrl {
    pub fn parse(input: &str) -> Result<Self, ResptimeError> {
        let url = Url::parse(input).map_err(|e| ResptimeError::invalid_url(e.to_string()))?;

        let scheme = url.scheme().to_string();
        if scheme != "http" && scheme != "https" {
            return Err(ResptimeError::invalid_url(format!("unsupported scheme '{}', expected http or https", scheme)));
        }

        let (host, literal_ip) = match url.host() {
            Some(Host::Domain(d)) => (d.to_string(), None),
            Some(Host::Ipv4(v4)) => (v4.to_string(), Some(IpAddr::V4(v4))),
            Some(Host::Ipv6(v6)) => (v6.to_string(), Some(IpAddr::V6(v6))),
            None => return Err(ResptimeError::invalid_url("missing host")),
        };
        if host.is_empty() {
            return Err(ResptimeError::invalid_url("missing host"));
        }
        let port = url.port_or_known_default().unwrap_or(if scheme == "https" { 443 } else { 80 });

        let host_str = url.host_str().unwrap_or(&host).to_string();
        let authority = match url.port() {
            Some(p) => format!("{}:{}", host_str, p),
            None => host_str,
        };

        let path_and_query = match url.query() {
            Some(q) => format!("{}?{}", url.path(), q),
            None => url.path().to_string(),
        };
        let path_and_query = if path_and_query.is_empty() { "/".to_string() } else { path_and_query };

        Ok(Self { text: input.to_string(), scheme, host, literal_ip, port, authority, path_and_query })
    }

    /// The URL text as it was given, without re-serialization.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_https(&self) -> bool {
        self.scheme == "https"
    }
}

impl std::fmt::Display for ParsedUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorClass;

    #[test]
    fn prepends_https_when_scheme_missing() {
        assert_eq!(normalize("example.com").unwrap().as_str(), "https://example.com");
        assert_eq!(normalize("google.com").unwrap().as_str(), "https://google.com");
    }

    #[test]
    fn keeps_explicit_scheme_untouched() {
        assert_eq!(normalize("http://example.com").unwrap().as_str(), "http://example.com");
        assert_eq!(normalize("HTTPS://Example.com/a?b=c").unwrap().as_str(), "HTTPS://Example.com/a?b=c");
    }

    #[test]
    fn host_starting_with_http_still_gets_scheme() {
        assert_eq!(normalize("httpbin.org/get").unwrap().as_str(), "https://httpbin.org/get");
    }

    #[test]
    fn rejects_empty_and_hostless_input() {
        for raw in ["", "   ", "http://", "https://"] {
            let err = normalize(raw).unwrap_err();
            assert_eq!(err.class, ErrorClass::InvalidUrl, "input {:?}", raw);
        }
    }

    #[test]
    fn rejects_text_with_spaces() {
        let err = normalize("not a url").unwrap_err();
        assert_eq!(err.class, ErrorClass::InvalidUrl);
    }

    #[test]
    fn parsed_url_defaults_port_and_path() {
        let p = ParsedUrl::parse("https://example.com").unwrap();
        assert_eq!(p.port, 443);
        assert_eq!(p.path_and_query, "/");
        assert_eq!(p.authority, "example.com");
        assert!(p.literal_ip.is_none());
        assert!(p.is_https());
    }

    #[test]
    fn parsed_url_ip_literals() {
        let p = ParsedUrl::parse("http://127.0.0.1:8080/x?y=1").unwrap();
        assert_eq!(p.literal_ip, Some("127.0.0.1".parse().unwrap()));
        assert_eq!(p.authority, "127.0.0.1:8080");
        assert_eq!(p.path_and_query, "/x?y=1");

        let v6 = ParsedUrl::parse("http://[::1]:9000/").unwrap();
        assert_eq!(v6.host, "::1");
        assert_eq!(v6.authority, "[::1]:9000");
    }

    #[test]
    fn normalized_value_is_ready_for_the_pipeline() {
        let p = normalize("  127.0.0.1:8443/health  ").unwrap();
        assert_eq!(p.as_str(), "https://127.0.0.1:8443/health");
        assert!(p.is_https());
        assert_eq!(p.port, 8443);
        assert_eq!(p.path_and_query, "/health");
        assert_eq!(p.literal_ip, Some("127.0.0.1".parse().unwrap()));
    }

    #[test]
    fn scheme_is_case_insensitive_but_kept_as_typed() {
        let p = normalize("HTTP://Example.com").unwrap();
        assert_eq!(p.as_str(), "HTTP://Example.com");
        assert!(!p.is_https());
        assert_eq!(p.host, "example.com");
    }

    #[test]
    fn parse_rejects_non_http_scheme() {
        let err = ParsedUrl::parse("ftp://example.com").unwrap_err();
        assert_eq!(err.class, ErrorClass::InvalidUrl);
    }
}
