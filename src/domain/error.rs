use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    InvalidUrl,
    Dns,
    Tcp,
    Tls,
    Http,
    Timeout,
    Other,
}

impl ErrorClass {
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorClass::InvalidUrl => 2,
            ErrorClass::Dns => 3,
            ErrorClass::Tcp => 4,
            ErrorClass::Tls => 5,
            ErrorClass::Http => 6,
            ErrorClass::Timeout => 7,
            ErrorClass::Other => 1,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            ErrorClass::InvalidUrl => "URL",
            ErrorClass::Dns => "DNS",
            ErrorClass::Tcp => "TCP",
            ErrorClass::Tls => "TLS",
            ErrorClass::Http => "HTTP",
            ErrorClass::Timeout => "TIMEOUT",
            ErrorClass::Other => "ERROR",
        }
    }

    /// Anything that went wrong on the wire rather than in the user's input.
    pub fn is_network(&self) -> bool {
        matches!(self, ErrorClass::Dns | ErrorClass::Tcp | ErrorClass::Tls | ErrorClass::Http | ErrorClass::Timeout)
    }
}

#[derive(Debug, Clone)]
pub struct ResptimeError {
    pub class: ErrorClass,
    pub message: String,
}

impl ResptimeError {
    pub fn new(class: ErrorClass, message: impl Into<String>) -> Self {
        Self { class, message: message.into() }
    }

    pub fn invalid_url(msg: impl Into<String>) -> Self { Self::new(ErrorClass::InvalidUrl, msg) }
    pub fn dns(msg: impl Into<String>) -> Self { Self::new(ErrorClass::Dns, msg) }
    pub fn tcp(msg: impl Into<String>) -> Self { Self::new(ErrorClass::Tcp, msg) }
    pub fn tls(msg: impl Into<String>) -> Self { Self::new(ErrorClass::Tls, msg) }
    pub fn http(msg: impl Into<String>) -> Self { Self::new(ErrorClass::Http, msg) }
    pub fn timeout(msg: impl Into<String>) -> Self { Self::new(ErrorClass::Timeout, msg) }
    pub fn other(msg: impl Into<String>) -> Self { Self::new(ErrorClass::Other, msg) }

    pub fn is_network(&self) -> bool {
        self.class.is_network()
    }

    pub fn format_feedback(&self) -> String {
        format!("error[{}]: {}", self.class.tag(), self.message)
    }
}

impl fmt::Display for ResptimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_feedback())
    }
}

impl std::error::Error for ResptimeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_classes_are_grouped() {
        for class in [ErrorClass::Dns, ErrorClass::Tcp, ErrorClass::Tls, ErrorClass::Http, ErrorClass::Timeout] {
            assert!(class.is_network(), "{:?} should be a network error", class);
        }
        assert!(!ErrorClass::InvalidUrl.is_network());
        assert!(!ErrorClass::Other.is_network());
    }

    #[test]
    fn display_carries_tag_and_cause() {
        let err = ResptimeError::tcp("connection refused: 127.0.0.1:9");
        assert_eq!(err.to_string(), "error[TCP]: connection refused: 127.0.0.1:9");
    }
}
