#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsSummary {
    pub version: String,
    pub alpn: Option<String>,
    pub cipher: String,
}

impl TlsSummary {
    pub fn new(version: String, alpn: Option<String>, cipher: String) -> Self {
        Self { version, alpn, cipher }
    }

    pub fn is_h2(&self) -> bool {
        self.alpn.as_deref() == Some("h2")
    }
}
