#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Informational,
    Success,
    Redirect,
    ClientError,
    ServerError,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSummary {
    pub status: u16,
    pub reason: Option<String>,
    pub version: String,
}

impl HttpSummary {
    pub fn new(status: u16, reason: Option<String>, version: String) -> Self {
        Self { status, reason, version }
    }

    pub fn status_line(&self) -> String {
        match &self.reason {
            Some(r) if !r.is_empty() => format!("{} {}", self.status, r),
            _ => self.status.to_string(),
        }
    }

    pub fn class(&self) -> StatusClass {
        match self.status {
            100..=199 => StatusClass::Informational,
            200..=299 => StatusClass::Success,
            300..=399 => StatusClass::Redirect,
            400..=499 => StatusClass::ClientError,
            500..=599 => StatusClass::ServerError,
            _ => StatusClass::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_with_and_without_reason() {
        let ok = HttpSummary::new(200, Some("OK".into()), "http/1.1".into());
        assert_eq!(ok.status_line(), "200 OK");
        let bare = HttpSummary::new(204, None, "h2".into());
        assert_eq!(bare.status_line(), "204");
    }

    #[test]
    fn classifies_by_hundreds() {
        assert_eq!(HttpSummary::new(301, None, String::new()).class(), StatusClass::Redirect);
        assert_eq!(HttpSummary::new(404, None, String::new()).class(), StatusClass::ClientError);
        assert_eq!(HttpSummary::new(503, None, String::new()).class(), StatusClass::ServerError);
    }
}
