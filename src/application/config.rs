use std::path::PathBuf;
use std::time::Duration;

/// Runtime settings, read from the environment. There are no command-line
/// flags.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bound on each connection-establishment step: DNS, TCP connect, TLS.
    pub connect_timeout: Duration,
    /// Bound on the HTTP exchange once the connection is ready.
    pub response_timeout: Duration,
    pub log_file: PathBuf,
    pub tick_rate: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            connect_timeout: parse_duration(lookup("RESPTIME_TIMEOUT"), Duration::from_secs(10)),
            response_timeout: parse_duration(lookup("RESPTIME_RESPONSE_TIMEOUT"), Duration::from_secs(30)),
            log_file: lookup("RESPTIME_LOG_FILE")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("debug.log")),
            tick_rate: parse_duration(lookup("RESPTIME_TICK"), Duration::from_millis(250)),
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_duration(value: Option<String>, default: Duration) -> Duration {
    value.and_then(|v| {
        let v = v.trim();
        if let Some(s) = v.strip_suffix("ms") {
            s.trim().parse::<u64>().ok().map(Duration::from_millis)
        } else if let Some(s) = v.strip_suffix('s') {
            s.trim().parse::<u64>().ok().map(Duration::from_secs)
        } else {
            v.parse::<u64>().ok().map(Duration::from_secs)
        }
    })
    .filter(|d| !d.is_zero())
    .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(pairs: &[(&str, &str)]) -> Config {
        let env: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let c = Config::default();
        assert_eq!(c.connect_timeout, Duration::from_secs(10));
        assert_eq!(c.response_timeout, Duration::from_secs(30));
        assert_eq!(c.log_file, PathBuf::from("debug.log"));
        assert_eq!(c.tick_rate, Duration::from_millis(250));
    }

    #[test]
    fn duration_suffixes() {
        let c = config_with(&[("RESPTIME_TIMEOUT", "1500ms"), ("RESPTIME_RESPONSE_TIMEOUT", "3s"), ("RESPTIME_TICK", "2")]);
        assert_eq!(c.connect_timeout, Duration::from_millis(1500));
        assert_eq!(c.response_timeout, Duration::from_secs(3));
        assert_eq!(c.tick_rate, Duration::from_secs(2));
    }

    #[test]
    fn garbage_and_zero_fall_back() {
        let c = config_with(&[("RESPTIME_TIMEOUT", "soon"), ("RESPTIME_TICK", "0ms"), ("RESPTIME_LOG_FILE", "  ")]);
        assert_eq!(c.connect_timeout, Duration::from_secs(10));
        assert_eq!(c.tick_rate, Duration::from_millis(250));
        assert_eq!(c.log_file, PathBuf::from("debug.log"));
    }
}
