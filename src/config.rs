use std::path::PathBuf;
use std::time::Duration;

use crate::error::ClientError;

/// Endpoint used in development mode when no URL is configured: the local
/// dev proxy that forwards to the remote service.
pub const DEV_ENDPOINT: &str = "http://localhost:5173/mcp";

pub const ENV_ENDPOINT: &str = "SWISSTOUR_MCP_URL";
pub const ENV_DEV:      &str = "SWISSTOUR_DEV";
pub const ENV_TIMEOUT:  &str = "SWISSTOUR_TIMEOUT_SECS";
pub const ENV_PREFS:    &str = "SWISSTOUR_PREFS";

const DEFAULT_INIT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint:        String,
    pub client_name:     String,
    pub client_version:  String,
    /// Per-request timeout applied by the HTTP client. `None` waits forever.
    pub request_timeout: Option<Duration>,
    /// Bound for the initialize handshake at startup.
    pub init_timeout:    Duration,
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint:        endpoint.into(),
            client_name:     env!("CARGO_PKG_NAME").to_string(),
            client_version:  env!("CARGO_PKG_VERSION").to_string(),
            request_timeout: None,
            init_timeout:    DEFAULT_INIT_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout); self
    }

    pub fn with_init_timeout(mut self, timeout: Duration) -> Self {
        self.init_timeout = timeout; self
    }

    /// Resolve the endpoint: an explicit URL always wins, development mode
    /// falls back to the local proxy, anything else is a configuration error.
    pub fn resolve(endpoint: Option<String>, development: bool) -> Result<Self, ClientError> {
        match endpoint.filter(|e| !e.trim().is_empty()) {
            Some(url) => Ok(Self::new(url)),
            None if development => Ok(Self::new(DEV_ENDPOINT)),
            None => Err(ClientError::Config(format!(
                "{} is not set and development mode is off",
                ENV_ENDPOINT
            ))),
        }
    }

    /// Reads `SWISSTOUR_MCP_URL`, `SWISSTOUR_DEV` and `SWISSTOUR_TIMEOUT_SECS`.
    /// Debug builds count as development mode.
    pub fn from_env() -> Result<Self, ClientError> {
        let development = cfg!(debug_assertions)
            || std::env::var(ENV_DEV).map(|v| is_truthy(&v)).unwrap_or(false);

        let mut config = Self::resolve(std::env::var(ENV_ENDPOINT).ok(), development)?;

        if let Ok(raw) = std::env::var(ENV_TIMEOUT) {
            config.request_timeout = Some(parse_timeout_secs(&raw)?);
        }

        tracing::debug!(endpoint = %config.endpoint, development, "resolved client config");
        Ok(config)
    }
}

/// Location of the preferences file: `SWISSTOUR_PREFS` or
/// `.swisstour.json` in the working directory.
pub fn preferences_path() -> PathBuf {
    std::env::var(ENV_PREFS)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(".swisstour.json"))
}

/// Parse a request timeout given in whole seconds. Zero would fail every
/// request immediately, so it is rejected.
pub fn parse_timeout_secs(raw: &str) -> Result<Duration, ClientError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ClientError::Config(format!("{} must be at least 1 second", ENV_TIMEOUT))),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(_) => Err(ClientError::Config(format!(
            "{} must be a whole number of seconds, got '{}'",
            ENV_TIMEOUT, raw
        ))),
    }
}

fn is_truthy(v: &str) -> bool {
    matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_endpoint_wins_over_dev_mode() {
        let c = ClientConfig::resolve(Some("https://example.ch/mcp".into()), true).unwrap();
        assert_eq!(c.endpoint, "https://example.ch/mcp");
    }

    #[test]
    fn dev_mode_defaults_to_proxy() {
        let c = ClientConfig::resolve(None, true).unwrap();
        assert_eq!(c.endpoint, DEV_ENDPOINT);
    }

    #[test]
    fn blank_endpoint_outside_dev_mode_is_an_error() {
        let err = ClientConfig::resolve(Some("  ".into()), false).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn timeout_parsing() {
        assert_eq!(parse_timeout_secs(" 30 ").unwrap(), Duration::from_secs(30));
        assert!(matches!(parse_timeout_secs("0"), Err(ClientError::Config(_))));
        assert!(matches!(parse_timeout_secs("soon"), Err(ClientError::Config(_))));
    }

    #[test]
    fn truthy_values() {
        assert!(is_truthy("1"));
        assert!(is_truthy("TRUE"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy(""));
    }
}
