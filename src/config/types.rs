use super::{ConfigResult, ConfigValidator};
use std::time::Duration;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_UPSTREAM_URL: &str = "http://127.0.0.1:11434";
pub const DEFAULT_MAX_PAYLOAD_SIZE: usize = 256 * 1024;

/// Everything the relay needs to start. Immutable once the server is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Address to bind the HTTP server to
    pub host: String,
    pub port: u16,
    /// Base URL of the inference engine, without the `/api/generate` suffix
    pub upstream_url: String,
    /// Whole-request timeout for the upstream call. `None` waits indefinitely.
    pub request_timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
    /// Largest inbound request body accepted, in bytes
    pub max_payload_size: usize,
    /// actix worker count; `None` uses one per physical core
    pub workers: Option<usize>,
    pub log_level: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            request_timeout_secs: None,
            connect_timeout_secs: None,
            max_payload_size: DEFAULT_MAX_PAYLOAD_SIZE,
            workers: None,
            log_level: "info".to_string(),
        }
    }
}

impl RelayConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        ConfigValidator::validate(self)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
