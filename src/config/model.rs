use std::net::SocketAddr;
use std::str::FromStr;

use serde::Deserialize;

use super::ConfigError;

/// URLs checked by the text run and the dashboard when no `TARGET_URL` is given.
pub const DEFAULT_TARGETS: [&str; 2] = [
    "https://www2.nphs.wales.nhs.uk/WHAIPDocs.nsf",
    "https://www.nhfd.co.uk/20/nhfdcharts.nsf/vwCharts/Mortality",
];

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:5000";

/// Optional settings file. Every field falls back to its default when absent;
/// the list of targets is deliberately not configurable here.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Address the dashboard listens on.
    pub listen_addr: Option<String>,

    /// Per-request timeout in seconds. Defaults to 10.
    pub timeout_seconds: Option<u64>,

    /// User agent sent with every probe.
    pub user_agent: Option<String>,

    /// Disables TLS certificate verification. Defaults to false.
    pub accept_invalid_certs: Option<bool>,

    pub log_level: Option<LogLevel>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(LogLevel::Off),
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

/// What the process does, decided once at startup.
#[derive(Debug, Clone, PartialEq)]
pub enum RunMode {
    /// Check one URL from `TARGET_URL` on the console and exit.
    Single { url: String },

    /// Check the default URLs on the console and exit.
    Text { urls: Vec<String> },

    /// Serve the dashboard, re-checking `urls` on every page load.
    Dashboard { listen_addr: SocketAddr, urls: Vec<String> },
}

impl RunMode {
    pub fn urls(&self) -> Vec<&str> {
        match self {
            RunMode::Single { url } => vec![url.as_str()],
            RunMode::Text { urls } | RunMode::Dashboard { urls, .. } => {
                urls.iter().map(String::as_str).collect()
            }
        }
    }
}

pub fn default_targets() -> Vec<String> {
    DEFAULT_TARGETS.iter().map(|url| url.to_string()).collect()
}
