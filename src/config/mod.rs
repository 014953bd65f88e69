pub mod app_config;
pub mod model;

use std::path::PathBuf;

use thiserror::Error;

pub use app_config::{AppConfig, load_config};
pub use model::{LogLevel, RunMode};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file {path:?}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file {path:?}")]
    InvalidYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("TARGET_URL {url:?} is not a valid URL")]
    InvalidTargetUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("listen address {value:?} is not a valid socket address")]
    InvalidListenAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("timeout must be at least one second")]
    InvalidTimeout,

    #[error("unknown log level {0:?}")]
    InvalidLogLevel(String),
}
