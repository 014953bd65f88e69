use std::env;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use url::Url;

use super::ConfigError;
use super::model::{DEFAULT_LISTEN_ADDR, LogLevel, RunMode, Settings, default_targets};
use crate::http_probe::probe::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, ProbeSettings};

pub struct AppConfig {
    pub mode: RunMode,
    pub probe: ProbeSettings,
    pub log_level: LogLevel,
}

/// Load the application configuration from the process environment.
/// See [`AppConfig::from_lookup`] for the variables that are read.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_lookup(|key| env::var(key).ok())
}

impl AppConfig {
    /// Builds the configuration from a variable lookup.
    ///
    /// `CONFIG_FILE` names an optional YAML settings file. `TARGET_URL`,
    /// `FLASK_MODE`, `LISTEN_ADDR`, `ACCEPT_INVALID_CERTS` and `LOG_LEVEL` are
    /// read from the lookup and take precedence over the file.
    pub fn from_lookup<F>(lookup: F) -> Result<AppConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let settings = match lookup("CONFIG_FILE") {
            Some(path) => read_settings(Path::new(&path))?,
            None => Settings::default(),
        };

        let target_url = lookup("TARGET_URL").filter(|url| !url.trim().is_empty());
        let dashboard = lookup("FLASK_MODE").is_none_or(|value| is_truthy(&value));

        let mode = match target_url {
            Some(url) => {
                let url = url.trim().to_string();
                Url::parse(&url).map_err(|source| ConfigError::InvalidTargetUrl {
                    url: url.clone(),
                    source,
                })?;
                RunMode::Single { url }
            }
            None if dashboard => {
                let listen_addr = lookup("LISTEN_ADDR")
                    .or_else(|| settings.listen_addr.clone())
                    .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
                RunMode::Dashboard {
                    listen_addr: parse_listen_addr(&listen_addr)?,
                    urls: default_targets(),
                }
            }
            None => RunMode::Text {
                urls: default_targets(),
            },
        };

        let timeout = match settings.timeout_seconds {
            Some(0) => return Err(ConfigError::InvalidTimeout),
            Some(seconds) => Duration::from_secs(seconds),
            None => DEFAULT_TIMEOUT,
        };

        let accept_invalid_certs = match lookup("ACCEPT_INVALID_CERTS") {
            Some(value) => is_truthy(&value),
            None => settings.accept_invalid_certs.unwrap_or(false),
        };

        let log_level = match lookup("LOG_LEVEL") {
            Some(value) => value.parse()?,
            None => settings.log_level.unwrap_or_default(),
        };

        Ok(AppConfig {
            mode,
            probe: ProbeSettings {
                timeout,
                user_agent: settings
                    .user_agent
                    .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
                accept_invalid_certs,
            },
            log_level,
        })
    }
}

fn read_settings(path: &Path) -> Result<Settings, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    // An empty file deserializes to unit, treat it as "no settings".
    if contents.trim().is_empty() {
        return Ok(Settings::default());
    }

    serde_yaml::from_str(&contents).map_err(|source| ConfigError::InvalidYaml {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_listen_addr(value: &str) -> Result<SocketAddr, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|source| ConfigError::InvalidListenAddr {
            value: value.to_string(),
            source,
        })
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use super::*;
    use crate::config::model::DEFAULT_TARGETS;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    fn settings_file(name: &str, contents: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("linkprobe-{}-{name}.yml", std::process::id()));
        std::fs::write(&path, contents).expect("should write settings file");
        path
    }

    #[test]
    fn test_defaults_to_dashboard() {
        let config = config_from(&[]).expect("defaults are valid");

        assert_eq!(
            config.mode,
            RunMode::Dashboard {
                listen_addr: DEFAULT_LISTEN_ADDR.parse().expect("valid default"),
                urls: default_targets(),
            }
        );
        assert_eq!(config.probe, ProbeSettings::default());
        assert!(!config.probe.accept_invalid_certs);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_flask_mode_false_runs_text_check_of_defaults() {
        let config = config_from(&[("FLASK_MODE", "False")]).expect("valid config");

        assert_eq!(config.mode.urls(), DEFAULT_TARGETS.to_vec());
        assert!(matches!(config.mode, RunMode::Text { .. }));
    }

    #[test]
    fn test_target_url_wins_over_dashboard() {
        let config = config_from(&[
            ("TARGET_URL", "https://example.com"),
            ("FLASK_MODE", "true"),
        ])
        .expect("valid config");

        assert_eq!(
            config.mode,
            RunMode::Single {
                url: "https://example.com".to_string()
            }
        );
    }

    #[test]
    fn test_empty_target_url_is_ignored() {
        let config = config_from(&[("TARGET_URL", "  "), ("FLASK_MODE", "0")]).expect("valid config");

        assert!(matches!(config.mode, RunMode::Text { .. }));
    }

    #[test]
    fn test_invalid_target_url_is_rejected() {
        let result = config_from(&[("TARGET_URL", "example dot com")]);

        assert!(matches!(result, Err(ConfigError::InvalidTargetUrl { .. })));
    }

    #[test]
    fn test_invalid_listen_addr_only_matters_for_dashboard() {
        let result = config_from(&[("LISTEN_ADDR", "localhost")]);
        assert!(matches!(result, Err(ConfigError::InvalidListenAddr { .. })));

        let result = config_from(&[("LISTEN_ADDR", "localhost"), ("FLASK_MODE", "false")]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_environment_overrides_settings_file() {
        let path = settings_file(
            "override",
            "listen_addr: 0.0.0.0:8080\ntimeout_seconds: 3\naccept_invalid_certs: true\nlog_level: debug\nuser_agent: probe/1.0\n",
        );
        let path_str = path.to_string_lossy().to_string();

        let config = config_from(&[
            ("CONFIG_FILE", path_str.as_str()),
            ("LISTEN_ADDR", "127.0.0.1:9000"),
            ("ACCEPT_INVALID_CERTS", "no"),
        ])
        .expect("valid config");
        let _ = std::fs::remove_file(&path);

        assert!(matches!(
            config.mode,
            RunMode::Dashboard { listen_addr, .. } if listen_addr.port() == 9000
        ));
        assert_eq!(config.probe.timeout, Duration::from_secs(3));
        assert_eq!(config.probe.user_agent, "probe/1.0");
        assert!(!config.probe.accept_invalid_certs);
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let path = settings_file("zero-timeout", "timeout_seconds: 0\n");
        let path_str = path.to_string_lossy().to_string();

        let result = config_from(&[("CONFIG_FILE", path_str.as_str())]);
        let _ = std::fs::remove_file(&path);

        assert!(matches!(result, Err(ConfigError::InvalidTimeout)));
    }

    #[test]
    fn test_missing_settings_file_is_an_error() {
        let result = config_from(&[("CONFIG_FILE", "/nonexistent/linkprobe.yml")]);

        assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
    }

    #[test]
    fn test_invalid_log_level_is_rejected() {
        let result = config_from(&[("LOG_LEVEL", "chatty")]);

        assert!(matches!(result, Err(ConfigError::InvalidLogLevel(_))));
    }
}
