use std::time::{Duration, Instant};

use chrono::Local;
use reqwest::{Client, redirect};
use url::Url;

use super::prelude::*;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const MAX_REDIRECTS: usize = 10;

/// Settings shared by every request a [`Prober`] sends.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeSettings {
    pub timeout: Duration,
    pub user_agent: String,

    /// Skips TLS certificate verification. Insecure, off by default.
    pub accept_invalid_certs: bool,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        ProbeSettings {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_invalid_certs: false,
        }
    }
}

/// Issues single timed GET requests and turns the responses into [`CheckResult`]s.
///
/// The underlying client is built once and reused for every check.
#[derive(Debug, Clone)]
pub struct Prober {
    client: Client,
    timeout: Duration,
}

impl Prober {
    pub fn new(settings: &ProbeSettings) -> Result<Self, ProbeError> {
        if settings.accept_invalid_certs {
            log::warn!("TLS certificate verification is disabled, probe results do not prove a trusted connection");
        }

        let client = Client::builder()
            .timeout(settings.timeout)
            .danger_accept_invalid_certs(settings.accept_invalid_certs)
            .user_agent(settings.user_agent.as_str())
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(ProbeError::ClientBuild)?;

        Ok(Prober {
            client,
            timeout: settings.timeout,
        })
    }

    /// Checks `url` using the configured timeout.
    pub async fn check(&self, url: &str) -> Result<CheckResult, ProbeError> {
        self.check_with_timeout(url, self.timeout).await
    }

    /// Sends one GET to `url` and records the final status after redirects.
    ///
    /// The measured time covers sending the request until the response head
    /// arrives; the body is not read. Errors are returned as-is, never retried.
    pub async fn check_with_timeout(&self, url: &str, timeout: Duration) -> Result<CheckResult, ProbeError> {
        let target = Url::parse(url).map_err(|source| ProbeError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        let captured_at = Local::now();

        log::debug!("Checking connection to {url}");
        let start = Instant::now();
        let response = self
            .client
            .get(target)
            .timeout(timeout)
            .send()
            .await
            .map_err(|source| ProbeError::Request {
                url: url.to_string(),
                source,
            })?;
        let elapsed = start.elapsed().as_secs_f64();

        let status = response.status().as_u16();
        log::info!("Connection check complete. Status: {status}");
        if response.url().as_str() != url {
            log::debug!("{url} was redirected to {}", response.url());
        }

        Ok(CheckResult::new(url, status, elapsed, captured_at))
    }
}
