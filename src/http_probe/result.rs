use std::fmt;

use chrono::{DateTime, Local};

use super::{ProbeError, report};

/// Format of the capture time, second resolution.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H%M%S";

/// The outcome of the HTTP exchange: either a status code, or the sentinel used
/// when no response was obtained at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    Code(u16),
    Error,
}

impl ProbeStatus {
    /// A probe counts as successful for any 2xx or 3xx status.
    pub fn is_successful(self) -> bool {
        match self {
            ProbeStatus::Code(code) => (200..400).contains(&code),
            ProbeStatus::Error => false,
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeStatus::Code(code) => write!(f, "{code}"),
            ProbeStatus::Error => f.write_str("Error"),
        }
    }
}

/// The result of a single connection check.
///
/// Fields are read-only once constructed; `successful` is always derived from
/// `status` so the two can never disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    url: String,
    status: ProbeStatus,
    successful: bool,
    response_time: f64,
    timestamp: String,
    content: String,
    error: Option<String>,
}

impl CheckResult {
    /// Builds the result for a probe that received a response.
    /// Negative or non-finite response times are clamped to zero.
    pub fn new(url: &str, status_code: u16, response_time: f64, captured_at: DateTime<Local>) -> Self {
        let response_time = if response_time.is_finite() && response_time > 0.0 {
            response_time
        } else {
            0.0
        };
        Self::build(url, ProbeStatus::Code(status_code), response_time, captured_at, None)
    }

    /// Builds the synthetic record that stands in for a probe that failed
    /// before any response arrived.
    pub fn failed(url: &str, error: &ProbeError, captured_at: DateTime<Local>) -> Self {
        Self::build(url, ProbeStatus::Error, 0.0, captured_at, Some(report(error)))
    }

    fn build(
        url: &str,
        status: ProbeStatus,
        response_time: f64,
        captured_at: DateTime<Local>,
        error: Option<String>,
    ) -> Self {
        let timestamp = captured_at.format(TIMESTAMP_FORMAT).to_string();
        let successful = status.is_successful();

        let mut content = format!(
            "--- Connection Check Result ---\n\
             URL: {url}\n\
             Timestamp: {timestamp}\n\
             HTTP Status Code: {status}\n\
             Connection Successful: {successful}\n\
             Response Time (s): {response_time:.3}\n"
        );
        if let Some(message) = &error {
            content.push_str(&format!("Error: {message}\n"));
        }

        CheckResult {
            url: url.to_string(),
            status,
            successful,
            response_time,
            timestamp,
            content,
            error,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> ProbeStatus {
        self.status
    }

    pub fn successful(&self) -> bool {
        self.successful
    }

    /// Seconds until the response head arrived.
    pub fn response_time(&self) -> f64 {
        self.response_time
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Multi-line human readable summary.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
