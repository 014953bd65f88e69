pub mod probe;
pub mod result;

use std::fmt::Write;

use thiserror::Error;

pub mod prelude {
    pub use super::ProbeError;
    pub use super::probe::{ProbeSettings, Prober};
    pub use super::result::{CheckResult, ProbeStatus};
}

/// Errors raised by a probe before any HTTP response was received.
///
/// DNS failures, refused connections, timeouts and TLS errors all surface as
/// [`ProbeError::Request`]; the cause is kept in the source chain only.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to build the HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("invalid URL {url:?}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Renders an error together with its whole source chain.
pub fn report(mut err: &(dyn std::error::Error + 'static)) -> String {
    let mut s = format!("{}", err);
    while let Some(src) = err.source() {
        let _ = write!(s, ": {}", src);
        err = src;
    }
    s
}
