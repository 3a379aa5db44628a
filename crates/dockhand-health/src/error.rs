//! Health polling error types.

use std::time::Duration;

use thiserror::Error;

/// Errors produced while probing a target.
///
/// `Transport`, `UnexpectedStatus` and `RequestTimeout` describe a single
/// failed probe; the poller logs them and retries. `InvalidTarget` and
/// `Tls` surface at construction, `DeadlineExceeded` at the end of a wait.
#[derive(Debug, Error)]
pub enum HealthError {
    #[error("invalid target {url:?}: {reason}")]
    InvalidTarget { url: String, reason: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected status code: {0}")]
    UnexpectedStatus(http::StatusCode),

    #[error("request timed out after {0:?}")]
    RequestTimeout(Duration),

    #[error("{url} did not become healthy within {after:?}")]
    DeadlineExceeded { url: String, after: Duration },

    #[error("probe task ended without reporting a result")]
    ProbeTaskFailed,

    #[error("TLS client setup failed: {0}")]
    Tls(#[from] rustls::Error),
}

pub type HealthResult<T> = Result<T, HealthError>;

/// Render an error with its full `source()` chain, e.g.
/// `client error (Connect): tcp connect error: Connection refused`.
pub(crate) fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
