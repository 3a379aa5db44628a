//! Engine error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while configuring or talking to the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid engine host {host:?}: {reason}")]
    InvalidHost { host: String, reason: String },

    #[error("TLS connections to the engine are not supported: {0}")]
    TlsUnsupported(String),

    #[error("could not stat engine socket {}: {source}", .path.display())]
    SocketMissing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to connect to engine at {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: io::Error,
    },

    #[error("engine HTTP error: {0}")]
    Http(#[from] hyper::Error),

    #[error("failed to build engine request: {0}")]
    Request(#[from] http::Error),

    #[error("engine returned {status}: {message}")]
    Api {
        status: http::StatusCode,
        message: String,
    },

    #[error("engine JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read config file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
