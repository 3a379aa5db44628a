//! Engine endpoint configuration.
//!
//! The endpoint is resolved from, in order: an explicit host, the
//! `DOCKER_HOST` environment variable, the `[engine] host` key of an
//! optional `dockhand.toml`, and finally the default unix socket.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, EngineResult};

pub const DEFAULT_SOCKET: &str = "/var/run/docker.sock";

const HOST_ENV: &str = "DOCKER_HOST";
const TLS_VERIFY_ENV: &str = "DOCKER_TLS_VERIFY";

/// Where the engine listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEndpoint {
    /// A unix domain socket path.
    Unix(PathBuf),
    /// A plain-TCP `host:port`.
    Tcp(String),
}

impl EngineEndpoint {
    /// Parse a `unix://`, `tcp://` or `http://` host string.
    pub fn parse(host: &str) -> EngineResult<Self> {
        let host = host.trim();
        let invalid = |reason: &str| EngineError::InvalidHost {
            host: host.to_string(),
            reason: reason.to_string(),
        };

        if let Some(path) = host.strip_prefix("unix://") {
            if path.is_empty() {
                return Err(invalid("missing socket path"));
            }
            return Ok(Self::Unix(PathBuf::from(path)));
        }

        if host.starts_with("https://") {
            return Err(EngineError::TlsUnsupported(host.to_string()));
        }

        let addr = host
            .strip_prefix("tcp://")
            .or_else(|| host.strip_prefix("http://"))
            .ok_or_else(|| invalid("expected unix://, tcp:// or http:// scheme"))?
            .trim_end_matches('/');

        match addr.rsplit_once(':') {
            Some((name, port)) if !name.is_empty() && port.parse::<u16>().is_ok() => {
                Ok(Self::Tcp(addr.to_string()))
            }
            _ => Err(invalid("expected host:port")),
        }
    }
}

impl Default for EngineEndpoint {
    fn default() -> Self {
        Self::Unix(PathBuf::from(DEFAULT_SOCKET))
    }
}

impl fmt::Display for EngineEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unix(path) => write!(f, "unix://{}", path.display()),
            Self::Tcp(addr) => write!(f, "tcp://{addr}"),
        }
    }
}

/// Contents of `dockhand.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    pub engine: Option<EngineSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineSection {
    pub host: Option<String>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> EngineResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| EngineError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| EngineError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Inputs for locating the engine, as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Explicit host, overriding everything else.
    pub host: Option<String>,
    /// Optional `dockhand.toml` to read `[engine] host` from.
    pub config_file: Option<PathBuf>,
}

impl EngineConfig {
    /// Resolve the endpoint using the process environment.
    pub fn resolve(&self) -> EngineResult<EngineEndpoint> {
        self.resolve_with(|key| std::env::var(key).ok())
    }

    /// Resolve the endpoint using `env` to look up environment variables.
    pub fn resolve_with<F>(&self, env: F) -> EngineResult<EngineEndpoint>
    where
        F: Fn(&str) -> Option<String>,
    {
        if env(TLS_VERIFY_ENV).is_some_and(|v| !v.is_empty() && v != "0") {
            return Err(EngineError::TlsUnsupported(format!("{TLS_VERIFY_ENV} is set")));
        }

        if let Some(host) = &self.host {
            debug!(%host, "engine host from command line");
            return EngineEndpoint::parse(host);
        }

        if let Some(host) = env(HOST_ENV).filter(|h| !h.is_empty()) {
            debug!(%host, "engine host from {HOST_ENV}");
            return EngineEndpoint::parse(&host);
        }

        if let Some(path) = &self.config_file {
            let file = FileConfig::from_file(path)?;
            if let Some(host) = file.engine.and_then(|e| e.host) {
                debug!(%host, config = %path.display(), "engine host from config file");
                return EngineEndpoint::parse(&host);
            }
        }

        Ok(EngineEndpoint::default())
    }
}
