//! Health probe logic.
//!
//! A probe issues one GET against the target and classifies the answer:
//! exactly `200 OK` is healthy, everything else (other status codes,
//! connection errors, timeouts) is unhealthy.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::{header, StatusCode, Uri};
use http_body_util::Empty;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use rustls::{ClientConfig, RootCertStore};
use tracing::debug;

use crate::error::{error_chain, HealthError};

const USER_AGENT: &str = concat!("dockhand/", env!("CARGO_PKG_VERSION"));

/// An absolute URL to probe, validated once up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    uri: Uri,
}

impl Target {
    /// Parse and validate a target URL.
    ///
    /// The URL must be an absolute `http://` or `https://` URL with a host.
    pub fn parse(url: &str) -> Result<Self, HealthError> {
        let uri: Uri = url.trim().parse().map_err(|e: http::uri::InvalidUri| {
            HealthError::InvalidTarget {
                url: url.to_string(),
                reason: e.to_string(),
            }
        })?;

        if uri.scheme().is_none() || uri.authority().is_none() {
            return Err(HealthError::InvalidTarget {
                url: url.to_string(),
                reason: "expected an absolute URL such as http://host:port/path".to_string(),
            });
        }

        match uri.scheme_str() {
            Some("http") | Some("https") => Ok(Self { uri }),
            Some(other) => Err(HealthError::InvalidTarget {
                url: url.to_string(),
                reason: format!("unsupported scheme {other:?}, expected http or https"),
            }),
            None => unreachable!("scheme checked above"),
        }
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }
}

impl FromStr for Target {
    type Err = HealthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uri)
    }
}

/// Result of a single health probe.
#[derive(Debug)]
pub enum ProbeOutcome {
    /// The target answered `200 OK`.
    Healthy,
    /// Any other status, a transport failure, or a request timeout.
    Unhealthy(HealthError),
}

/// A single health check against one target.
///
/// `timeout` bounds the individual request; `None` lets it run until the
/// transport gives up.
#[async_trait]
pub trait Probe: Send + Sync {
    /// The target being probed, used for diagnostics.
    fn target(&self) -> &Target;

    /// Run one probe.
    async fn check(&self, timeout: Option<Duration>) -> ProbeOutcome;
}

/// Probe backed by a pooled hyper HTTP/1 client.
///
/// `https://` targets are verified against the Mozilla root store by
/// default; certificate and handshake failures count as transport errors.
#[derive(Clone)]
pub struct HttpProbe {
    target: Target,
    client: Client<HttpsConnector<HttpConnector>, Empty<Bytes>>,
}

impl HttpProbe {
    /// Probe `target`, trusting the Mozilla root store for https.
    pub fn new(target: Target) -> Result<Self, HealthError> {
        let mut roots = RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        let tls = ClientConfig::builder_with_provider(
            rustls::crypto::ring::default_provider().into(),
        )
        .with_safe_default_protocol_versions()?
        .with_root_certificates(roots)
        .with_no_client_auth();

        Ok(Self::with_tls_config(target, tls))
    }

    /// Probe `target` with a caller-supplied TLS configuration, e.g. one
    /// that trusts a private CA.
    pub fn with_tls_config(target: Target, tls: ClientConfig) -> Self {
        let connector = HttpsConnectorBuilder::new()
            .with_tls_config(tls)
            .https_or_http()
            .enable_http1()
            .build();
        let client = Client::builder(TokioExecutor::new()).build(connector);
        Self { target, client }
    }
}

impl fmt::Debug for HttpProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpProbe")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Probe for HttpProbe {
    fn target(&self) -> &Target {
        &self.target
    }

    async fn check(&self, timeout: Option<Duration>) -> ProbeOutcome {
        let uri = self.target.uri();

        let request = match http::Request::get(uri.clone())
            .header(header::USER_AGENT, USER_AGENT)
            .body(Empty::<Bytes>::new())
        {
            Ok(req) => req,
            Err(e) => return ProbeOutcome::Unhealthy(HealthError::Transport(e.to_string())),
        };

        let response = self.client.request(request);
        let result = match timeout {
            Some(limit) => match tokio::time::timeout(limit, response).await {
                Ok(result) => result,
                Err(_) => {
                    debug!(%uri, ?limit, "health probe timed out");
                    return ProbeOutcome::Unhealthy(HealthError::RequestTimeout(limit));
                }
            },
            None => response.await,
        };

        match result {
            Ok(resp) if resp.status() == StatusCode::OK => {
                debug!(%uri, "health probe returned 200");
                ProbeOutcome::Healthy
            }
            Ok(resp) => {
                debug!(status = %resp.status(), %uri, "health probe non-200");
                ProbeOutcome::Unhealthy(HealthError::UnexpectedStatus(resp.status()))
            }
            Err(e) => {
                let cause = error_chain(&e);
                debug!(error = %cause, %uri, "health probe request failed");
                ProbeOutcome::Unhealthy(HealthError::Transport(cause))
            }
        }
    }
}
