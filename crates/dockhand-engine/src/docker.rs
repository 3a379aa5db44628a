//! Docker Engine API client.
//!
//! Each request opens its own HTTP/1 connection to the engine, over a unix
//! socket or plain TCP, and reads the full response body.

use std::fmt::Write as _;

use async_trait::async_trait;
use bytes::Bytes;
use http::{header, Method, Request, StatusCode};
use http_body_util::{BodyExt, Empty};
use hyper_util::rt::TokioIo;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpStream, UnixStream};
use tracing::debug;

use crate::client::{ContainerSummary, EngineClient, ImageSummary};
use crate::config::EngineEndpoint;
use crate::error::{EngineError, EngineResult};
use crate::filters::Filters;

const USER_AGENT: &str = concat!("dockhand/", env!("CARGO_PKG_VERSION"));

/// Container states that can be removed without `force`.
const STOPPED_STATES: [&str; 3] = ["created", "exited", "dead"];

/// Client for the Docker Engine HTTP API.
#[derive(Debug, Clone)]
pub struct DockerClient {
    endpoint: EngineEndpoint,
}

/// Error body returned by the engine on non-2xx responses.
#[derive(Deserialize)]
struct ApiMessage {
    message: String,
}

impl DockerClient {
    /// Create a client for `endpoint`.
    ///
    /// A unix socket path must exist; no connection is made until the
    /// first request.
    pub fn connect(endpoint: EngineEndpoint) -> EngineResult<Self> {
        if let EngineEndpoint::Unix(path) = &endpoint {
            std::fs::metadata(path).map_err(|source| EngineError::SocketMissing {
                path: path.clone(),
                source,
            })?;
        }
        Ok(Self { endpoint })
    }

    pub fn endpoint(&self) -> &EngineEndpoint {
        &self.endpoint
    }

    /// Check that the engine answers `GET /_ping`.
    pub async fn ping(&self) -> EngineResult<()> {
        self.request(Method::GET, "/_ping".to_string()).await?;
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: String) -> EngineResult<T> {
        let body = self.request(Method::GET, path).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Send one request and return the body of a 2xx response.
    async fn request(&self, method: Method, path: String) -> EngineResult<Bytes> {
        debug!(%method, %path, endpoint = %self.endpoint, "engine request");

        let (status, body) = match &self.endpoint {
            EngineEndpoint::Unix(socket) => {
                let stream = UnixStream::connect(socket)
                    .await
                    .map_err(|source| self.connect_error(source))?;
                exchange(stream, "docker", method, &path).await?
            }
            EngineEndpoint::Tcp(addr) => {
                let stream = TcpStream::connect(addr.as_str())
                    .await
                    .map_err(|source| self.connect_error(source))?;
                exchange(stream, addr, method, &path).await?
            }
        };

        if status.is_success() {
            return Ok(body);
        }

        let message = serde_json::from_slice::<ApiMessage>(&body)
            .map(|m| m.message)
            .unwrap_or_else(|_| String::from_utf8_lossy(&body).trim().to_string());
        debug!(%status, %message, %path, "engine request failed");
        Err(EngineError::Api { status, message })
    }

    fn connect_error(&self, source: std::io::Error) -> EngineError {
        EngineError::Connect {
            endpoint: self.endpoint.to_string(),
            source,
        }
    }
}

/// Run one HTTP/1 exchange over `stream`.
async fn exchange<S>(
    stream: S,
    host: &str,
    method: Method,
    path: &str,
) -> EngineResult<(StatusCode, Bytes)>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let io = TokioIo::new(stream);
    let (mut sender, conn) = hyper::client::conn::http1::handshake(io).await?;

    // Drive the connection in the background.
    tokio::spawn(async move {
        if let Err(e) = conn.await {
            debug!(error = %e, "engine connection closed with error");
        }
    });

    let req = Request::builder()
        .method(method)
        .uri(path)
        .header(header::HOST, host)
        .header(header::USER_AGENT, USER_AGENT)
        .body(Empty::<Bytes>::new())?;

    let resp = sender.send_request(req).await?;
    let status = resp.status();
    let body = resp.into_body().collect().await?.to_bytes();
    Ok((status, body))
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

fn flag(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

/// Build `path?all=..&filters=..`, omitting empty filters.
fn list_path(base: &str, all: bool, filters: &Filters) -> EngineResult<String> {
    let mut path = format!("{base}?all={}", flag(all));
    if !filters.is_empty() {
        let _ = write!(path, "&filters={}", encode(&filters.to_json()?));
    }
    Ok(path)
}

#[async_trait]
impl EngineClient for DockerClient {
    async fn list_containers(
        &self,
        all: bool,
        include_running: bool,
        filters: &Filters,
    ) -> EngineResult<Vec<ContainerSummary>> {
        let path = if include_running {
            list_path("/containers/json", all, filters)?
        } else {
            let filters = filters.clone().with("status", STOPPED_STATES);
            list_path("/containers/json", all, &filters)?
        };
        self.get_json(path).await
    }

    async fn remove_container(
        &self,
        id: &str,
        force: bool,
        remove_volumes: bool,
    ) -> EngineResult<()> {
        let path = format!(
            "/containers/{}?force={}&v={}",
            encode(id),
            flag(force),
            flag(remove_volumes)
        );
        self.request(Method::DELETE, path).await?;
        Ok(())
    }

    async fn list_images(&self, all: bool, filters: &Filters) -> EngineResult<Vec<ImageSummary>> {
        let path = list_path("/images/json", all, filters)?;
        self.get_json(path).await
    }

    async fn remove_image(&self, id: &str, force: bool) -> EngineResult<()> {
        let path = format!("/images/{}?force={}", encode(id), flag(force));
        self.request(Method::DELETE, path).await?;
        Ok(())
    }
}
