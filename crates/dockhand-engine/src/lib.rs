//! dockhand-engine: talk to a container engine and clean it up.
//!
//! Provides the [`EngineClient`] abstraction over the engine's list and
//! remove calls, a [`DockerClient`] that speaks the Docker Engine HTTP API
//! over a unix socket or plain TCP, and the bulk cleanup operations built
//! on top of it.
//!
//! # Architecture
//!
//! ```text
//! EngineConfig::resolve()  (--host > DOCKER_HOST > config file > default socket)
//!   └── EngineEndpoint::{Unix, Tcp}
//!         └── DockerClient (one HTTP/1 connection per request)
//!               └── impl EngineClient
//!                     ├── remove_all_containers()
//!                     └── remove_dangling_images()
//! ```

pub mod client;
pub mod config;
pub mod docker;
pub mod error;
pub mod filters;
pub mod ops;

pub use client::{ContainerSummary, EngineClient, ImageSummary};
pub use config::{EngineConfig, EngineEndpoint, DEFAULT_SOCKET};
pub use docker::DockerClient;
pub use error::{EngineError, EngineResult};
pub use filters::Filters;
pub use ops::{remove_all_containers, remove_dangling_images, RemovalReport};
