pub mod containers;
pub mod images;
pub mod wait;

use anyhow::Context;
use clap::Args;
use dockhand_engine::{DockerClient, EngineConfig, RemovalReport};
use tracing::{info, warn};

pub use wait::WaitArgs;

/// Options shared by the removal commands.
#[derive(Args, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveArgs {
    /// Also remove resources that are running or in use.
    #[arg(long)]
    pub force: bool,
}

/// Resolve the engine endpoint and make sure the daemon answers.
pub async fn connect(config: &EngineConfig) -> anyhow::Result<DockerClient> {
    let endpoint = config.resolve().context("resolve Docker Engine host")?;
    let client = DockerClient::connect(endpoint).context("connect to Docker Engine")?;
    client
        .ping()
        .await
        .with_context(|| format!("connect to Docker Engine at {}", client.endpoint()))?;
    info!(endpoint = %client.endpoint(), "connected to Docker Engine");
    Ok(client)
}

/// Log a one-line summary of a bulk removal.
fn summarize(kind: &str, report: &RemovalReport) {
    if report.is_clean() {
        info!(removed = report.removed.len(), "removed {kind}");
    } else {
        warn!(
            removed = report.removed.len(),
            failed = report.failed.len(),
            "some {kind} could not be removed"
        );
    }
}
