//! Bulk cleanup operations.
//!
//! Each operation lists the matching resources, writes every id to `out`,
//! and removes it. A failed listing aborts the operation; a failed removal
//! is logged and recorded, and the loop moves on to the next resource.

use std::io::Write;

use tracing::{info, warn};

use crate::client::EngineClient;
use crate::error::{EngineError, EngineResult};
use crate::filters::Filters;

/// Outcome of a bulk removal.
#[derive(Debug, Default)]
pub struct RemovalReport {
    /// Ids removed successfully, in listing order.
    pub removed: Vec<String>,
    /// Ids the engine refused to remove, with the reason.
    pub failed: Vec<(String, EngineError)>,
}

impl RemovalReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    fn record(&mut self, kind: &str, id: String, result: EngineResult<()>) {
        match result {
            Ok(()) => self.removed.push(id),
            Err(e) => {
                warn!(%id, error = %e, "failed to remove {kind}");
                self.failed.push((id, e));
            }
        }
    }
}

/// Remove every container. Without `force` only stopped containers are
/// listed; with it, running containers are listed and force-removed too.
pub async fn remove_all_containers<C, W>(
    client: &C,
    force: bool,
    out: &mut W,
) -> EngineResult<RemovalReport>
where
    C: EngineClient + ?Sized,
    W: Write,
{
    let containers = client.list_containers(true, force, &Filters::new()).await?;
    info!(count = containers.len(), force, "removing containers");

    let mut report = RemovalReport::default();
    for container in containers {
        writeln!(out, "{}", container.id)?;
        let result = client.remove_container(&container.id, force, false).await;
        report.record("container", container.id, result);
    }
    Ok(report)
}

/// Remove every dangling (untagged) image. `force` also removes images
/// still referenced by containers.
pub async fn remove_dangling_images<C, W>(
    client: &C,
    force: bool,
    out: &mut W,
) -> EngineResult<RemovalReport>
where
    C: EngineClient + ?Sized,
    W: Write,
{
    let images = client
        .list_images(true, &Filters::single("dangling", "true"))
        .await?;
    info!(count = images.len(), force, "removing dangling images");

    let mut report = RemovalReport::default();
    for image in images {
        writeln!(out, "{}", image.id)?;
        let result = client.remove_image(&image.id, force).await;
        report.record("image", image.id, result);
    }
    Ok(report)
}
