//! `dockhand rmi-dangling`: remove untagged images.

use anyhow::Context;
use dockhand_engine::{remove_dangling_images, EngineConfig};

use super::{connect, summarize, RemoveArgs};

pub async fn rmi_dangling(engine: &EngineConfig, args: &RemoveArgs) -> anyhow::Result<()> {
    let client = connect(engine).await?;
    let report = remove_dangling_images(&client, args.force, &mut std::io::stdout())
        .await
        .context("listing images")?;
    summarize("dangling images", &report);
    Ok(())
}
