//! `dockhand rm-all`: remove every container.

use anyhow::Context;
use dockhand_engine::{remove_all_containers, EngineConfig};

use super::{connect, summarize, RemoveArgs};

/// Remove all containers, printing each id to stdout.
///
/// Containers the engine refuses to remove are logged and skipped; only a
/// connection or listing failure fails the command.
pub async fn rm_all(engine: &EngineConfig, args: &RemoveArgs) -> anyhow::Result<()> {
    let client = connect(engine).await?;
    let report = remove_all_containers(&client, args.force, &mut std::io::stdout())
        .await
        .context("listing containers")?;
    summarize("containers", &report);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rm_all_fails_without_daemon() {
        let dir = tempfile::tempdir().unwrap();
        let engine = EngineConfig {
            host: Some(format!("unix://{}", dir.path().join("missing.sock").display())),
            config_file: None,
        };

        let err = rm_all(&engine, &RemoveArgs { force: false }).await.unwrap_err();
        assert!(format!("{err:#}").contains("connect to Docker Engine"));
    }
}
