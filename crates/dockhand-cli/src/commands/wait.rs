//! `dockhand wait`: block until an application answers 200 OK.

use std::time::Duration;

use anyhow::Context;
use clap::Args;
use dockhand_health::{HealthPoller, Target};

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct WaitArgs {
    /// URL to probe with GET requests.
    #[arg(long)]
    pub url: String,

    /// Seconds to wait before giving up. 0 waits indefinitely.
    #[arg(long, default_value_t = 1)]
    pub timeout: u64,
}

impl WaitArgs {
    pub fn deadline(&self) -> Option<Duration> {
        match self.timeout {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

pub async fn wait(args: &WaitArgs) -> anyhow::Result<()> {
    let target = Target::parse(&args.url).context("invalid --url")?;
    HealthPoller::http(target)
        .context("building HTTP client")?
        .wait(args.deadline())
        .await
        .context("application did not become healthy")?;
    Ok(())
}
