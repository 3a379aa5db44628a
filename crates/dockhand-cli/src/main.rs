use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dockhand_engine::EngineConfig;

mod commands;

use commands::{RemoveArgs, WaitArgs};

#[derive(Parser, Debug)]
#[command(
    name = "dockhand",
    about = "dockhand: container engine cleanup and readiness checks",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Engine address (unix:///path or tcp://host:port). Overrides DOCKER_HOST.
    #[arg(long, global = true)]
    host: Option<String>,

    /// Read the engine host from this dockhand.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Remove all stopped containers. With --force, running containers too.
    RmAll(RemoveArgs),
    /// Remove all dangling (untagged) images. With --force, also those in use.
    RmiDangling(RemoveArgs),
    /// Wait until a URL answers 200 OK or the timeout passes.
    Wait(WaitArgs),
}

impl Cli {
    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            host: self.host.clone(),
            config_file: self.config.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return parse_failure_code(&e);
        }
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("dockhand=info")),
        )
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let engine = cli.engine_config();

    match cli.command {
        Commands::RmAll(args) => commands::containers::rm_all(&engine, &args).await,
        Commands::RmiDangling(args) => commands::images::rmi_dangling(&engine, &args).await,
        Commands::Wait(args) => commands::wait::wait(&args).await,
    }
}

/// `--help` and `--version` succeed; every other parse error exits 1.
fn parse_failure_code(err: &clap::Error) -> ExitCode {
    if err.use_stderr() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
