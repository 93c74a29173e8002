//! `reservoir` — drive a TCP connection pool from the command line.

mod commands;
mod config;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use reservoir_pool::{Pool, TcpFactory};

use crate::config::{AppConfig, Overrides};

#[derive(Debug, Parser)]
#[command(name = "reservoir", version, about = "Bounded resource pool driver")]
struct Cli {
    /// TOML config file
    #[arg(short, long, global = true, env = "RESERVOIR_CONFIG")]
    config: Option<PathBuf>,

    /// Override pool capacity
    #[arg(long, global = true)]
    capacity: Option<usize>,

    /// Override acquire timeout in milliseconds
    #[arg(long, global = true)]
    acquire_timeout_ms: Option<u64>,

    /// Override peer address (host:port)
    #[arg(long, global = true)]
    addr: Option<String>,

    /// Override log filter (e.g. "debug", "reservoir_pool=trace")
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Override log format: pretty, compact or json
    #[arg(long, global = true)]
    log_format: Option<reservoir_log::Format>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Borrow connections concurrently and report pool statistics as JSON
    Borrow {
        /// Number of concurrent borrowers
        #[arg(short, long, default_value_t = 10)]
        workers: usize,
        /// How long each borrower holds its connection
        #[arg(long, default_value_t = 100)]
        hold_ms: u64,
    },
    /// Print the effective configuration as TOML
    Config,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            capacity: self.capacity,
            acquire_timeout_ms: self.acquire_timeout_ms,
            addr: self.addr.clone(),
            log_level: self.log_level.clone(),
            log_format: self.log_format,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), &cli.overrides())?;
    reservoir_log::init(&config.log).context("failed to initialise logging")?;

    match cli.command {
        Command::Config => {
            print!("{}", config.to_toml()?);
        }
        Command::Borrow { workers, hold_ms } => {
            let factory = TcpFactory::new(config.tcp.clone());
            let pool = Pool::new(factory, config.pool.to_pool_config())
                .context("invalid pool configuration")?;
            tracing::info!(
                addr = %config.tcp.addr,
                capacity = pool.capacity(),
                workers,
                "Starting borrow run"
            );

            let report = commands::borrow::run(&pool, workers, Duration::from_millis(hold_ms)).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if report.failed > 0 {
                anyhow::bail!("{} of {} borrowers failed", report.failed, report.workers);
            }
        }
    }

    Ok(())
}
