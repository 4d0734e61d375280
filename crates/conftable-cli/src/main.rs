//! CLI entry point for conftable.
//!
//! This binary provides the `conftable` command: `serve` runs the HTTP
//! service, and the remaining subcommands perform one table operation
//! against either the file store or a running service, printing the result
//! as JSON.

mod cli;
mod config;
mod helpers;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use conftable_store::{
    ConferenceTable, FileConference, MemoryConference, QuorumOptions, QuorumOutcome,
    wait_for_quorum,
};
use conftable_web::{RemoteConference, WebConfig, WebServer};
use serde_json::json;
use tracing::info;

use crate::cli::{Cli, Commands};
use crate::config::AppConfig;
use crate::helpers::{ctrl_c_token, init_tracing, print_json};

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing("info");

    let config = config::load_config(&cli.config);

    match cli.command {
        Commands::Serve { bind, port } => cmd_serve(&config, bind, port).await,
        Commands::Ping => {
            let url = cli.remote.unwrap_or_else(|| config.server_url());
            cmd_ping(&url).await
        }
        command => {
            let table = open_table(cli.dir, cli.remote, &config);
            run_table_command(table.as_ref(), command, &config).await
        }
    }
}

/// Pick the table the operation runs against: `--remote` wins, otherwise
/// the file store in `--dir` or the configured directory.
fn open_table(
    dir: Option<std::path::PathBuf>,
    remote: Option<String>,
    config: &AppConfig,
) -> Box<dyn ConferenceTable> {
    match remote {
        Some(url) => Box::new(RemoteConference::new(url)),
        None => Box::new(FileConference::new(
            dir.unwrap_or_else(|| config.store_dir.clone()),
        )),
    }
}

// ---------------------------------------------------------------------------
// Subcommand: serve
// ---------------------------------------------------------------------------

async fn cmd_serve(config: &AppConfig, bind: Option<String>, port: Option<u16>) -> Result<()> {
    let web_config = WebConfig {
        bind_addr: bind.unwrap_or_else(|| config.server.bind_addr.clone()),
        port: port.unwrap_or(config.server.port),
    };

    let table = Arc::new(MemoryConference::new());
    let server = WebServer::new(web_config, table);
    info!(addr = %server.addr(), "starting conference table service");

    server
        .start(ctrl_c_token())
        .await
        .map_err(|e| anyhow::anyhow!(e))
        .context("web server failed")
}

// ---------------------------------------------------------------------------
// Subcommand: ping
// ---------------------------------------------------------------------------

async fn cmd_ping(url: &str) -> Result<()> {
    let remote = RemoteConference::new(url);
    let message = remote
        .ping()
        .await
        .with_context(|| format!("conference table at {url} is not reachable"))?;
    print_json(&json!({ "status": "ok", "message": message }))
}

// ---------------------------------------------------------------------------
// Subcommand: wait
// ---------------------------------------------------------------------------

/// Apply `wait` flags over the configured quorum settings. The interval is
/// at least one second, as in the config file.
fn quorum_options(
    config: &AppConfig,
    expected: Option<usize>,
    timeout: Option<u64>,
    interval: Option<u64>,
) -> QuorumOptions {
    let mut options = config.quorum;
    if let Some(expected) = expected {
        options.expected = expected;
    }
    if let Some(secs) = timeout {
        options.timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = interval {
        options.poll_interval = Duration::from_secs(secs.max(1));
    }
    options
}

// ---------------------------------------------------------------------------
// Table operations
// ---------------------------------------------------------------------------

async fn run_table_command(
    table: &dyn ConferenceTable,
    command: Commands,
    config: &AppConfig,
) -> Result<()> {
    match command {
        Commands::Join { agent_id, role } => {
            let receipt = table.join(&agent_id, &role).await.context("join failed")?;
            print_json(&json!({
                "status": "success",
                "participants": receipt.participants,
            }))
        }
        Commands::Post {
            agent_id,
            message,
            kind,
        } => {
            let receipt = table
                .post(&agent_id, &message, &kind)
                .await
                .context("post failed")?;
            print_json(&json!({
                "status": "success",
                "message_id": receipt.message_id,
            }))
        }
        Commands::Messages { since } => {
            let batch = table
                .messages_since(since)
                .await
                .context("failed to read messages")?;
            print_json(&json!({
                "status": "success",
                "messages": batch.messages,
                "total": batch.total,
            }))
        }
        Commands::Conclude {
            agent_id,
            conclusion,
        } => {
            table
                .conclude(&agent_id, &conclusion)
                .await
                .context("conclude failed")?;
            print_json(&json!({ "status": "success" }))
        }
        Commands::Status => {
            let status = table.status().await.context("failed to read status")?;
            print_json(&status)
        }
        Commands::Wait {
            agent_id,
            expected,
            timeout,
            interval,
        } => {
            let options = quorum_options(config, expected, timeout, interval);

            let outcome = wait_for_quorum(table, &agent_id, &options, &ctrl_c_token())
                .await
                .context("quorum wait failed")?;
            match outcome {
                QuorumOutcome::Reached { participants } => print_json(&json!({
                    "status": "success",
                    "participants": participants,
                })),
                QuorumOutcome::TimedOut => bail!(
                    "timed out after {}s waiting for {} participants",
                    options.timeout.as_secs(),
                    options.expected
                ),
                QuorumOutcome::Cancelled => bail!("wait cancelled"),
            }
        }
        Commands::Clear => {
            table.clear().await.context("clear failed")?;
            print_json(&json!({ "status": "success" }))
        }
        Commands::Serve { .. } | Commands::Ping => bail!("not a table operation"),
    }
}
