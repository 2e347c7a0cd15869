//! Authoritative artillery server: one simulation, many WebSocket clients.
//!
//! Usage:
//!   cargo run --release -p artillery-server -- --port 8080 --seed 12345
//!   RUST_LOG=debug GAME_CONFIG=rules.json cargo run -p artillery-server

mod config;
mod conn;
mod hub;

use anyhow::Result;
use artillery_core::Session;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::hub::Hub;

/// `RUST_LOG`-style directives, or `info` when unset or unparsable.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref()))
        .init();

    let config = ServerConfig::parse();
    let game_config = config.load_game_config()?;
    let seed = config.initial_seed();
    let tick_rate = config.tick_rate();

    let session = Session::new(seed, game_config, tick_rate);
    info!(
        seed,
        tick_rate,
        map = %session.game().state().map_name,
        "session ready"
    );

    let addr = config.bind_addr();
    let (hub_tx, hub_rx) = mpsc::unbounded_channel();
    let hub_task = tokio::spawn(Hub::new(session).run(hub_rx, tick_rate));

    tokio::select! {
        res = conn::serve(&addr, hub_tx) => res?,
        _ = tokio::signal::ctrl_c() => info!("shutting down"),
    }
    hub_task.abort();
    Ok(())
}
