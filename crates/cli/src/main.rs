mod app;
mod command;

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io,
    sync::Arc,
};

use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};
use trader_core::{
    config::{self, AppConfig},
    Economy, TradeAdvisor, World, WorldLoader,
};

fn main() -> Result<()> {
    init_logging()?;

    config::ensure_default_config()?;
    let config = AppConfig::load()?;

    let world = match &config.world_path {
        Some(path) => WorldLoader::from_path(path)?,
        None => World::builtin()?,
    };
    info!(
        cities = world.cities.len(),
        nodes = world.network.len(),
        "world ready"
    );
    let world = Arc::new(world);

    let player = config.starting_player(&world);
    let economy =
        Economy::new(world.clone(), player).context("invalid starting city in configuration")?;
    let advisor = TradeAdvisor::new(world);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut app = app::TraderApp::new(
        economy,
        advisor,
        config.advisor_uses,
        stdin.lock(),
        stdout.lock(),
    );
    app.run()?;
    info!(
        actions = app.economy().ledger().len(),
        profit = app.economy().profit(),
        "session closed"
    );
    Ok(())
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("city-trader.log");

    let env_filter = EnvFilter::from_default_env();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .compact()
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}
