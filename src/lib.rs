//! rollcall library root.
//! Exposes the CLI parser, the attendance engine, its storage tiers and the
//! high-level run() function used by main.rs.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod store;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use tracing_subscriber::EnvFilter;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let json = cli.json;
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli, cfg),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg, json),
        Commands::CheckIn { .. } => cli::commands::checkin::handle(&cli.command, cfg, json),
        Commands::CheckOut { .. } => cli::commands::checkout::handle(&cli.command, cfg, json),
        Commands::Live { .. } => cli::commands::live::handle(&cli.command, cfg, json),
        Commands::Finalize { .. } => cli::commands::finalize::handle(&cli.command, cfg, json),
        Commands::Attendance { .. } => {
            cli::commands::attendance::handle(&cli.command, cfg, json)
        }
        Commands::Event { .. } => cli::commands::event::handle(&cli.command, cfg, json),
        Commands::Roster { .. } => cli::commands::roster::handle(&cli.command, cfg, json),
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, cfg),
    }
}

/// Install the stderr tracing subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // load config once, then apply command-line overrides
    let mut cfg = Config::load()?;
    if let Some(custom_db) = &cli.db {
        cfg.override_database(custom_db);
    }
    if let Some(records) = &cli.records {
        cfg.records_database = Some(records.clone());
    }
    if let Some(live) = &cli.live {
        cfg.live_database = Some(live.clone());
    }

    init_tracing(&cfg.log_level);

    dispatch(&cli, &cfg)
}
