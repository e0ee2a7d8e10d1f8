//! shiftledger library root.
//! Exposes the CLI parser, the high-level run() function and the internal
//! modules (the core logic is usable without the CLI).

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::Context;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, ctx: &Context) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, ctx),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, ctx),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, ctx),
        Commands::Backup { .. } => cli::commands::backup::handle(&cli.command, ctx),
        Commands::User(cmd) => cli::commands::user::handle(cmd, ctx),
        Commands::Schedule(cmd) => cli::commands::schedule::handle(cmd, ctx),
        Commands::Attendance(cmd) => cli::commands::attendance::handle(cmd, ctx),
        Commands::Adjust(cmd) => cli::commands::adjust::handle(cmd, ctx),
        Commands::Setting(cmd) => cli::commands::setting::handle(cmd, ctx),
        Commands::Report(cmd) => cli::commands::report::handle(cmd, ctx),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // config is loaded once; --db wins over the configured path
    let mut cfg = Config::load()?;
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    let ctx = Context::new(&cli, cfg)?;
    dispatch(&cli, &ctx)
}
