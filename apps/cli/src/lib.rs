//! # Kirana Command Line
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  main()                                                                 │
//! │     │                                                                   │
//! │     ├── 1. init_tracing          RUST_LOG or info,kirana=debug,sqlx=warn│
//! │     ├── 2. Cli::parse            clap                                   │
//! │     ├── 3. AppConfig::from_env   KIRANA_* variables                     │
//! │     ├── 4. open                  Database + migrations, Register        │
//! │     ├── 5. execute               one command → Reply                    │
//! │     ▼                                                                   │
//! │  stdout: text or --json         stderr + exit status on error           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod render;

use kirana_db::{Database, DbConfig, Register};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::commands::{Context, Reply};
use crate::config::AppConfig;
use crate::error::CliResult;

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,kirana=debug,sqlx=warn";

/// Initializes the tracing subscriber. Logs go to stderr so they never mix
/// with command output.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=kirana_db=trace` - Trace the persistence layer only
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Opens the configured database and builds the register.
pub async fn open(config: &AppConfig) -> CliResult<Register> {
    info!(path = %config.database_path.display(), oversell = %config.oversell, "Opening store");

    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    Ok(Register::with_policy(db, config.oversell))
}

/// Runs one parsed command line to completion.
pub async fn run(cli: Cli, config: AppConfig) -> CliResult<Reply> {
    let register = open(&config).await?;
    let ctx = Context::new(register, config);

    let reply = commands::execute(&ctx, cli.command).await;
    ctx.register.database().close().await;
    reply
}
