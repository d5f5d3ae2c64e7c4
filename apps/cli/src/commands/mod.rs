//! # Command Handlers
//!
//! Each handler runs one parsed command against the [`Register`] and
//! returns a [`Reply`] holding both renderings of its result.
//!
//! ## Command Categories
//!
//! | Module | Commands |
//! |--------|----------|
//! | `item` | `item list`, `item add`, `item update`, `item remove`, `item seed`, `item rates` |
//! | `stock` | `stock show`, `stock set`, `stock add`, `stock subtract` |
//! | `cart` | `cart show`, `cart add`, `cart remove`, `cart set`, `cart adjust`, `cart clear` |
//! | `checkout` | `checkout` |
//! | `bills` | `bills`, `bill show`, `bill edit`, `bill delete` |
//! | `report` | `report` |

pub mod bills;
pub mod cart;
pub mod checkout;
pub mod item;
pub mod report;
pub mod stock;

use chrono::{Local, NaiveDate};
use kirana_db::Register;
use serde::Serialize;
use tracing::debug;

use crate::cli::Command;
use crate::config::AppConfig;
use crate::error::CliResult;
use crate::render::Letterhead;

/// What a command hands to the terminal.
#[derive(Debug, Clone)]
pub struct Reply {
    pub text: String,
    pub json: serde_json::Value,
}

impl Reply {
    pub fn new<T: Serialize + ?Sized>(text: impl Into<String>, value: &T) -> CliResult<Self> {
        Ok(Reply {
            text: text.into(),
            json: serde_json::to_value(value)?,
        })
    }

    /// The rendering selected by `--json`.
    pub fn render(&self, json: bool) -> CliResult<String> {
        if json {
            Ok(serde_json::to_string_pretty(&self.json)?)
        } else {
            Ok(self.text.clone())
        }
    }
}

/// Everything a handler needs.
#[derive(Debug, Clone)]
pub struct Context {
    pub register: Register,
    pub config: AppConfig,
    /// Date used for checkout and report presets.
    pub today: NaiveDate,
}

impl Context {
    pub fn new(register: Register, config: AppConfig) -> Self {
        Context {
            register,
            config,
            today: Local::now().date_naive(),
        }
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn letterhead(&self) -> Letterhead<'_> {
        Letterhead {
            store_name: &self.config.store_name,
            currency_symbol: &self.config.currency_symbol,
        }
    }
}

/// Runs one command.
pub async fn execute(ctx: &Context, command: Command) -> CliResult<Reply> {
    debug!(?command, "Executing command");

    match command {
        Command::Item(cmd) => item::run(ctx, cmd).await,
        Command::Stock(cmd) => stock::run(ctx, cmd).await,
        Command::Cart(cmd) => cart::run(ctx, cmd).await,
        Command::Checkout { date } => checkout::run(ctx, date).await,
        Command::Bills(range) => bills::list(ctx, &range).await,
        Command::Bill(cmd) => bills::run(ctx, cmd).await,
        Command::Report(range) => report::run(ctx, &range).await,
    }
}
