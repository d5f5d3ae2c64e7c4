//! # Command Line Definition
//!
//! ```text
//! kirana [--json] <COMMAND>
//!
//!   item     list | add | update | remove | seed | rates
//!   stock    show | set | add | subtract
//!   cart     show | add | remove | set | adjust | clear
//!   checkout [--date DD-MM-YYYY]
//!   bills    [--preset P | --from YYYY-MM-DD --to YYYY-MM-DD]
//!   bill     show | edit | delete
//!   report   [--preset P | --from YYYY-MM-DD --to YYYY-MM-DD]
//! ```

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use kirana_core::report::{DateRange, RangePreset};
use kirana_core::sequence::format_bill_number;
use kirana_core::validation::parse_bill_date;
use kirana_core::{LineEdit, ValidationError};

#[derive(Debug, Parser)]
#[command(name = "kirana", version, about = "Billing and stock for a kirana counter")]
pub struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the item catalog
    #[command(subcommand)]
    Item(ItemCommand),

    /// Inspect and adjust on-hand stock
    #[command(subcommand)]
    Stock(StockCommand),

    /// Build the sale in progress
    #[command(subcommand)]
    Cart(CartCommand),

    /// Finalize the cart into a bill
    Checkout {
        /// Bill date, defaults to today
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },

    /// List bills, newest first
    Bills(RangeArgs),

    /// Show, edit or delete one archived bill
    #[command(subcommand)]
    Bill(BillCommand),

    /// Sales, cost and profit totals
    Report(RangeArgs),
}

#[derive(Debug, Subcommand)]
pub enum ItemCommand {
    List,

    Add {
        name: String,
        unit: String,
        store_rate: f64,
        purchase_rate: f64,
        #[arg(long)]
        image_url: Option<String>,
    },

    Update {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        unit: Option<String>,
        #[arg(long)]
        store_rate: Option<f64>,
        #[arg(long)]
        purchase_rate: Option<f64>,
        #[arg(long, conflicts_with = "clear_image")]
        image_url: Option<String>,
        #[arg(long)]
        clear_image: bool,
    },

    Remove { id: u64 },

    /// Load the starter catalog
    Seed {
        /// Replace an existing catalog
        #[arg(long)]
        force: bool,
    },

    /// Apply purchase-rate corrections from a JSON file of `{"NAME": rate}`
    Rates { file: PathBuf },
}

#[derive(Debug, Subcommand)]
pub enum StockCommand {
    /// One item's quantity, or every stock entry
    Show { id: Option<u64> },
    Set { id: u64, amount: f64 },
    Add { id: u64, amount: f64 },
    Subtract { id: u64, amount: f64 },
}

#[derive(Debug, Subcommand)]
pub enum CartCommand {
    Show,
    Add { id: u64, quantity: f64 },
    Remove { id: u64 },
    /// Set a line's quantity; zero removes it
    Set { id: u64, quantity: f64 },
    /// Change a line's quantity by a signed amount
    Adjust {
        id: u64,
        #[arg(allow_negative_numbers = true)]
        delta: f64,
    },
    Clear,
}

#[derive(Debug, Subcommand)]
pub enum BillCommand {
    Show {
        /// `BILL-007` or just `7`
        #[arg(value_parser = parse_bill_number)]
        number: String,
        /// Include cost and profit
        #[arg(long)]
        internal: bool,
    },

    Edit {
        #[arg(value_parser = parse_bill_number)]
        number: String,
        /// `ID:QTY[:RATE[:COST]]`; leave a field empty to keep it
        #[arg(long = "line", value_parser = parse_line_edit)]
        lines: Vec<LineEdit>,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },

    Delete {
        #[arg(required = true, value_parser = parse_bill_number)]
        numbers: Vec<String>,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct RangeArgs {
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub preset: Option<RangePreset>,

    /// First day, YYYY-MM-DD
    #[arg(long)]
    pub from: Option<String>,

    /// Last day, YYYY-MM-DD
    #[arg(long)]
    pub to: Option<String>,
}

impl RangeArgs {
    /// The range these arguments select. No arguments selects everything.
    pub fn resolve(&self, today: NaiveDate) -> Result<DateRange, ValidationError> {
        match self.preset {
            Some(preset) => Ok(preset.resolve(today)),
            None => DateRange::parse(self.from.as_deref(), self.to.as_deref()),
        }
    }
}

// =============================================================================
// Value Parsers
// =============================================================================

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    parse_bill_date(value).map_err(|e| e.to_string())
}

/// Accepts a full bill number or its bare sequence.
fn parse_bill_number(value: &str) -> Result<String, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("bill number is required".to_string());
    }
    if value.chars().all(|c| c.is_ascii_digit()) {
        return value
            .parse::<u64>()
            .map(format_bill_number)
            .map_err(|e| e.to_string());
    }
    Ok(value.to_uppercase())
}

/// Parses `ID:QTY[:RATE[:COST]]`.
fn parse_line_edit(value: &str) -> Result<LineEdit, String> {
    let mut parts = value.split(':');

    let item_id = parts
        .next()
        .unwrap_or_default()
        .trim()
        .parse::<u64>()
        .map_err(|_| format!("'{}' does not start with an item id", value))?;

    let mut fields = [None; 3];
    for slot in fields.iter_mut() {
        let Some(part) = parts.next() else { break };
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        *slot = Some(
            part.parse::<f64>()
                .map_err(|_| format!("'{}' is not a number in '{}'", part, value))?,
        );
    }

    if parts.next().is_some() {
        return Err(format!("'{}' has more than four fields", value));
    }

    let [quantity, store_rate, purchase_rate] = fields;
    Ok(LineEdit {
        item_id,
        quantity,
        store_rate,
        purchase_rate,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_line_edit() {
        let edit = parse_line_edit("3:2.5").unwrap();
        assert_eq!(edit.item_id, 3);
        assert_eq!(edit.quantity, Some(2.5));
        assert_eq!(edit.store_rate, None);

        let edit = parse_line_edit("3::55:40").unwrap();
        assert_eq!(edit.quantity, None);
        assert_eq!(edit.store_rate, Some(55.0));
        assert_eq!(edit.purchase_rate, Some(40.0));

        assert!(parse_line_edit("x:1").is_err());
        assert!(parse_line_edit("3:abc").is_err());
        assert!(parse_line_edit("3:1:2:3:4").is_err());
    }

    #[test]
    fn test_parse_bill_number() {
        assert_eq!(parse_bill_number("7").unwrap(), "BILL-007");
        assert_eq!(parse_bill_number("bill-012").unwrap(), "BILL-012");
        assert!(parse_bill_number(" ").is_err());
    }

    #[test]
    fn test_parses_bill_edit() {
        let cli = Cli::try_parse_from([
            "kirana", "bill", "edit", "4", "--line", "1:2", "--line", "2::30", "--date",
            "16-03-2024",
        ])
        .unwrap();

        let Command::Bill(BillCommand::Edit { number, lines, date }) = cli.command else {
            panic!("expected bill edit");
        };
        assert_eq!(number, "BILL-004");
        assert_eq!(lines.len(), 2);
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 16));
    }

    #[test]
    fn test_range_args() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

        let cli = Cli::try_parse_from(["kirana", "report", "--preset", "month"]).unwrap();
        let Command::Report(args) = cli.command else {
            panic!("expected report");
        };
        let range = args.resolve(today).unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2024, 3, 31));

        let conflicting = ["kirana", "bills", "--preset", "week", "--from", "2024-01-01"];
        assert!(Cli::try_parse_from(conflicting).is_err());
        assert_eq!(RangeArgs::default().resolve(today).unwrap(), DateRange::all());
    }

    #[test]
    fn test_negative_cart_adjust() {
        let cli = Cli::try_parse_from(["kirana", "cart", "adjust", "3", "-0.5"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Cart(CartCommand::Adjust { id: 3, delta }) if delta == -0.5
        ));
    }
}
