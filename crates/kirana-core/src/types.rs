//! # Domain Types
//!
//! Core records used throughout Kirana.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Item       │   │   StockEntry    │   │    CartLine     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (u64)       │   │  item_id (FK)   │   │  id (= Item.id) │       │
//! │  │  name, unit     │   │  item_name      │   │  rates (frozen) │       │
//! │  │  store_rate     │   │  quantity ≥ 0   │   │  quantity > 0   │       │
//! │  │  purchase_rate  │   │  last_updated   │   └────────┬────────┘       │
//! │  └─────────────────┘   └─────────────────┘            │ checkout       │
//! │                                                       ▼                │
//! │                        ┌─────────────────┐   ┌─────────────────┐       │
//! │                        │      Bill       │◄──│    BillLine     │       │
//! │                        │  ─────────────  │   │  ─────────────  │       │
//! │                        │  sequence       │   │  amount, cost   │       │
//! │                        │  bill_number    │   │  profit         │       │
//! │                        │  date/timestamp │   └─────────────────┘       │
//! │                        │  totals         │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Cart lines and bill lines carry their own copy of name, unit and rates.
//! Editing or deleting a catalog item never reaches into history.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::round2;
use crate::reconcile;
use crate::sequence;

// =============================================================================
// Item
// =============================================================================

/// A catalog item with dual pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Sequential identifier, stable for the item's lifetime.
    pub id: u64,

    /// Display name, also the key for purchase-rate corrections.
    pub name: String,

    /// Selling unit (KG, BOX, PACKET, ...).
    pub unit: String,

    /// Price charged to the customer per unit.
    pub store_rate: f64,

    /// Cost paid by the store per unit.
    pub purchase_rate: f64,

    /// `store_rate - purchase_rate`, kept in sync by the catalog.
    #[serde(default)]
    pub profit_margin: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub image_url: Option<String>,
}

impl Item {
    /// Builds an item from a draft, deriving its margin.
    pub fn from_draft(id: u64, draft: ItemDraft) -> Self {
        let mut item = Item {
            id,
            name: draft.name.trim().to_string(),
            unit: draft.unit.trim().to_string(),
            store_rate: draft.store_rate,
            purchase_rate: draft.purchase_rate,
            profit_margin: 0.0,
            image_url: draft.image_url.filter(|url| !url.trim().is_empty()),
        };
        item.refresh_margin();
        item
    }

    /// Recomputes `profit_margin` from the two rates.
    pub fn refresh_margin(&mut self) {
        self.profit_margin = round2(self.store_rate - self.purchase_rate);
    }
}

/// Input for creating a catalog item.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
    pub name: String,
    pub unit: String,
    pub store_rate: f64,
    pub purchase_rate: f64,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl ItemDraft {
    pub fn new(name: &str, unit: &str, store_rate: f64, purchase_rate: f64) -> Self {
        ItemDraft {
            name: name.to_string(),
            unit: unit.to_string(),
            store_rate,
            purchase_rate,
            image_url: None,
        }
    }
}

/// Partial update of a catalog item. `None` leaves a field untouched.
///
/// `image_url: Some(None)` clears the image.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub store_rate: Option<f64>,
    pub purchase_rate: Option<f64>,
    pub image_url: Option<Option<String>>,
}

// =============================================================================
// Stock
// =============================================================================

/// On-hand quantity for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockEntry {
    /// Catalog id. The item is not required to still exist.
    pub item_id: u64,

    /// Name at the time of the last update (denormalized).
    pub item_name: String,

    /// Never negative.
    pub quantity: f64,

    #[ts(as = "String")]
    pub last_updated: DateTime<Utc>,
}

/// Stock mutation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum StockOp {
    /// Replace the quantity.
    Set,
    /// Increase the quantity.
    Add,
    /// Decrease the quantity; see [`crate::OversellPolicy`] for the floor.
    Subtract,
}

impl FromStr for StockOp {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "set" => Ok(StockOp::Set),
            "add" => Ok(StockOp::Add),
            "subtract" | "sub" => Ok(StockOp::Subtract),
            other => Err(ValidationError::invalid_format(
                "operation",
                format!("'{}' is not one of set, add, subtract", other),
            )),
        }
    }
}

impl fmt::Display for StockOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StockOp::Set => "set",
            StockOp::Add => "add",
            StockOp::Subtract => "subtract",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// A line in the in-progress sale.
///
/// Rates are frozen when the item is first added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Catalog id of the item.
    pub id: u64,
    pub name: String,
    pub unit: String,
    pub store_rate: f64,
    pub purchase_rate: f64,
    /// Always > 0; a line reaching zero is removed.
    pub quantity: f64,
}

impl CartLine {
    /// Snapshots an item into a new line.
    pub fn from_item(item: &Item, quantity: f64) -> Self {
        CartLine {
            id: item.id,
            name: item.name.clone(),
            unit: item.unit.clone(),
            store_rate: item.store_rate,
            purchase_rate: item.purchase_rate,
            quantity,
        }
    }

    /// `store_rate × quantity`, unrounded.
    pub fn amount(&self) -> f64 {
        self.store_rate * self.quantity
    }

    /// `purchase_rate × quantity`, unrounded.
    pub fn cost(&self) -> f64 {
        self.purchase_rate * self.quantity
    }
}

/// Running totals of the cart. Unrounded until display.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub line_count: usize,
    pub total_quantity: f64,
    pub total_amount: f64,
    pub total_cost: f64,
    pub total_profit: f64,
}

// =============================================================================
// Bill
// =============================================================================

/// One reconciled line of a finalized bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BillLine {
    pub id: u64,
    pub name: String,
    pub unit: String,
    pub quantity: f64,
    pub store_rate: f64,
    pub purchase_rate: f64,
    /// `round2(store_rate × quantity)`
    pub amount: f64,
    /// `round2(purchase_rate × quantity)`
    pub cost: f64,
    /// `round2(amount − cost)`
    pub profit: f64,
}

impl BillLine {
    /// Builds a reconciled line.
    pub fn new(
        id: u64,
        name: &str,
        unit: &str,
        quantity: f64,
        store_rate: f64,
        purchase_rate: f64,
    ) -> Self {
        reconcile::recalculate_line(&BillLine {
            id,
            name: name.to_string(),
            unit: unit.to_string(),
            quantity,
            store_rate,
            purchase_rate,
            amount: 0.0,
            cost: 0.0,
            profit: 0.0,
        })
    }
}

impl From<&CartLine> for BillLine {
    fn from(line: &CartLine) -> Self {
        BillLine::new(
            line.id,
            &line.name,
            &line.unit,
            line.quantity,
            line.store_rate,
            line.purchase_rate,
        )
    }
}

/// A finalized bill.
///
/// ## Invariants
/// - `total_amount`, `total_cost`, `profit` are the rounded sums of the
///   corresponding line fields
/// - `bill_number` is `BILL-` + `sequence` padded to three digits
/// - `timestamp` is `date` at [`crate::BILL_TIMESTAMP_HOUR`]
///
/// Only [`crate::reconcile`] produces these; never patch a total directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub sequence: u64,
    pub bill_number: String,
    #[serde(with = "bill_date")]
    #[ts(as = "String")]
    pub date: NaiveDate,
    #[ts(as = "String")]
    pub timestamp: NaiveDateTime,
    pub items: Vec<BillLine>,
    pub total_amount: f64,
    pub total_cost: f64,
    pub profit: f64,
}

impl Bill {
    /// Assembles a reconciled bill for `date` from its lines.
    pub fn new(sequence: u64, date: NaiveDate, items: Vec<BillLine>) -> Self {
        let draft = Bill {
            sequence,
            bill_number: sequence::format_bill_number(sequence),
            date,
            timestamp: reconcile::derive_timestamp(date),
            items,
            total_amount: 0.0,
            total_cost: 0.0,
            profit: 0.0,
        };
        reconcile::rebuild_totals(&draft)
    }

    /// Date as written on the bill (`DD-MM-YYYY`).
    pub fn date_label(&self) -> String {
        bill_date::format(self.date)
    }
}

/// Identity handed out by the bill sequencer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BillIdentity {
    pub sequence: u64,
    pub bill_number: String,
}

/// An edit to one line of an archived bill, addressed by item id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineEdit {
    pub item_id: u64,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub store_rate: Option<f64>,
    #[serde(default)]
    pub purchase_rate: Option<f64>,
}

// =============================================================================
// Bill Date Wire Format
// =============================================================================

/// `DD-MM-YYYY` (de)serialization for bill dates.
pub mod bill_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::BILL_DATE_FORMAT;

    pub fn format(date: NaiveDate) -> String {
        date.format(BILL_DATE_FORMAT).to_string()
    }

    pub fn parse(value: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(value.trim(), BILL_DATE_FORMAT).ok()
    }

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid bill date '{}', expected DD-MM-YYYY", raw))
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
