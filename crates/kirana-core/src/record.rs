//! # Persisted Bill Records
//!
//! The archive has been written by several versions of the application.
//! Older records may lack `sequence`, carry numbers as strings, or hold
//! timestamps in whatever format the writer used at the time.
//!
//! [`StoredBill`] accepts all of that without failing. It is the only shape
//! read from storage; [`crate::reconcile::normalize`] turns it into a
//! canonical [`Bill`] and reports whether anything had to change.
//!
//! ```text
//!   storage JSON ──► StoredBill (lenient) ──► normalize ──► Bill (canonical)
//!        ▲                                                    │
//!        └──────────── StoredBill::from(&Bill) ◄──────────────┘
//! ```
//!
//! Writing always goes through `StoredBill::from(&Bill)`, so a record that
//! is already canonical reads back equal to what was written.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::money::finite_or_zero;
use crate::types::{bill_date, Bill, BillLine};

/// Wire format of bill timestamps (ISO-8601, no offset).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// =============================================================================
// Stored Shapes
// =============================================================================

/// A bill as found in storage.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredBill {
    #[serde(
        default,
        deserialize_with = "lenient_sequence",
        skip_serializing_if = "Option::is_none"
    )]
    pub sequence: Option<u64>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub bill_number: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub timestamp: String,

    #[serde(default)]
    pub items: Vec<StoredBillLine>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub total_amount: f64,

    #[serde(default, deserialize_with = "lenient_number")]
    pub total_cost: f64,

    #[serde(default, deserialize_with = "lenient_number")]
    pub profit: f64,
}

/// A bill line as found in storage.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredBillLine {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: u64,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub unit: String,

    #[serde(default, deserialize_with = "lenient_number")]
    pub quantity: f64,

    #[serde(default, deserialize_with = "lenient_number")]
    pub store_rate: f64,

    #[serde(default, deserialize_with = "lenient_number")]
    pub purchase_rate: f64,

    #[serde(default, deserialize_with = "lenient_number")]
    pub amount: f64,

    #[serde(default, deserialize_with = "lenient_number")]
    pub cost: f64,

    #[serde(default, deserialize_with = "lenient_number")]
    pub profit: f64,
}

impl From<&Bill> for StoredBill {
    fn from(bill: &Bill) -> Self {
        StoredBill {
            sequence: Some(bill.sequence),
            bill_number: bill.bill_number.clone(),
            date: bill_date::format(bill.date),
            timestamp: bill.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            items: bill.items.iter().map(StoredBillLine::from).collect(),
            total_amount: bill.total_amount,
            total_cost: bill.total_cost,
            profit: bill.profit,
        }
    }
}

impl From<&BillLine> for StoredBillLine {
    fn from(line: &BillLine) -> Self {
        StoredBillLine {
            id: line.id,
            name: line.name.clone(),
            unit: line.unit.clone(),
            quantity: line.quantity,
            store_rate: line.store_rate,
            purchase_rate: line.purchase_rate,
            amount: line.amount,
            cost: line.cost,
            profit: line.profit,
        }
    }
}

// =============================================================================
// Lenient Deserializers
// =============================================================================

/// Number, numeric string, or anything else (→ 0). Never fails.
fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let number = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(finite_or_zero(number))
}

/// Non-negative integer from a number or numeric string; anything else is absent.
fn lenient_sequence<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(whole_u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    })
}

fn lenient_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_sequence(deserializer)?.unwrap_or(0))
}

/// Strings pass through; numbers are stringified; null and the rest are empty.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn whole_u64(value: f64) -> Option<u64> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64 {
        Some(value as u64)
    } else {
        None
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
