//! # Bill Reconciler
//!
//! The only place bill amounts and totals are computed.
//!
//! ## Where It Runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  checkout ──► bill_from_cart ──┐                                        │
//! │                                │                                        │
//! │  edit ──────► apply_edits ─────┼──► rebuild_totals ──► recalculate_line │
//! │                                │         (pure)           (per line)    │
//! │  load ──────► normalize ───────┘                                        │
//! │                                                                         │
//! │  amount = round2(store_rate × quantity)                                 │
//! │  cost   = round2(purchase_rate × quantity)                              │
//! │  profit = round2(amount − cost)                                         │
//! │  totals = round2(Σ line field)                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lines are recomputed from their own quantity and rates, never from the
//! live catalog.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{finite_or_zero, round2, sum_round2};
use crate::record::StoredBill;
use crate::sequence::{format_bill_number, parse_bill_sequence};
use crate::types::{bill_date, Bill, BillIdentity, BillLine, CartLine, LineEdit};
use crate::validation::{validate_quantity, validate_rate};
use crate::BILL_TIMESTAMP_HOUR;

// =============================================================================
// Line and Totals
// =============================================================================

/// Recomputes a line's amount, cost and profit from its quantity and rates.
pub fn recalculate_line(line: &BillLine) -> BillLine {
    let quantity = finite_or_zero(line.quantity);
    let store_rate = finite_or_zero(line.store_rate);
    let purchase_rate = finite_or_zero(line.purchase_rate);

    let amount = round2(store_rate * quantity);
    let cost = round2(purchase_rate * quantity);

    BillLine {
        quantity,
        store_rate,
        purchase_rate,
        amount,
        cost,
        profit: round2(amount - cost),
        ..line.clone()
    }
}

/// Returns a copy of `bill` with every line recalculated and the three
/// totals set to the rounded sums of the line fields.
pub fn rebuild_totals(bill: &Bill) -> Bill {
    let items: Vec<BillLine> = bill.items.iter().map(recalculate_line).collect();

    Bill {
        total_amount: sum_round2(items.iter().map(|l| l.amount)),
        total_cost: sum_round2(items.iter().map(|l| l.cost)),
        profit: sum_round2(items.iter().map(|l| l.profit)),
        items,
        ..bill.clone()
    }
}

/// The timestamp every bill dated `date` carries.
pub fn derive_timestamp(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN) + Duration::hours(i64::from(BILL_TIMESTAMP_HOUR))
}

// =============================================================================
// Normalization
// =============================================================================

/// A canonical bill and whether producing it changed the stored record.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub bill: Bill,
    pub changed: bool,
}

/// Turns a stored record into a canonical [`Bill`].
///
/// ## Repairs
/// - missing `sequence` → digits of `billNumber`, or 0 if there are none
///   ([`crate::archive::BillArchive::from_stored`] numbers those past the max)
/// - missing `billNumber` → formatted from the sequence
/// - `timestamp` → re-derived from `date`
/// - unparseable `date` → calendar date of `timestamp`
/// - lines and totals → [`rebuild_totals`]
///
/// `changed` is true iff writing the result back would alter the record,
/// so normalizing an already-normalized bill reports `false`.
///
/// ## Errors
/// [`CoreError::CorruptBill`] when neither `date` nor `timestamp` parse.
pub fn normalize(stored: &StoredBill) -> CoreResult<Normalized> {
    let date = bill_date::parse(&stored.date)
        .or_else(|| parse_timestamp(&stored.timestamp).map(|ts| ts.date()))
        .ok_or_else(|| CoreError::CorruptBill {
            bill_number: stored.bill_number.clone(),
            reason: format!(
                "unreadable date '{}' and timestamp '{}'",
                stored.date, stored.timestamp
            ),
        })?;

    let sequence = stored
        .sequence
        .or_else(|| parse_bill_sequence(&stored.bill_number))
        .unwrap_or(0);

    let bill_number = if stored.bill_number.trim().is_empty() {
        format_bill_number(sequence)
    } else {
        stored.bill_number.clone()
    };

    let items = stored
        .items
        .iter()
        .map(|line| {
            BillLine::new(
                line.id,
                &line.name,
                &line.unit,
                line.quantity,
                line.store_rate,
                line.purchase_rate,
            )
        })
        .collect();

    let bill = rebuild_totals(&Bill {
        sequence,
        bill_number,
        date,
        timestamp: derive_timestamp(date),
        items,
        total_amount: 0.0,
        total_cost: 0.0,
        profit: 0.0,
    });

    let changed = StoredBill::from(&bill) != *stored;
    Ok(Normalized { bill, changed })
}

/// Reads the timestamp formats older versions wrote.
fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(value) {
        return Some(with_offset.naive_local());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(derive_timestamp)
        })
}

// =============================================================================
// Construction and Editing
// =============================================================================

/// Checks that `lines` can become a bill: at least one line, each with a
/// positive quantity and non-negative rates, and no item id twice.
pub fn validate_sale_lines(lines: &[CartLine]) -> CoreResult<()> {
    if lines.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    for (index, line) in lines.iter().enumerate() {
        validate_quantity(line.quantity)?;
        validate_rate("storeRate", line.store_rate)?;
        validate_rate("purchaseRate", line.purchase_rate)?;

        if lines[..index].iter().any(|earlier| earlier.id == line.id) {
            return Err(ValidationError::invalid_format(
                "items",
                format!("item {} appears on more than one line", line.id),
            )
            .into());
        }
    }

    Ok(())
}

/// Builds the finalized bill for a cart.
///
/// ## Errors
/// Anything [`validate_sale_lines`] rejects.
pub fn bill_from_cart(
    identity: &BillIdentity,
    date: NaiveDate,
    lines: &[CartLine],
) -> CoreResult<Bill> {
    validate_sale_lines(lines)?;

    let mut bill = Bill::new(identity.sequence, date, lines.iter().map(BillLine::from).collect());
    bill.bill_number = identity.bill_number.clone();
    Ok(bill)
}

/// Applies line edits and an optional new date to a working copy of `bill`.
///
/// Every edit is validated and every addressed line must exist before the
/// result is produced. The returned bill is fully reconciled; `bill` itself
/// is untouched.
pub fn apply_edits(bill: &Bill, edits: &[LineEdit], date: Option<NaiveDate>) -> CoreResult<Bill> {
    let mut working = bill.clone();

    for edit in edits {
        let line = working
            .items
            .iter_mut()
            .find(|line| line.id == edit.item_id)
            .ok_or_else(|| CoreError::LineNotFound {
                bill_number: bill.bill_number.clone(),
                item_id: edit.item_id,
            })?;

        if let Some(quantity) = edit.quantity {
            validate_quantity(quantity)?;
            line.quantity = quantity;
        }
        if let Some(rate) = edit.store_rate {
            validate_rate("storeRate", rate)?;
            line.store_rate = rate;
        }
        if let Some(rate) = edit.purchase_rate {
            validate_rate("purchaseRate", rate)?;
            line.purchase_rate = rate;
        }
        *line = recalculate_line(line);
    }

    if let Some(date) = date {
        working.date = date;
        working.timestamp = derive_timestamp(date);
    }

    Ok(rebuild_totals(&working))
}

// =============================================================================
// Unit Tests
// =============================================================================
