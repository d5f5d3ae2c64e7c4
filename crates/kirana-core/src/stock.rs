//! # Stock Ledger
//!
//! One entry per item id tracking the on-hand quantity.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  set(5)        quantity := 5                                            │
//! │  add(3)        quantity := quantity + 3                                 │
//! │  subtract(8)   Clamp:  quantity := max(0, quantity - 8)                 │
//! │                Reject: InsufficientStock if 8 > quantity                │
//! │                                                                         │
//! │  Entry missing? It is created at 0 first and the change is reported     │
//! │  as StockOutcome::Created instead of StockOutcome::Reconciled.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariant
//! No entry ever holds a negative quantity.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{CartLine, StockEntry, StockOp};
use crate::validation::validate_stock_amount;

// =============================================================================
// Policy and Outcome
// =============================================================================

/// What a subtraction larger than the on-hand quantity does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OversellPolicy {
    /// Floor at zero silently.
    #[default]
    Clamp,
    /// Fail with [`CoreError::InsufficientStock`] before any change.
    Reject,
}

impl FromStr for OversellPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "clamp" => Ok(OversellPolicy::Clamp),
            "reject" => Ok(OversellPolicy::Reject),
            other => Err(ValidationError::invalid_format(
                "oversell policy",
                format!("'{}' is not one of clamp, reject", other),
            )),
        }
    }
}

impl fmt::Display for OversellPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OversellPolicy::Clamp => f.write_str("clamp"),
            OversellPolicy::Reject => f.write_str("reject"),
        }
    }
}

/// Whether a stock change found an existing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockOutcome {
    /// The entry existed and was updated.
    Reconciled,
    /// No entry existed; one was created. For a sale this is a healed
    /// inconsistency.
    Created,
}

/// Result of one applied stock change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub item_id: u64,
    pub item_name: String,
    /// Quantity after the change.
    pub quantity: f64,
    pub outcome: StockOutcome,
}

// =============================================================================
// Ledger
// =============================================================================

/// Per-item on-hand quantities. Serializes as a plain JSON array.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockLedger {
    entries: Vec<StockEntry>,
}

impl StockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[StockEntry] {
        &self.entries
    }

    pub fn get(&self, item_id: u64) -> Option<&StockEntry> {
        self.entries.iter().find(|entry| entry.item_id == item_id)
    }

    /// On-hand quantity; an absent entry counts as zero.
    pub fn quantity(&self, item_id: u64) -> f64 {
        self.get(item_id).map(|entry| entry.quantity).unwrap_or(0.0)
    }

    /// Applies one operation, creating the entry if it does not exist.
    ///
    /// The amount is validated first; on any error nothing changes.
    pub fn apply(
        &mut self,
        item_id: u64,
        item_name: &str,
        op: StockOp,
        amount: f64,
        now: DateTime<Utc>,
        policy: OversellPolicy,
    ) -> CoreResult<StockMovement> {
        validate_stock_amount(amount)?;

        let current = self.quantity(item_id);
        let quantity = match op {
            StockOp::Set => amount,
            StockOp::Add => current + amount,
            StockOp::Subtract => {
                if policy == OversellPolicy::Reject && amount > current {
                    return Err(CoreError::InsufficientStock {
                        item_id,
                        item_name: item_name.to_string(),
                        available: current,
                        requested: amount,
                    });
                }
                (current - amount).max(0.0)
            }
        };

        let entry = StockEntry {
            item_id,
            item_name: item_name.to_string(),
            quantity,
            last_updated: now,
        };

        let outcome = match self.entries.iter_mut().find(|e| e.item_id == item_id) {
            Some(existing) => {
                *existing = entry;
                StockOutcome::Reconciled
            }
            None => {
                self.entries.push(entry);
                StockOutcome::Created
            }
        };

        Ok(StockMovement {
            item_id,
            item_name: item_name.to_string(),
            quantity,
            outcome,
        })
    }

    /// Checks that a sale can be applied under `policy` without changing
    /// anything. Quantities of repeated item ids are combined.
    pub fn check_sale(&self, lines: &[CartLine], policy: OversellPolicy) -> CoreResult<()> {
        let mut requested: HashMap<u64, f64> = HashMap::new();
        for line in lines {
            validate_stock_amount(line.quantity)?;
            *requested.entry(line.id).or_insert(0.0) += line.quantity;
        }

        if policy == OversellPolicy::Clamp {
            return Ok(());
        }

        for line in lines {
            let wanted = requested.get(&line.id).copied().unwrap_or(0.0);
            let available = self.quantity(line.id);
            if wanted > available {
                return Err(CoreError::InsufficientStock {
                    item_id: line.id,
                    item_name: line.name.clone(),
                    available,
                    requested: wanted,
                });
            }
        }

        Ok(())
    }

    /// Subtracts every sold line from stock.
    ///
    /// The whole sale is checked with [`StockLedger::check_sale`] first, so
    /// either every line is applied or none is.
    pub fn decrement_for_sale(
        &mut self,
        lines: &[CartLine],
        now: DateTime<Utc>,
        policy: OversellPolicy,
    ) -> CoreResult<Vec<StockMovement>> {
        self.check_sale(lines, policy)?;

        lines
            .iter()
            .map(|line| {
                self.apply(
                    line.id,
                    &line.name,
                    StockOp::Subtract,
                    line.quantity,
                    now,
                    OversellPolicy::Clamp,
                )
            })
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap()
    }

    fn line(id: u64, name: &str, quantity: f64) -> CartLine {
        CartLine {
            id,
            name: name.to_string(),
            unit: "KG".to_string(),
            store_rate: 10.0,
            purchase_rate: 8.0,
            quantity,
        }
    }

    #[test]
    fn test_subtract_floors_at_zero() {
        let mut ledger = StockLedger::new();
        ledger
            .apply(1, "RICE", StockOp::Set, 5.0, now(), OversellPolicy::Clamp)
            .unwrap();

        let movement = ledger
            .apply(1, "RICE", StockOp::Subtract, 8.0, now(), OversellPolicy::Clamp)
            .unwrap();

        assert_eq!(movement.quantity, 0.0);
        assert_eq!(movement.outcome, StockOutcome::Reconciled);
        assert_eq!(ledger.quantity(1), 0.0);
    }

    #[test]
    fn test_subtract_rejected_under_reject_policy() {
        let mut ledger = StockLedger::new();
        ledger
            .apply(1, "RICE", StockOp::Set, 5.0, now(), OversellPolicy::Reject)
            .unwrap();
        let before = ledger.clone();

        let err = ledger
            .apply(1, "RICE", StockOp::Subtract, 8.0, now(), OversellPolicy::Reject)
            .unwrap_err();

        assert!(matches!(err, CoreError::InsufficientStock { available, requested, .. }
            if available == 5.0 && requested == 8.0));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_add_creates_missing_entry() {
        let mut ledger = StockLedger::new();
        let movement = ledger
            .apply(4, "DAL", StockOp::Add, 2.5, now(), OversellPolicy::Clamp)
            .unwrap();

        assert_eq!(movement.outcome, StockOutcome::Created);
        let entry = ledger.get(4).unwrap();
        assert_eq!(entry.quantity, 2.5);
        assert_eq!(entry.item_name, "DAL");
        assert_eq!(entry.last_updated, now());
    }

    #[test]
    fn test_invalid_amount_changes_nothing() {
        let mut ledger = StockLedger::new();
        assert!(ledger
            .apply(1, "RICE", StockOp::Set, -1.0, now(), OversellPolicy::Clamp)
            .is_err());
        assert!(ledger
            .apply(1, "RICE", StockOp::Add, f64::NAN, now(), OversellPolicy::Clamp)
            .is_err());
        assert!(ledger.entries().is_empty());
    }

    #[test]
    fn test_decrement_for_sale_reports_healed_entries() {
        let mut ledger = StockLedger::new();
        ledger
            .apply(1, "RICE", StockOp::Set, 10.0, now(), OversellPolicy::Clamp)
            .unwrap();

        let movements = ledger
            .decrement_for_sale(
                &[line(1, "RICE", 2.0), line(2, "DAL", 1.0)],
                now(),
                OversellPolicy::Clamp,
            )
            .unwrap();

        assert_eq!(movements[0].outcome, StockOutcome::Reconciled);
        assert_eq!(movements[0].quantity, 8.0);
        assert_eq!(movements[1].outcome, StockOutcome::Created);
        assert_eq!(movements[1].quantity, 0.0);
    }

    #[test]
    fn test_decrement_for_sale_is_all_or_nothing() {
        let mut ledger = StockLedger::new();
        ledger
            .apply(1, "RICE", StockOp::Set, 10.0, now(), OversellPolicy::Reject)
            .unwrap();
        let before = ledger.clone();

        let result = ledger.decrement_for_sale(
            &[line(1, "RICE", 2.0), line(2, "DAL", 1.0)],
            now(),
            OversellPolicy::Reject,
        );

        assert!(result.is_err());
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_check_sale_combines_repeated_lines() {
        let mut ledger = StockLedger::new();
        ledger
            .apply(1, "RICE", StockOp::Set, 3.0, now(), OversellPolicy::Clamp)
            .unwrap();

        let lines = [line(1, "RICE", 2.0), line(1, "RICE", 2.0)];
        assert!(ledger.check_sale(&lines, OversellPolicy::Clamp).is_ok());
        assert!(ledger.check_sale(&lines, OversellPolicy::Reject).is_err());
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("clamp".parse::<OversellPolicy>().unwrap(), OversellPolicy::Clamp);
        assert_eq!("REJECT".parse::<OversellPolicy>().unwrap(), OversellPolicy::Reject);
        assert!("maybe".parse::<OversellPolicy>().is_err());
        assert_eq!(OversellPolicy::default(), OversellPolicy::Clamp);
    }
}
