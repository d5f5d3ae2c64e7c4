//! # Stock Repository
//!
//! Persists the stock ledger under the `stockData` key.

use chrono::Utc;
use kirana_core::stock::StockMovement;
use kirana_core::{OversellPolicy, StockEntry, StockLedger, StockOp, StockOutcome};
use tracing::{debug, info};

use crate::error::DbResult;
use crate::store::{keys, KvStore};

/// Repository for on-hand stock.
#[derive(Debug, Clone)]
pub struct StockRepository {
    store: KvStore,
}

impl StockRepository {
    pub fn new(store: KvStore) -> Self {
        StockRepository { store }
    }

    pub async fn load(&self) -> DbResult<StockLedger> {
        Ok(self.store.get(keys::STOCK).await?.unwrap_or_default())
    }

    pub async fn save(&self, ledger: &StockLedger) -> DbResult<()> {
        self.store.set(keys::STOCK, ledger).await
    }

    pub async fn get(&self, item_id: u64) -> DbResult<Option<StockEntry>> {
        Ok(self.load().await?.get(item_id).cloned())
    }

    /// On-hand quantity; an item never stocked has zero.
    pub async fn quantity(&self, item_id: u64) -> DbResult<f64> {
        Ok(self.load().await?.quantity(item_id))
    }

    /// Applies one stock operation and persists the ledger.
    ///
    /// Rejected operations write nothing.
    pub async fn apply(
        &self,
        item_id: u64,
        item_name: &str,
        op: StockOp,
        amount: f64,
        policy: OversellPolicy,
    ) -> DbResult<StockMovement> {
        let mut ledger = self.load().await?;
        let movement = ledger.apply(item_id, item_name, op, amount, Utc::now(), policy)?;
        self.save(&ledger).await?;

        match movement.outcome {
            StockOutcome::Created => info!(
                item_id,
                op = %op,
                amount,
                quantity = movement.quantity,
                "Stock entry created"
            ),
            StockOutcome::Reconciled => debug!(
                item_id,
                op = %op,
                amount,
                quantity = movement.quantity,
                "Stock updated"
            ),
        }

        Ok(movement)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
