//! # Register
//!
//! The application context behind every counter operation: checkout,
//! archive loading, bill edits and deletions, and stock queries.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Checkout Sequence                               │
//! │                                                                         │
//! │  checkout(lines)                                                        │
//! │     │                                                                   │
//! │     ├── 1. validate lines      → EmptyCart / Validation, nothing written│
//! │     ├── 2. stock.check_sale    → InsufficientStock (Reject policy),     │
//! │     │                             no bill number burned                 │
//! │     ├── 3. sequencer.issue     → BILL-NNN, counter persisted            │
//! │     ├── 4. bill_from_cart      → reconciled lines and totals            │
//! │     ├── 5. stock decrement     → stockData written                      │
//! │     ├── 6. archive append      → bills written                          │
//! │     ▼                                                                   │
//! │  Bill                                                                   │
//! │                                                                         │
//! │  Each step is its own write. A failure after step 3 leaves a gap in     │
//! │  the numbering, never a reused number.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Operations run one at a time from a single caller; nothing here is
//! meant to be shared across concurrent writers.

use chrono::{Local, NaiveDate, Utc};
use kirana_core::reconcile::{apply_edits, bill_from_cart, validate_sale_lines};
use kirana_core::report::{self, DailyTotal, DateRange, SalesSummary};
use kirana_core::stock::StockMovement;
use kirana_core::{
    Bill, Cart, CartLine, CoreError, LineEdit, OversellPolicy, StockOp, StockOutcome,
};
use tracing::{debug, info, warn};

use crate::error::DbResult;
use crate::pool::Database;

/// Runs counter operations against one database.
#[derive(Debug, Clone)]
pub struct Register {
    db: Database,
    policy: OversellPolicy,
}

impl Register {
    /// A register using the default oversell policy.
    pub fn new(db: Database) -> Self {
        Self::with_policy(db, OversellPolicy::default())
    }

    pub fn with_policy(db: Database, policy: OversellPolicy) -> Self {
        Register { db, policy }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn policy(&self) -> OversellPolicy {
        self.policy
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Finalizes a sale dated today.
    pub async fn checkout(&self, lines: &[CartLine]) -> DbResult<Bill> {
        self.checkout_on(lines, Local::now().date_naive()).await
    }

    /// Finalizes a sale with an explicit bill date.
    pub async fn checkout_on(&self, lines: &[CartLine], date: NaiveDate) -> DbResult<Bill> {
        validate_sale_lines(lines)?;

        let stock = self.db.stock();
        let mut ledger = stock.load().await?;
        ledger.check_sale(lines, self.policy)?;

        let identity = self.db.sequencer().issue().await?;
        let bill = bill_from_cart(&identity, date, lines)?;

        let movements = ledger.decrement_for_sale(lines, Utc::now(), self.policy)?;
        stock.save(&ledger).await?;
        log_healed_entries(&bill, &movements);

        self.db.bills().append(bill.clone()).await?;

        info!(
            bill_number = %bill.bill_number,
            lines = bill.items.len(),
            total = bill.total_amount,
            profit = bill.profit,
            "Bill finalized"
        );
        Ok(bill)
    }

    /// Checks out the persisted cart dated today, clearing it on success.
    pub async fn checkout_cart(&self) -> DbResult<Bill> {
        self.checkout_cart_on(Local::now().date_naive()).await
    }

    pub async fn checkout_cart_on(&self, date: NaiveDate) -> DbResult<Bill> {
        let cart = self.db.cart().load().await?;
        let bill = self.checkout_on(cart.lines(), date).await?;
        self.db.cart().clear().await?;
        Ok(bill)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Adds a catalog item to the persisted cart.
    pub async fn cart_add(&self, item_id: u64, quantity: f64) -> DbResult<Cart> {
        let catalog = self.db.catalog().load().await?;
        let item = catalog.require(item_id)?;

        self.update_cart(|cart| cart.add_line(item, quantity)).await
    }

    pub async fn cart_remove(&self, item_id: u64) -> DbResult<Cart> {
        self.update_cart(|cart| cart.remove_line(item_id)).await
    }

    pub async fn cart_set(&self, item_id: u64, quantity: f64) -> DbResult<Cart> {
        self.update_cart(|cart| cart.set_quantity(item_id, quantity)).await
    }

    pub async fn cart_adjust(&self, item_id: u64, delta: f64) -> DbResult<Cart> {
        self.update_cart(|cart| cart.adjust_quantity(item_id, delta)).await
    }

    pub async fn cart_clear(&self) -> DbResult<()> {
        self.db.cart().clear().await
    }

    pub async fn cart_view(&self) -> DbResult<Cart> {
        self.db.cart().load().await
    }

    async fn update_cart<F>(&self, change: F) -> DbResult<Cart>
    where
        F: FnOnce(&mut Cart) -> kirana_core::CoreResult<()>,
    {
        let repo = self.db.cart();
        let mut cart = repo.load().await?;
        change(&mut cart)?;
        repo.save(&cart).await?;
        Ok(cart)
    }

    // =========================================================================
    // Archive
    // =========================================================================

    /// Every bill in archive order, normalized.
    pub async fn load_archive(&self) -> DbResult<Vec<Bill>> {
        self.db.bills().list().await
    }

    pub async fn bill(&self, bill_number: &str) -> DbResult<Bill> {
        self.db.bills().get(bill_number).await
    }

    /// Applies line edits and an optional date change, then replaces the
    /// archived bill. Invalid edits write nothing.
    pub async fn edit_bill(
        &self,
        bill_number: &str,
        edits: &[LineEdit],
        date: Option<NaiveDate>,
    ) -> DbResult<Bill> {
        let bills = self.db.bills();
        let current = bills.get(bill_number).await?;
        let edited = apply_edits(&current, edits, date)?;
        bills.replace(bill_number, edited.clone()).await?;

        info!(
            bill_number = %bill_number,
            edits = edits.len(),
            total = edited.total_amount,
            "Bill edited"
        );
        Ok(edited)
    }

    pub async fn delete_bill(&self, bill_number: &str) -> DbResult<Bill> {
        self.db.bills().remove_one(bill_number).await
    }

    /// Deletes every listed bill that exists. Returns how many were removed.
    pub async fn delete_bills<S: AsRef<str>>(&self, bill_numbers: &[S]) -> DbResult<usize> {
        self.db.bills().remove_many(bill_numbers).await
    }

    // =========================================================================
    // Stock
    // =========================================================================

    /// On-hand quantity; zero for an item never stocked.
    pub async fn current_stock(&self, item_id: u64) -> DbResult<f64> {
        self.db.stock().quantity(item_id).await
    }

    /// Applies a manual stock operation.
    ///
    /// The entry's name is taken from the catalog, or from an existing
    /// stock entry for an item since removed from the catalog.
    pub async fn adjust_stock(
        &self,
        item_id: u64,
        op: StockOp,
        amount: f64,
    ) -> DbResult<StockMovement> {
        let name = match self.db.catalog().get(item_id).await? {
            Some(item) => item.name,
            None => self
                .db
                .stock()
                .get(item_id)
                .await?
                .map(|entry| entry.item_name)
                .ok_or(CoreError::ItemNotFound(item_id))?,
        };

        self.db
            .stock()
            .apply(item_id, &name, op, amount, self.policy)
            .await
    }

    // =========================================================================
    // Reports
    // =========================================================================

    /// Bills in `range`, newest first.
    pub async fn bills_in_range(&self, range: &DateRange) -> DbResult<Vec<Bill>> {
        let bills = self.db.bills().filter_by_date_range(range).await?;
        Ok(report::newest_first(bills.iter().collect())
            .into_iter()
            .cloned()
            .collect())
    }

    pub async fn sales_summary(&self, range: &DateRange) -> DbResult<SalesSummary> {
        let bills = self.db.bills().filter_by_date_range(range).await?;
        debug!(bills = bills.len(), "Summarizing sales");
        Ok(report::summarize(&bills))
    }

    pub async fn daily_totals(&self, range: &DateRange) -> DbResult<Vec<DailyTotal>> {
        let bills = self.db.bills().filter_by_date_range(range).await?;
        Ok(report::daily_totals(&bills))
    }
}

fn log_healed_entries(bill: &Bill, movements: &[StockMovement]) {
    for movement in movements
        .iter()
        .filter(|m| m.outcome == StockOutcome::Created)
    {
        warn!(
            bill_number = %bill.bill_number,
            item_id = movement.item_id,
            item_name = %movement.item_name,
            "Sold item had no stock entry, created one at zero"
        );
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::DbConfig;
    use kirana_core::ItemDraft;

    async fn register() -> Register {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.catalog()
            .add(ItemDraft::new("RICE", "KG", 60.0, 50.0))
            .await
            .unwrap();
        Register::new(db)
    }

    #[tokio::test]
    async fn test_empty_checkout_issues_nothing() {
        let register = register().await;

        let err = register.checkout(&[]).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::EmptyCart)));
        assert_eq!(register.database().sequencer().stored_counter().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_cart_add_requires_catalog_item() {
        let register = register().await;

        let err = register.cart_add(99, 1.0).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::ItemNotFound(99))));

        let cart = register.cart_add(1, 1.0).await.unwrap();
        let cart_after = register.cart_add(1, 0.5).await.unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart_after.lines()[0].quantity, 1.5);
    }

    #[tokio::test]
    async fn test_checkout_cart_clears_on_success() {
        let register = register().await;
        register.adjust_stock(1, StockOp::Set, 10.0).await.unwrap();
        register.cart_add(1, 2.0).await.unwrap();

        let bill = register.checkout_cart().await.unwrap();
        assert_eq!(bill.bill_number, "BILL-001");
        assert_eq!(bill.total_amount, 120.0);
        assert!(register.cart_view().await.unwrap().is_empty());
        assert_eq!(register.current_stock(1).await.unwrap(), 8.0);
    }

    #[tokio::test]
    async fn test_adjust_stock_unknown_item() {
        let register = register().await;

        let err = register.adjust_stock(42, StockOp::Add, 1.0).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::ItemNotFound(42))));
    }

    #[tokio::test]
    async fn test_adjust_stock_keeps_name_after_catalog_removal() {
        let register = register().await;
        register.adjust_stock(1, StockOp::Set, 4.0).await.unwrap();
        register.database().catalog().remove(1).await.unwrap();

        let movement = register.adjust_stock(1, StockOp::Add, 1.0).await.unwrap();
        assert_eq!(movement.item_name, "RICE");
        assert_eq!(movement.quantity, 5.0);
    }
}
