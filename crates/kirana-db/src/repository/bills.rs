//! # Bill Archive Repository
//!
//! Persists finalized bills under the `bills` key.
//!
//! ## Load Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  KvStore::get("bills") → Vec<StoredBill>   (lenient, never fails on     │
//! │       │                                     old field shapes)           │
//! │       ▼                                                                 │
//! │  BillArchive::from_stored → normalize each record                       │
//! │       │                                                                 │
//! │       ├── CorruptBill? → error, nothing written                         │
//! │       │                                                                 │
//! │       ├── changed?     → write the canonical archive back once          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BillArchive (canonical)                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutation rewrites the whole archive.

use kirana_core::archive::LoadedArchive;
use kirana_core::report::DateRange;
use kirana_core::{Bill, BillArchive, StoredBill};
use tracing::{debug, info};

use crate::error::DbResult;
use crate::store::{keys, KvStore};

/// Repository for finalized bills.
#[derive(Debug, Clone)]
pub struct BillArchiveRepository {
    store: KvStore,
}

impl BillArchiveRepository {
    pub fn new(store: KvStore) -> Self {
        BillArchiveRepository { store }
    }

    /// Raw stored records, exactly as found.
    pub async fn load_stored(&self) -> DbResult<Vec<StoredBill>> {
        Ok(self.store.get(keys::BILLS).await?.unwrap_or_default())
    }

    /// Loads and normalizes the archive, writing it back if any record
    /// changed.
    pub async fn load(&self) -> DbResult<BillArchive> {
        let records = self.load_stored().await?;
        let LoadedArchive { archive, changed } = BillArchive::from_stored(&records)?;

        if changed {
            self.save(&archive).await?;
            info!(bills = archive.len(), "Normalized stored bills");
        }

        Ok(archive)
    }

    pub async fn save(&self, archive: &BillArchive) -> DbResult<()> {
        self.store.set(keys::BILLS, &archive.to_stored()).await
    }

    pub async fn list(&self) -> DbResult<Vec<Bill>> {
        Ok(self.load().await?.into_bills())
    }

    pub async fn get(&self, bill_number: &str) -> DbResult<Bill> {
        Ok(self.load().await?.require(bill_number)?.clone())
    }

    pub async fn append(&self, bill: Bill) -> DbResult<()> {
        let mut archive = self.load().await?;
        let bill_number = bill.bill_number.clone();
        archive.append(bill)?;
        self.save(&archive).await?;

        debug!(bill_number = %bill_number, bills = archive.len(), "Bill appended");
        Ok(())
    }

    pub async fn replace(&self, bill_number: &str, bill: Bill) -> DbResult<()> {
        let mut archive = self.load().await?;
        archive.replace(bill_number, bill)?;
        self.save(&archive).await?;

        debug!(bill_number = %bill_number, "Bill replaced");
        Ok(())
    }

    pub async fn remove_one(&self, bill_number: &str) -> DbResult<Bill> {
        let mut archive = self.load().await?;
        let removed = archive.remove_one(bill_number)?;
        self.save(&archive).await?;

        info!(bill_number = %bill_number, "Bill deleted");
        Ok(removed)
    }

    /// Removes every listed bill that exists. Returns how many were removed.
    pub async fn remove_many<S: AsRef<str>>(&self, bill_numbers: &[S]) -> DbResult<usize> {
        let mut archive = self.load().await?;
        let removed = archive.remove_many(bill_numbers);
        if removed > 0 {
            self.save(&archive).await?;
        }

        info!(requested = bill_numbers.len(), removed, "Bills deleted");
        Ok(removed)
    }

    /// Bills whose timestamp falls in `range`, in archive order.
    pub async fn filter_by_date_range(&self, range: &DateRange) -> DbResult<Vec<Bill>> {
        let archive = self.load().await?;
        Ok(archive
            .filter_by_date_range(range)
            .into_iter()
            .cloned()
            .collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
