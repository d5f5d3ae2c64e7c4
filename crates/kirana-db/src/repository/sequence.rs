//! # Bill Sequencer
//!
//! Issues bill numbers and persists the next-available counter under
//! `nextBillSequence`.
//!
//! ## Issue Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  issue()                                                                │
//! │     │                                                                   │
//! │     ├── read nextBillSequence          (absent on a fresh or legacy     │
//! │     │                                   store)                          │
//! │     ├── read archive max sequence      (legacy bills contribute via     │
//! │     │                                   their billNumber digits)        │
//! │     ▼                                                                   │
//! │  next = sequence::next_sequence(counter, max)                           │
//! │     │                                                                   │
//! │     ├── write nextBillSequence = next + 1                               │
//! │     ▼                                                                   │
//! │  BillIdentity { next, "BILL-" + pad3(next) }                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Deleting bills never lowers the counter, so numbers are never reused.

use kirana_core::sequence::{counter_is_stale, format_bill_number, next_sequence};
use kirana_core::BillIdentity;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use crate::repository::BillArchiveRepository;
use crate::store::{keys, KvStore};

/// Hands out strictly increasing bill sequences.
#[derive(Debug, Clone)]
pub struct BillSequencer {
    store: KvStore,
}

impl BillSequencer {
    pub fn new(store: KvStore) -> Self {
        BillSequencer { store }
    }

    /// The persisted counter, if one has been written.
    pub async fn stored_counter(&self) -> DbResult<Option<u64>> {
        self.store.get(keys::NEXT_BILL_SEQUENCE).await
    }

    /// The sequence the next `issue` would return, without issuing it.
    pub async fn peek(&self) -> DbResult<u64> {
        let counter = self.stored_counter().await?;
        let archive_max = self.archive_max().await?;
        Ok(next_sequence(counter, archive_max))
    }

    /// Issues the next sequence and persists the counter past it.
    pub async fn issue(&self) -> DbResult<BillIdentity> {
        let counter = self.stored_counter().await?;
        let archive_max = self.archive_max().await?;

        if counter_is_stale(counter, archive_max) {
            warn!(
                counter = ?counter,
                archive_max = ?archive_max,
                "Stored bill counter is behind the archive, skipping ahead"
            );
        }

        let sequence = next_sequence(counter, archive_max);
        let following = sequence
            .checked_add(1)
            .ok_or_else(|| DbError::Internal(format!("bill sequence {} is exhausted", sequence)))?;
        self.store.set(keys::NEXT_BILL_SEQUENCE, &following).await?;

        let identity = BillIdentity {
            sequence,
            bill_number: format_bill_number(sequence),
        };
        debug!(sequence, bill_number = %identity.bill_number, "Bill number issued");
        Ok(identity)
    }

    async fn archive_max(&self) -> DbResult<Option<u64>> {
        let archive = BillArchiveRepository::new(self.store.clone()).load().await?;
        Ok(archive.max_sequence())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
