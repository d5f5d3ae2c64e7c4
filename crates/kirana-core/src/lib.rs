//! # kirana-core: Pure Bookkeeping Logic for Kirana
//!
//! Every rule that keeps the store's books consistent lives here as plain
//! functions over plain records. Nothing in this crate touches a database,
//! a file, or the clock; callers pass "now" and "today" in.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kirana Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 apps/cli (presentation)                         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             kirana-db: KvStore, repositories, Register           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kirana-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   money · types · validation · catalog · stock · cart          │   │
//! │  │   sequence · reconcile · archive · report · record             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - `round2` and display formatting
//! - [`types`] - Item, StockEntry, CartLine, BillLine, Bill
//! - [`record`] - lenient persisted shapes for bills written by older versions
//! - [`validation`] - input checks, run before any mutation
//! - [`catalog`] - ordered item collection with sequential ids
//! - [`stock`] - per-item on-hand ledger with floor-at-zero subtraction
//! - [`cart`] - in-progress sale
//! - [`sequence`] - bill number issuance arithmetic
//! - [`reconcile`] - line/total recomputation and record normalization
//! - [`archive`] - finalized bill collection
//! - [`report`] - date-range filters, summaries, chart feed
//!
//! ## Example Usage
//!
//! ```rust
//! use kirana_core::money::round2;
//! use kirana_core::reconcile::rebuild_totals;
//! use kirana_core::types::{Bill, BillLine};
//! use chrono::NaiveDate;
//!
//! let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
//! let bill = Bill::new(
//!     1,
//!     date,
//!     vec![
//!         BillLine::new(1, "Rice", "KG", 2.0, 100.0, 80.0),
//!         BillLine::new(2, "Dal", "KG", 0.5, 50.0, 40.0),
//!     ],
//! );
//! let bill = rebuild_totals(&bill);
//!
//! assert_eq!(bill.total_amount, 225.0);
//! assert_eq!(bill.profit, 45.0);
//! assert_eq!(round2(10.005), 10.01);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod archive;
pub mod cart;
pub mod catalog;
pub mod error;
pub mod money;
pub mod reconcile;
pub mod record;
pub mod report;
pub mod sequence;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use archive::BillArchive;
pub use cart::Cart;
pub use catalog::Catalog;
pub use error::{CoreError, CoreResult, ValidationError};
pub use record::{StoredBill, StoredBillLine};
pub use stock::{OversellPolicy, StockLedger, StockOutcome};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Prefix of every human-readable bill number (`BILL-007`).
pub const BILL_NUMBER_PREFIX: &str = "BILL-";

/// Minimum digits in the numeric part of a bill number.
pub const BILL_NUMBER_WIDTH: usize = 3;

/// Hour of day stamped on timestamps derived from a bill date.
///
/// Bills are dated by calendar day only, so the derived timestamp sits at
/// midday to stay on the same calendar day in any nearby timezone.
pub const BILL_TIMESTAMP_HOUR: u32 = 12;

/// Wire format of bill dates.
pub const BILL_DATE_FORMAT: &str = "%d-%m-%Y";
