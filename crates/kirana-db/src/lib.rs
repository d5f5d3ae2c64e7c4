//! # kirana-db: Persistence Layer for Kirana
//!
//! Stores every collection as one JSON document in a SQLite key/value
//! table, and hosts the [`Register`] that runs checkout, bill edits and
//! archive loading on top of the pure rules in `kirana-core`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kirana Data Flow                                 │
//! │                                                                         │
//! │  CLI command (kirana checkout)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     kirana-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Register    │    │  Repositories │    │   KvStore    │  │   │
//! │  │   │ (register.rs) │───►│ catalog stock │───►│  (store.rs)  │  │   │
//! │  │   │               │    │ bills cart    │    │              │  │   │
//! │  │   │ checkout      │    │ sequencer     │    │ get / set    │  │   │
//! │  │   │ edit / delete │    │               │    │ remove       │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────┬───────┘  │   │
//! │  │                                                     │          │   │
//! │  └─────────────────────────────────────────────────────┼──────────┘   │
//! │                                                        ▼              │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  SQLite kv_store(key, value, updated_at)                        │   │
//! │  │  items · stockData · bills · cart · nextBillSequence            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`store`] - The key/value store and its logical keys
//! - [`repository`] - One repository per persisted collection
//! - [`register`] - The checkout / edit / load operations
//! - [`error`] - Database error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kirana_db::{Database, DbConfig, Register};
//!
//! let db = Database::new(DbConfig::new("kirana.db")).await?;
//! let register = Register::new(db);
//!
//! register.cart_add(1, 2.0).await?;
//! let bill = register.checkout_cart().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod register;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use register::Register;
pub use store::KvStore;

// Repository re-exports for convenience
pub use repository::{
    BillArchiveRepository, BillSequencer, CartRepository, CatalogRepository, StockRepository,
};
