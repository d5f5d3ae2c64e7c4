//! # Repository Module
//!
//! One repository per persisted collection.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Register / CLI                                                         │
//! │       │                                                                 │
//! │       │  db.catalog().add(draft)                                        │
//! │       ▼                                                                 │
//! │  CatalogRepository                                                      │
//! │  ├── load()           KvStore::get("items") → Catalog                   │
//! │  ├── Catalog::add()   pure rule from kirana-core                        │
//! │  └── save()           KvStore::set("items", &catalog)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite kv_store                                                        │
//! │                                                                         │
//! │  Every mutation is load → apply core rule → write the whole document.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CatalogRepository`] - items
//! - [`StockRepository`] - stockData
//! - [`BillArchiveRepository`] - bills, normalized on load
//! - [`BillSequencer`] - nextBillSequence
//! - [`CartRepository`] - cart

pub mod bills;
pub mod cart;
pub mod catalog;
pub mod sequence;
pub mod stock;

pub use bills::BillArchiveRepository;
pub use cart::CartRepository;
pub use catalog::CatalogRepository;
pub use sequence::BillSequencer;
pub use stock::StockRepository;
