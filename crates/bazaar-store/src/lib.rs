//! # Bazaar Store
//!
//! Persistence for a vendor's sales. Each sale couples a contract document,
//! an order state, a read flag and the on-chain funding evidence for its
//! payment address.
//!
//! ## Overview
//!
//! Sales are stored behind the [`SaleStore`] trait. The primary
//! implementation is [`SqliteSaleStore`], with [`MemorySaleStore`] for tests.
//! A sale can be looked up by order id or by its resolved payment address.
//!
//! ## Key Types
//!
//! - [`SaleStore`] - The trait for all sale operations
//! - [`SqliteSaleStore`] - SQLite-based persistent storage
//! - [`MemorySaleStore`] - In-memory storage for tests
//! - [`SaleRow`] - The flat row image derived from a contract
//! - [`StoreConfig`] - Database path, busy timeout and journal mode
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bazaar_core::{Contract, OrderState, PaymentAddress};
//! use bazaar_store::{SaleStore, SqliteSaleStore};
//!
//! fn example(contract: &Contract) -> bazaar_store::Result<()> {
//!     let store = SqliteSaleStore::open("sales.db")?;
//!
//!     store.put("order1", contract, OrderState::Pending, false)?;
//!     store.update_funding("order1", true, &[])?;
//!
//!     let sale = store.get_by_payment_address(&PaymentAddress::new("1PayMe"))?;
//!     assert!(sale.funded);
//!     Ok(())
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Single lock**: every operation holds the store's mutex for its whole run
//! - **Funding carry-forward**: rewriting a contract keeps recorded funding
//! - **All-or-nothing writes**: a contract missing required fields writes nothing
//! - **Passive state**: order states are stored, never validated or advanced

pub mod config;
pub mod error;
pub mod memory;
pub mod migration;
pub mod row;
pub mod sqlite;
pub mod traits;

#[cfg(test)]
mod test_support;

pub use config::{JournalMode, StoreConfig};
pub use error::{Result, StoreError};
pub use memory::MemorySaleStore;
pub use row::{FundingSnapshot, SaleRow};
pub use sqlite::SqliteSaleStore;
pub use traits::{
    Funding, PaymentLookup, SalePage, SaleQuery, SaleRecord, SaleStore, SaleSummary, UnfundedSale,
};
