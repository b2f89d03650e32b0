//! # Bazaar Core
//!
//! Pure data types for the Bazaar sale store: the order contract, order
//! lifecycle states, wallet transaction records and payment addresses.
//!
//! This crate contains no I/O and no storage. It owns the durable document
//! format for contracts and transaction lists so that every store encodes
//! them identically.
//!
//! ## Key Types
//!
//! - [`Contract`] - The full order document (listings, buyer order, confirmation)
//! - [`OrderState`] - Integer-coded order lifecycle stage
//! - [`TransactionRecord`] - Wallet evidence of a funding transaction
//! - [`Address`] - Anything with a canonical string encoding usable as a lookup key
//!
//! ## Document Format
//!
//! Contracts are serialized as indented JSON. See the [`document`] module.

pub mod address;
pub mod contract;
pub mod document;
pub mod error;
pub mod order;
pub mod wallet;

pub use address::{Address, PaymentAddress};
pub use contract::{
    BuyerId, Contract, Image, Item, Listing, Order, OrderConfirmation, OrderItem, Payment,
    PaymentMethod, Shipping, Timestamp,
};
pub use document::{
    contract_from_document, contract_to_document, decode_transactions, encode_transactions,
};
pub use error::{CoreError, Result};
pub use order::OrderState;
pub use wallet::{TransactionRecord, Txid};
