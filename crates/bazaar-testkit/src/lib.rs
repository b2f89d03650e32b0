//! # Bazaar Testkit
//!
//! Testing utilities for the Bazaar sale store.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Contracts with the row columns every store must derive from them
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: A contract builder and one instance of each store implementation
//!
//! ## Golden Vectors
//!
//! ```rust
//! use bazaar_testkit::vectors::verify_all_vectors;
//!
//! for (name, passed, detail) in verify_all_vectors() {
//!     assert!(passed, "{}: {}", name, detail);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use bazaar_testkit::generators::{contract_from_params, ContractParams};
//!
//! proptest! {
//!     #[test]
//!     fn contract_survives_storage(params: ContractParams) {
//!         let contract = contract_from_params(&params);
//!         // put, then read back by payment address
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use bazaar_core::OrderState;
//! use bazaar_store::SaleStore;
//! use bazaar_testkit::fixtures::{all_stores, ContractBuilder};
//!
//! let contract = ContractBuilder::new().title("Linen Apron").direct("1PayMe").build();
//! for (_, store) in all_stores() {
//!     store.put("order1", &contract, OrderState::Pending, false).unwrap();
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{all_stores, direct_contract, tx_record, ContractBuilder};
pub use generators::{contract_from_params, ContractParams};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
