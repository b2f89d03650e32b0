//! SaleStore trait: the interface for vendor sale persistence.
//!
//! Implementations include SQLite (primary) and in-memory (for tests). Both
//! share the row derivation in [`crate::row`] and the document codec in
//! `bazaar-core`, so they agree on every observable result.

use serde::Serialize;

use bazaar_core::{Address, Contract, OrderState, TransactionRecord};

use crate::error::Result;

/// What `get_by_payment_address` returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentLookup {
    pub contract: Contract,
    pub state: OrderState,
    pub funded: bool,
    pub transactions: Vec<TransactionRecord>,
}

/// A full sale record, as returned by `get_by_order_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleRecord {
    pub order_id: String,
    pub contract: Contract,
    pub state: OrderState,
    pub read: bool,
    pub funded: bool,
    pub transactions: Vec<TransactionRecord>,
}

/// Funding state of a single sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Funding {
    pub funded: bool,
    /// `None` if no funding update was ever recorded for the sale;
    /// `Some(vec![])` if one was recorded with an empty list.
    pub transactions: Option<Vec<TransactionRecord>>,
}

/// A row of the vendor's sales list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleSummary {
    pub order_id: String,
    pub timestamp: i64,
    pub title: String,
    pub thumbnail: String,
    pub total: i64,
    pub buyer_id: String,
    pub buyer_blockchain_id: String,
    pub shipping_name: String,
    pub shipping_address: String,
    pub payment_address: String,
    pub state: OrderState,
    pub read: bool,
    pub funded: bool,
}

/// Filter, search and pagination for [`SaleStore::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaleQuery {
    /// Only sales in one of these states. Empty matches every state.
    pub states: Vec<OrderState>,
    /// Case-insensitive substring matched against the order id, title,
    /// buyer ids, shipping fields and payment address.
    pub search: Option<String>,
    /// Oldest first when set; newest first otherwise.
    pub ascending: bool,
    pub offset: usize,
    pub limit: Option<usize>,
}

impl SaleQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn states(mut self, states: impl IntoIterator<Item = OrderState>) -> Self {
        self.states = states.into_iter().collect();
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn ascending(mut self, ascending: bool) -> Self {
        self.ascending = ascending;
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The search term normalized for matching, if it is non-empty.
    pub(crate) fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase)
    }
}

/// One page of [`SaleStore::list`] results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SalePage {
    pub sales: Vec<SaleSummary>,
    /// Number of sales matching the query before offset and limit.
    pub total: usize,
}

/// A sale still waiting for on-chain funding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnfundedSale {
    pub order_id: String,
    pub timestamp: i64,
    pub payment_address: String,
}

/// The SaleStore trait: synchronous interface for sale persistence.
///
/// Every method runs under the implementation's single exclusion lock and
/// returns only once its write is committed.
///
/// # Design Notes
///
/// - **Funding carry-forward**: `put` preserves whatever `update_funding` last
///   wrote for the same order id.
/// - **Missing rows**: `mark_as_read`, `update_funding` and `delete` on an
///   unknown order id succeed and change nothing.
/// - **Duplicate payment addresses**: `get_by_payment_address` returns the
///   earliest order (lowest date, then lowest order id).
pub trait SaleStore: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Writes
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert or replace the sale for `order_id`, keeping its funding state.
    fn put(&self, order_id: &str, contract: &Contract, state: OrderState, read: bool)
        -> Result<()>;

    /// Mark the sale as seen by the vendor.
    fn mark_as_read(&self, order_id: &str) -> Result<()>;

    /// Overwrite the funding flag and transaction evidence of a sale.
    fn update_funding(
        &self,
        order_id: &str,
        funded: bool,
        records: &[TransactionRecord],
    ) -> Result<()>;

    /// Remove the sale.
    fn delete(&self, order_id: &str) -> Result<()>;

    // ─────────────────────────────────────────────────────────────────────────
    // Lookups
    // ─────────────────────────────────────────────────────────────────────────

    /// Every stored order id, in store-defined order.
    fn get_all(&self) -> Result<Vec<String>>;

    /// The sale whose resolved payment address encodes to `address`.
    fn get_by_payment_address(&self, address: &dyn Address) -> Result<PaymentLookup>;

    /// The full sale for `order_id`.
    fn get_by_order_id(&self, order_id: &str) -> Result<SaleRecord>;

    /// Funding state for `order_id`.
    fn get_funding(&self, order_id: &str) -> Result<Funding>;

    // ─────────────────────────────────────────────────────────────────────────
    // Sales list
    // ─────────────────────────────────────────────────────────────────────────

    /// Summaries matching `query`.
    fn list(&self, query: &SaleQuery) -> Result<SalePage>;

    /// Sales not yet funded that have a payment address to watch, oldest first.
    fn get_unfunded(&self) -> Result<Vec<UnfundedSale>>;

    /// Number of stored sales.
    fn count(&self) -> Result<usize>;
}
