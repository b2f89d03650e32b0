//! In-memory implementation of the SaleStore trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps every row image in a map with no persistence.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use bazaar_core::{encode_transactions, Address, Contract, OrderState, TransactionRecord};

use crate::error::{Result, StoreError};
use crate::row::{decode_contract, decode_records, FundingSnapshot, SaleRow};
use crate::traits::{
    Funding, PaymentLookup, SalePage, SaleQuery, SaleRecord, SaleStore, SaleSummary, UnfundedSale,
};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via Mutex.
pub struct MemorySaleStore {
    sales: Mutex<BTreeMap<String, StoredSale>>,
}

struct StoredSale {
    row: SaleRow,
    funding: FundingSnapshot,
}

impl StoredSale {
    fn summary(&self) -> SaleSummary {
        SaleSummary {
            order_id: self.row.order_id.clone(),
            timestamp: self.row.date,
            title: self.row.title.clone(),
            thumbnail: self.row.thumbnail.clone(),
            total: self.row.total,
            buyer_id: self.row.buyer_id.clone(),
            buyer_blockchain_id: self.row.buyer_blockchain_id.clone(),
            shipping_name: self.row.shipping_name.clone(),
            shipping_address: self.row.shipping_address.clone(),
            payment_address: self.row.payment_addr.clone(),
            state: self.row.state,
            read: self.row.read,
            funded: self.funding.funded,
        }
    }

    fn matches(&self, query: &SaleQuery, term: Option<&str>) -> bool {
        if !query.states.is_empty() && !query.states.contains(&self.row.state) {
            return false;
        }
        let Some(term) = term else {
            return true;
        };
        [
            &self.row.order_id,
            &self.row.title,
            &self.row.buyer_id,
            &self.row.buyer_blockchain_id,
            &self.row.shipping_name,
            &self.row.shipping_address,
            &self.row.payment_addr,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(term))
    }

    /// Sort key shared by every ordered query: date, then order id.
    fn sort_key(&self) -> (i64, &str) {
        (self.row.date, self.row.order_id.as_str())
    }
}

impl MemorySaleStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            sales: Mutex::new(BTreeMap::new()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, StoredSale>>> {
        self.sales
            .lock()
            .map_err(|e| StoreError::InvalidData(format!("mutex poisoned: {}", e)))
    }
}

impl Default for MemorySaleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SaleStore for MemorySaleStore {
    fn put(
        &self,
        order_id: &str,
        contract: &Contract,
        state: OrderState,
        read: bool,
    ) -> Result<()> {
        let row = SaleRow::derive(order_id, contract, state, read)?;

        let mut sales = self.lock()?;
        let funding = sales
            .get(order_id)
            .map(|sale| sale.funding.clone())
            .unwrap_or_default();
        sales.insert(order_id.to_owned(), StoredSale { row, funding });
        Ok(())
    }

    fn mark_as_read(&self, order_id: &str) -> Result<()> {
        if let Some(sale) = self.lock()?.get_mut(order_id) {
            sale.row.read = true;
        }
        Ok(())
    }

    fn update_funding(
        &self,
        order_id: &str,
        funded: bool,
        records: &[TransactionRecord],
    ) -> Result<()> {
        let serialized = encode_transactions(records).map_err(StoreError::encode)?;

        if let Some(sale) = self.lock()?.get_mut(order_id) {
            sale.funding = FundingSnapshot {
                funded,
                transactions: Some(serialized),
            };
        }
        Ok(())
    }

    fn delete(&self, order_id: &str) -> Result<()> {
        self.lock()?.remove(order_id);
        Ok(())
    }

    fn get_all(&self) -> Result<Vec<String>> {
        Ok(self.lock()?.keys().cloned().collect())
    }

    fn get_by_payment_address(&self, address: &dyn Address) -> Result<PaymentLookup> {
        let encoded = address.encode_address();
        if encoded.is_empty() {
            return Err(StoreError::NotFound("empty payment address".into()));
        }

        let sales = self.lock()?;
        let sale = sales
            .values()
            .filter(|sale| sale.row.payment_addr == encoded)
            .min_by(|a, b| a.sort_key().cmp(&b.sort_key()))
            .ok_or_else(|| StoreError::NotFound(format!("payment address {}", encoded)))?;

        Ok(PaymentLookup {
            contract: decode_contract(sale.row.contract.as_bytes())?,
            state: sale.row.state,
            funded: sale.funding.funded,
            transactions: decode_records(sale.funding.transactions.as_deref())?
                .unwrap_or_default(),
        })
    }

    fn get_by_order_id(&self, order_id: &str) -> Result<SaleRecord> {
        let sales = self.lock()?;
        let sale = sales
            .get(order_id)
            .ok_or_else(|| StoreError::NotFound(format!("order {}", order_id)))?;

        Ok(SaleRecord {
            order_id: order_id.to_owned(),
            contract: decode_contract(sale.row.contract.as_bytes())?,
            state: sale.row.state,
            read: sale.row.read,
            funded: sale.funding.funded,
            transactions: decode_records(sale.funding.transactions.as_deref())?
                .unwrap_or_default(),
        })
    }

    fn get_funding(&self, order_id: &str) -> Result<Funding> {
        let sales = self.lock()?;
        let sale = sales
            .get(order_id)
            .ok_or_else(|| StoreError::NotFound(format!("order {}", order_id)))?;

        Ok(Funding {
            funded: sale.funding.funded,
            transactions: decode_records(sale.funding.transactions.as_deref())?,
        })
    }

    fn list(&self, query: &SaleQuery) -> Result<SalePage> {
        let term = query.search_term();
        let sales = self.lock()?;

        let mut matching: Vec<&StoredSale> = sales
            .values()
            .filter(|sale| sale.matches(query, term.as_deref()))
            .collect();
        matching.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        if !query.ascending {
            matching.reverse();
        }

        let total = matching.len();
        let page = matching
            .into_iter()
            .skip(query.offset)
            .take(query.limit.unwrap_or(usize::MAX))
            .map(StoredSale::summary)
            .collect();

        Ok(SalePage { sales: page, total })
    }

    fn get_unfunded(&self) -> Result<Vec<UnfundedSale>> {
        let sales = self.lock()?;
        let mut unfunded: Vec<&StoredSale> = sales
            .values()
            .filter(|sale| !sale.funding.funded && !sale.row.payment_addr.is_empty())
            .collect();
        unfunded.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        Ok(unfunded
            .into_iter()
            .map(|sale| UnfundedSale {
                order_id: sale.row.order_id.clone(),
                timestamp: sale.row.date,
                payment_address: sale.row.payment_addr.clone(),
            })
            .collect())
    }

    fn count(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{direct_contract, record};
    use bazaar_core::PaymentAddress;

    #[test]
    fn test_put_and_lookup() {
        let store = MemorySaleStore::new();
        let contract = direct_contract("Linen Apron", "1ApronAddr", 1_500_000_000);
        store
            .put("order1", &contract, OrderState::Pending, false)
            .unwrap();

        let found = store
            .get_by_payment_address(&PaymentAddress::new("1ApronAddr"))
            .unwrap();
        assert_eq!(found.contract, contract);
        assert_eq!(found.state, OrderState::Pending);
        assert!(!found.funded);
    }

    #[test]
    fn test_put_keeps_funding() {
        let store = MemorySaleStore::new();
        let contract = direct_contract("Linen Apron", "1ApronAddr", 1_500_000_000);
        store
            .put("order1", &contract, OrderState::Pending, false)
            .unwrap();
        store
            .update_funding("order1", true, &[record(3, 900)])
            .unwrap();
        store
            .put("order1", &contract, OrderState::AwaitingFulfillment, false)
            .unwrap();

        let funding = store.get_funding("order1").unwrap();
        assert!(funding.funded);
        assert_eq!(funding.transactions, Some(vec![record(3, 900)]));
    }

    #[test]
    fn test_missing_rows_are_noops() {
        let store = MemorySaleStore::new();
        store.mark_as_read("nope").unwrap();
        store.update_funding("nope", true, &[]).unwrap();
        store.delete("nope").unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_list_newest_first() {
        let store = MemorySaleStore::new();
        for (id, seconds) in [("a", 30), ("b", 10), ("c", 20)] {
            store
                .put(
                    id,
                    &direct_contract("Linen Apron", id, seconds),
                    OrderState::Pending,
                    false,
                )
                .unwrap();
        }

        let page = store.list(&SaleQuery::new()).unwrap();
        let ids: Vec<_> = page.sales.iter().map(|s| s.order_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
    }
}
