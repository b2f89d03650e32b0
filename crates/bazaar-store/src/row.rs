//! Mapping from a contract to the flat `sales` row.
//!
//! [`SaleRow::derive`] is pure: it serializes the contract and pulls every
//! indexed column out of it, failing on the first missing nested field. Both
//! store implementations call it before touching storage, so a malformed
//! contract never produces a partially populated row.

use bazaar_core::{
    contract_from_document, contract_to_document, decode_transactions, Contract, CoreError,
    OrderState, TransactionRecord,
};

use crate::error::{Result, StoreError};

/// Content columns of a sale, everything except the funding fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleRow {
    pub order_id: String,
    /// Stored contract document.
    pub contract: String,
    pub state: OrderState,
    pub read: bool,
    /// Buyer order timestamp, unix seconds.
    pub date: i64,
    /// Payment amount.
    pub total: i64,
    pub thumbnail: String,
    pub buyer_id: String,
    pub buyer_blockchain_id: String,
    pub title: String,
    pub shipping_name: String,
    pub shipping_address: String,
    pub payment_addr: String,
}

impl SaleRow {
    /// Build the row image for `contract`.
    pub fn derive(
        order_id: &str,
        contract: &Contract,
        state: OrderState,
        read: bool,
    ) -> Result<Self> {
        let document = contract_to_document(contract).map_err(StoreError::encode)?;

        let order = contract.buyer_order()?;
        let buyer = order.buyer_id()?;
        let payment = order.payment()?;
        let total =
            i64::try_from(payment.amount).map_err(|_| CoreError::AmountOutOfRange(payment.amount))?;

        let (shipping_name, shipping_address) = match &order.shipping {
            Some(shipping) => (
                shipping.ship_to.to_lowercase(),
                shipping.address.to_lowercase(),
            ),
            None => (String::new(), String::new()),
        };

        Ok(Self {
            order_id: order_id.to_owned(),
            contract: document,
            state,
            read,
            date: order.timestamp()?.seconds,
            total,
            thumbnail: contract.thumbnail_hash()?.to_owned(),
            buyer_id: buyer.guid.clone(),
            buyer_blockchain_id: buyer.blockchain_id.clone(),
            title: contract.first_item()?.title.to_lowercase(),
            shipping_name,
            shipping_address,
            payment_addr: contract.payment_address()?.to_owned(),
        })
    }
}

/// Funding columns as stored, carried across contract rewrites untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FundingSnapshot {
    pub funded: bool,
    /// Raw transaction list; `None` until the first funding update.
    pub transactions: Option<Vec<u8>>,
}

/// Parse a stored contract document.
pub(crate) fn decode_contract(bytes: &[u8]) -> Result<Contract> {
    contract_from_document(bytes).map_err(StoreError::decode)
}

/// Parse a stored transaction list; an absent list reads as `None`.
pub(crate) fn decode_records(bytes: Option<&[u8]>) -> Result<Option<Vec<TransactionRecord>>> {
    bytes
        .map(|b| decode_transactions(b).map_err(StoreError::decode))
        .transpose()
}

/// Parse a stored order state code.
pub(crate) fn decode_state(code: i64) -> Result<OrderState> {
    OrderState::from_i64(code)
        .ok_or_else(|| StoreError::InvalidData(format!("unknown order state code {}", code)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{direct_contract, sale_contract, BUYER_ADDRESS, VENDOR_ADDRESS};
    use bazaar_core::PaymentMethod;

    fn contract(method: PaymentMethod) -> Contract {
        sale_contract("Merino WOOL Scarf", method, 1_495_000_000)
    }

    #[test]
    fn test_derive_columns() {
        let row = SaleRow::derive("order-1", &contract(PaymentMethod::Direct), OrderState::Pending, false)
            .unwrap();

        assert_eq!(row.order_id, "order-1");
        assert_eq!(row.date, 1_495_000_000);
        assert_eq!(row.total, 2_500);
        assert_eq!(row.thumbnail, "zb2rh1495000000");
        assert_eq!(row.buyer_id, "QmBuyer");
        assert_eq!(row.buyer_blockchain_id, "@buyer");
        assert_eq!(row.title, "merino wool scarf");
        assert_eq!(row.shipping_name, "ada lovelace");
        assert_eq!(row.shipping_address, "12 analytical way");
        assert_eq!(row.payment_addr, BUYER_ADDRESS);
        assert!(row.contract.contains("\"title\": \"Merino WOOL Scarf\""));
    }

    #[test]
    fn test_derive_payment_addr_by_method() {
        let request = SaleRow::derive(
            "a",
            &contract(PaymentMethod::AddressRequest),
            OrderState::Pending,
            false,
        )
        .unwrap();
        assert_eq!(request.payment_addr, VENDOR_ADDRESS);

        let moderated = SaleRow::derive(
            "b",
            &contract(PaymentMethod::Moderated),
            OrderState::Pending,
            false,
        )
        .unwrap();
        assert_eq!(moderated.payment_addr, "");
    }

    #[test]
    fn test_derive_without_shipping() {
        let c = direct_contract("Merino WOOL Scarf", "1Scarf", 1_495_000_000);

        let row = SaleRow::derive("a", &c, OrderState::Pending, false).unwrap();
        assert_eq!(row.shipping_name, "");
        assert_eq!(row.shipping_address, "");
        assert_eq!(row.payment_addr, "1Scarf");
    }

    #[test]
    fn test_derive_fails_without_image() {
        let mut c = contract(PaymentMethod::Direct);
        c.vendor_listings[0].item.as_mut().unwrap().images.clear();

        let err = SaleRow::derive("a", &c, OrderState::Pending, false).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Contract(CoreError::MissingField(_))
        ));
    }

    #[test]
    fn test_derive_fails_on_oversized_amount() {
        let mut c = contract(PaymentMethod::Direct);
        c.buyer_order.as_mut().unwrap().payment.as_mut().unwrap().amount = u64::MAX;

        let err = SaleRow::derive("a", &c, OrderState::Pending, false).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Contract(CoreError::AmountOutOfRange(u64::MAX))
        ));
    }
}
