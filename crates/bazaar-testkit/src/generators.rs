//! Proptest generators for property-based testing.

use proptest::prelude::*;

use bazaar_core::{Contract, OrderState, PaymentMethod, TransactionRecord, Txid};

use crate::fixtures::ContractBuilder;

/// Generate any order state.
pub fn order_state() -> impl Strategy<Value = OrderState> {
    prop::sample::select(OrderState::ALL.to_vec())
}

/// Generate a payment method.
pub fn payment_method() -> impl Strategy<Value = PaymentMethod> {
    prop_oneof![
        Just(PaymentMethod::AddressRequest),
        Just(PaymentMethod::Direct),
        Just(PaymentMethod::Moderated),
    ]
}

/// Generate a random Txid.
pub fn txid() -> impl Strategy<Value = Txid> {
    any::<[u8; 32]>().prop_map(Txid::from_bytes)
}

/// Generate a base58-looking payment address.
pub fn payment_address() -> impl Strategy<Value = String> {
    "[13][a-km-zA-HJ-NP-Z1-9]{25,33}".prop_map(String::from)
}

/// Generate an order id.
pub fn order_id() -> impl Strategy<Value = String> {
    "Qm[a-zA-Z0-9]{10,44}".prop_map(String::from)
}

/// Generate a transaction record.
pub fn transaction_record() -> impl Strategy<Value = TransactionRecord> {
    (
        txid(),
        any::<u32>(),
        any::<i64>(),
        "[0-9a-f]{0,50}",
        any::<bool>(),
        0i64..=4_102_444_800,
    )
        .prop_map(
            |(txid, index, value, script_pub_key, spent, timestamp)| TransactionRecord {
                txid,
                index,
                value,
                script_pub_key,
                spent,
                timestamp,
            },
        )
}

/// Generate up to `max_len` transaction records.
pub fn transaction_records(max_len: usize) -> impl Strategy<Value = Vec<TransactionRecord>> {
    prop::collection::vec(transaction_record(), 0..=max_len)
}

/// Parameters for generating a valid contract.
#[derive(Debug, Clone)]
pub struct ContractParams {
    pub title: String,
    pub image_hash: String,
    pub buyer_guid: String,
    pub buyer_blockchain_id: String,
    pub timestamp: i64,
    pub amount: u64,
    pub method: PaymentMethod,
    pub address: String,
    pub shipping: Option<(String, String)>,
}

impl Arbitrary for ContractParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            "[A-Za-z][A-Za-z0-9 ]{0,40}", // title
            "zb2rh[a-zA-Z0-9]{10,40}",    // image hash
            "Qm[a-zA-Z0-9]{10,44}",       // buyer guid
            "(@[a-z0-9]{1,15})?",         // blockchain id
            0i64..=4_102_444_800,         // timestamp
            0u64..=i64::MAX as u64,       // amount
            payment_method(),
            payment_address(),
            proptest::option::of(("[A-Za-z ]{1,30}", "[A-Za-z0-9 ,.]{1,60}")),
        )
            .prop_map(
                |(title, image_hash, buyer_guid, blockchain_id, ts, amount, method, address, shipping)| {
                    ContractParams {
                        title,
                        image_hash,
                        buyer_guid,
                        buyer_blockchain_id: blockchain_id,
                        timestamp: ts,
                        amount,
                        method,
                        address,
                        shipping,
                    }
                },
            )
            .boxed()
    }
}

impl ContractParams {
    /// The payment address a store should derive for these parameters.
    pub fn expected_payment_address(&self) -> &str {
        match self.method {
            PaymentMethod::Moderated => "",
            _ => &self.address,
        }
    }
}

/// Generate a contract from parameters.
pub fn contract_from_params(params: &ContractParams) -> Contract {
    let mut builder = ContractBuilder::new()
        .title(&params.title)
        .images(&[params.image_hash.as_str()])
        .buyer(&params.buyer_guid, &params.buyer_blockchain_id)
        .timestamp(params.timestamp)
        .amount(params.amount);

    builder = match params.method {
        PaymentMethod::Direct => builder.direct(&params.address),
        PaymentMethod::AddressRequest => builder.address_request(&params.address),
        PaymentMethod::Moderated => builder.moderated(),
    };

    if let Some((name, address)) = &params.shipping {
        builder = builder.shipping(name, address);
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_store::SaleRow;

    proptest! {
        #[test]
        fn test_generated_contracts_derive(params: ContractParams, state in order_state()) {
            let contract = contract_from_params(&params);
            let row = SaleRow::derive("order", &contract, state, false).unwrap();

            prop_assert_eq!(row.payment_addr.as_str(), params.expected_payment_address());
            prop_assert_eq!(row.title, params.title.to_lowercase());
            prop_assert_eq!(row.date, params.timestamp);
        }

        #[test]
        fn test_order_state_code_roundtrip(state in order_state()) {
            prop_assert_eq!(OrderState::from_i64(state.to_i64()), Some(state));
        }
    }
}
