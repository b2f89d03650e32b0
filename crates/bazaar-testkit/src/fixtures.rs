//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use bazaar_core::{
    BuyerId, Contract, Image, Item, Listing, Order, OrderConfirmation, OrderItem, Payment,
    PaymentMethod, Shipping, Timestamp, TransactionRecord, Txid,
};
use bazaar_store::{MemorySaleStore, SaleStore, SqliteSaleStore};

/// Builder for valid contracts with sensible defaults.
///
/// The default is a direct-payment order for one listing with one image,
/// no shipping, paying `1DefaultPaymentAddr`.
#[derive(Debug, Clone)]
pub struct ContractBuilder {
    title: String,
    image_hashes: Vec<String>,
    buyer_guid: String,
    buyer_blockchain_id: String,
    timestamp: i64,
    amount: u64,
    method: PaymentMethod,
    buyer_address: String,
    vendor_address: String,
    shipping: Option<Shipping>,
}

impl ContractBuilder {
    pub fn new() -> Self {
        Self {
            title: "Ceramic Vase".into(),
            image_hashes: vec!["zb2rhVase".into()],
            buyer_guid: "QmBuyerGuid".into(),
            buyer_blockchain_id: "@buyer".into(),
            timestamp: 1_500_000_000,
            amount: 10_000,
            method: PaymentMethod::Direct,
            buyer_address: "1DefaultPaymentAddr".into(),
            vendor_address: String::new(),
            shipping: None,
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = title.into();
        self
    }

    pub fn images(mut self, hashes: &[&str]) -> Self {
        self.image_hashes = hashes.iter().map(|h| h.to_string()).collect();
        self
    }

    pub fn buyer(mut self, guid: &str, blockchain_id: &str) -> Self {
        self.buyer_guid = guid.into();
        self.buyer_blockchain_id = blockchain_id.into();
        self
    }

    pub fn timestamp(mut self, seconds: i64) -> Self {
        self.timestamp = seconds;
        self
    }

    pub fn amount(mut self, amount: u64) -> Self {
        self.amount = amount;
        self
    }

    /// Buyer pays straight to `address`.
    pub fn direct(mut self, address: &str) -> Self {
        self.method = PaymentMethod::Direct;
        self.buyer_address = address.into();
        self
    }

    /// Vendor supplies `address` in its order confirmation.
    pub fn address_request(mut self, address: &str) -> Self {
        self.method = PaymentMethod::AddressRequest;
        self.vendor_address = address.into();
        self
    }

    /// Moderated multisig payment, no single payment address.
    pub fn moderated(mut self) -> Self {
        self.method = PaymentMethod::Moderated;
        self
    }

    pub fn shipping(mut self, ship_to: &str, address: &str) -> Self {
        self.shipping = Some(Shipping {
            ship_to: ship_to.into(),
            address: address.into(),
            city: "Lisbon".into(),
            state: String::new(),
            postal_code: "1100-001".into(),
            country: "PORTUGAL".into(),
        });
        self
    }

    pub fn build(self) -> Contract {
        let slug = self.title.to_lowercase().replace(' ', "-");
        Contract {
            vendor_listings: vec![Listing {
                slug: slug.clone(),
                vendor_id: "QmVendorGuid".into(),
                item: Some(Item {
                    title: self.title,
                    description: "Handmade".into(),
                    price: self.amount,
                    images: self
                        .image_hashes
                        .into_iter()
                        .map(|hash| Image {
                            filename: format!("{}.jpg", hash),
                            hash,
                        })
                        .collect(),
                }),
            }],
            buyer_order: Some(Order {
                ref_listing: slug.clone(),
                buyer_id: Some(BuyerId {
                    guid: self.buyer_guid,
                    blockchain_id: self.buyer_blockchain_id,
                }),
                timestamp: Some(Timestamp::from_seconds(self.timestamp)),
                items: vec![OrderItem {
                    listing_hash: format!("zb2rh{}", slug),
                    quantity: 1,
                }],
                shipping: self.shipping,
                payment: Some(Payment {
                    method: self.method,
                    moderator: match self.method {
                        PaymentMethod::Moderated => "QmModeratorGuid".into(),
                        _ => String::new(),
                    },
                    amount: self.amount,
                    address: self.buyer_address,
                }),
            }),
            vendor_order_confirmation: match self.method {
                PaymentMethod::AddressRequest => Some(OrderConfirmation {
                    order_id: String::new(),
                    timestamp: Some(Timestamp::from_seconds(self.timestamp + 60)),
                    payment_address: self.vendor_address,
                }),
                _ => None,
            },
        }
    }
}

impl Default for ContractBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A direct-payment contract paying `address`.
pub fn direct_contract(address: &str) -> Contract {
    ContractBuilder::new().direct(address).build()
}

/// A transaction record with a txid made of `byte` repeated.
pub fn tx_record(byte: u8, value: i64) -> TransactionRecord {
    TransactionRecord {
        txid: Txid::from_bytes([byte; 32]),
        index: u32::from(byte),
        value,
        script_pub_key: "76a91489abcdefab".into(),
        spent: false,
        timestamp: 1_500_000_000 + i64::from(byte),
    }
}

/// One fresh instance of every store implementation, labelled for assertions.
pub fn all_stores() -> Vec<(&'static str, Box<dyn SaleStore>)> {
    vec![
        (
            "sqlite",
            Box::new(SqliteSaleStore::open_memory().expect("in-memory sqlite store")),
        ),
        ("memory", Box::new(MemorySaleStore::new())),
    ]
}
