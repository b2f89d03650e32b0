//! Contract builders shared by the unit tests of this crate.

use bazaar_core::{
    BuyerId, Contract, Image, Item, Listing, Order, OrderConfirmation, Payment, PaymentMethod,
    Shipping, Timestamp, TransactionRecord, Txid,
};

/// Address the buyer pays to under `PaymentMethod::Direct`.
pub const BUYER_ADDRESS: &str = "1BuyerDirect";
/// Address the vendor hands out under `PaymentMethod::AddressRequest`.
pub const VENDOR_ADDRESS: &str = "1VendorConfirmed";

/// A fully populated contract: two images, shipping, and both a buyer
/// payment address and a vendor-confirmed one.
pub fn sale_contract(title: &str, method: PaymentMethod, seconds: i64) -> Contract {
    Contract {
        vendor_listings: vec![Listing {
            slug: title.to_lowercase().replace(' ', "-"),
            vendor_id: "QmVendor".into(),
            item: Some(Item {
                title: title.into(),
                description: String::new(),
                price: 2_500,
                images: vec![
                    Image {
                        hash: format!("zb2rh{}", seconds),
                        filename: "front.jpg".into(),
                    },
                    Image {
                        hash: format!("zb2rh{}back", seconds),
                        filename: "back.jpg".into(),
                    },
                ],
            }),
        }],
        buyer_order: Some(Order {
            buyer_id: Some(BuyerId {
                guid: "QmBuyer".into(),
                blockchain_id: "@buyer".into(),
            }),
            timestamp: Some(Timestamp::from_seconds(seconds)),
            shipping: Some(Shipping {
                ship_to: "Ada LOVELACE".into(),
                address: "12 Analytical Way".into(),
                ..Shipping::default()
            }),
            payment: Some(Payment {
                method,
                moderator: String::new(),
                amount: 2_500,
                address: BUYER_ADDRESS.into(),
            }),
            ..Order::default()
        }),
        vendor_order_confirmation: Some(OrderConfirmation {
            order_id: String::new(),
            timestamp: None,
            payment_address: VENDOR_ADDRESS.into(),
        }),
    }
}

/// A valid direct-payment contract paying `address`, without shipping.
pub fn direct_contract(title: &str, address: &str, seconds: i64) -> Contract {
    let mut contract = sale_contract(title, PaymentMethod::Direct, seconds);
    if let Some(order) = contract.buyer_order.as_mut() {
        order.shipping = None;
        if let Some(payment) = order.payment.as_mut() {
            payment.address = address.into();
        }
    }
    contract.vendor_order_confirmation = Some(OrderConfirmation::default());
    contract
}

pub fn record(byte: u8, value: i64) -> TransactionRecord {
    TransactionRecord {
        txid: Txid::from_bytes([byte; 32]),
        index: 0,
        value,
        script_pub_key: "76a914".into(),
        spent: false,
        timestamp: 1_500_000_000,
    }
}
