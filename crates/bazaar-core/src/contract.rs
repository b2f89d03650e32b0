//! Contract: the structured document describing one order.
//!
//! A contract bundles the vendor's listings, the buyer's order and, once the
//! vendor has accepted, the vendor's order confirmation. Every sub-document is
//! optional on the wire; the checked accessors on [`Contract`] and [`Order`]
//! turn an absent field into [`CoreError::MissingField`] instead of silently
//! substituting a default.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// The full order document shared between buyer and vendor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contract {
    /// Listings the buyer is purchasing from, as published by the vendor.
    pub vendor_listings: Vec<Listing>,
    /// The buyer's order.
    pub buyer_order: Option<Order>,
    /// The vendor's acceptance of the order.
    pub vendor_order_confirmation: Option<OrderConfirmation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Listing {
    pub slug: String,
    pub vendor_id: String,
    pub item: Option<Item>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Item {
    pub title: String,
    pub description: String,
    pub price: u64,
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Image {
    /// Content hash of the image; doubles as the thumbnail key.
    pub hash: String,
    pub filename: String,
}

/// The buyer's side of the contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Order {
    pub ref_listing: String,
    pub buyer_id: Option<BuyerId>,
    pub timestamp: Option<Timestamp>,
    pub items: Vec<OrderItem>,
    pub shipping: Option<Shipping>,
    pub payment: Option<Payment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuyerId {
    /// Network identity of the buyer.
    pub guid: String,
    /// Human-readable blockchain identity, empty if the buyer has none.
    pub blockchain_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderItem {
    pub listing_hash: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Shipping {
    pub ship_to: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Payment {
    pub method: PaymentMethod,
    /// Moderator guid, only meaningful for moderated payments.
    pub moderator: String,
    /// Amount in the coin's smallest unit.
    pub amount: u64,
    /// Buyer-supplied address, only meaningful for direct payments.
    pub address: String,
}

/// How the buyer intends to pay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// The vendor supplies the payment address in its confirmation.
    #[default]
    AddressRequest,
    /// The buyer pays straight to an address named in the order.
    Direct,
    /// Funds are held in a multisig with a moderator.
    Moderated,
}

/// The vendor's acceptance of an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderConfirmation {
    pub order_id: String,
    pub timestamp: Option<Timestamp>,
    /// Address the vendor asked the buyer to pay, for address-request orders.
    pub payment_address: String,
}

/// A point in time with nanosecond precision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: i32,
}

impl Timestamp {
    pub const fn from_seconds(seconds: i64) -> Self {
        Self { seconds, nanos: 0 }
    }
}

impl Contract {
    /// The buyer's order.
    pub fn buyer_order(&self) -> Result<&Order> {
        self.buyer_order
            .as_ref()
            .ok_or(CoreError::MissingField("buyerOrder"))
    }

    /// The first listing of the contract.
    pub fn first_listing(&self) -> Result<&Listing> {
        self.vendor_listings
            .first()
            .ok_or(CoreError::MissingField("vendorListings[0]"))
    }

    /// The item of the first listing.
    pub fn first_item(&self) -> Result<&Item> {
        self.first_listing()?
            .item
            .as_ref()
            .ok_or(CoreError::MissingField("vendorListings[0].item"))
    }

    /// Hash of the first image of the first listing.
    pub fn thumbnail_hash(&self) -> Result<&str> {
        self.first_item()?
            .images
            .first()
            .map(|image| image.hash.as_str())
            .ok_or(CoreError::MissingField("vendorListings[0].item.images[0]"))
    }

    /// Resolve the address the buyer is expected to fund.
    ///
    /// - `Direct`: the address in the buyer's payment.
    /// - `AddressRequest`: the address in the vendor's order confirmation.
    /// - `Moderated`: no single-key address, so the empty string.
    pub fn payment_address(&self) -> Result<&str> {
        let payment = self.buyer_order()?.payment()?;
        match payment.method {
            PaymentMethod::Direct => Ok(payment.address.as_str()),
            PaymentMethod::AddressRequest => self
                .vendor_order_confirmation
                .as_ref()
                .map(|confirmation| confirmation.payment_address.as_str())
                .ok_or(CoreError::MissingField("vendorOrderConfirmation")),
            PaymentMethod::Moderated => Ok(""),
        }
    }
}

impl Order {
    pub fn buyer_id(&self) -> Result<&BuyerId> {
        self.buyer_id
            .as_ref()
            .ok_or(CoreError::MissingField("buyerOrder.buyerID"))
    }

    pub fn payment(&self) -> Result<&Payment> {
        self.payment
            .as_ref()
            .ok_or(CoreError::MissingField("buyerOrder.payment"))
    }

    pub fn timestamp(&self) -> Result<Timestamp> {
        self.timestamp
            .ok_or(CoreError::MissingField("buyerOrder.timestamp"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contract_with(method: PaymentMethod) -> Contract {
        Contract {
            vendor_listings: vec![Listing {
                slug: "vintage-lamp".into(),
                vendor_id: "QmVendor".into(),
                item: Some(Item {
                    title: "Vintage Lamp".into(),
                    description: String::new(),
                    price: 5_000,
                    images: vec![Image {
                        hash: "zb2rhImage".into(),
                        filename: "lamp.jpg".into(),
                    }],
                }),
            }],
            buyer_order: Some(Order {
                payment: Some(Payment {
                    method,
                    moderator: String::new(),
                    amount: 5_000,
                    address: "1DirectAddr".into(),
                }),
                ..Order::default()
            }),
            vendor_order_confirmation: Some(OrderConfirmation {
                payment_address: "1VendorAddr".into(),
                ..OrderConfirmation::default()
            }),
        }
    }

    #[test]
    fn test_payment_address_by_method() {
        assert_eq!(
            contract_with(PaymentMethod::Direct).payment_address().unwrap(),
            "1DirectAddr"
        );
        assert_eq!(
            contract_with(PaymentMethod::AddressRequest)
                .payment_address()
                .unwrap(),
            "1VendorAddr"
        );
        assert_eq!(
            contract_with(PaymentMethod::Moderated).payment_address().unwrap(),
            ""
        );
    }

    #[test]
    fn test_address_request_without_confirmation() {
        let mut contract = contract_with(PaymentMethod::AddressRequest);
        contract.vendor_order_confirmation = None;

        let err = contract.payment_address().unwrap_err();
        assert!(matches!(err, CoreError::MissingField("vendorOrderConfirmation")));
    }

    #[test]
    fn test_thumbnail_requires_image() {
        let mut contract = contract_with(PaymentMethod::Direct);
        assert_eq!(contract.thumbnail_hash().unwrap(), "zb2rhImage");

        contract.vendor_listings[0]
            .item
            .as_mut()
            .unwrap()
            .images
            .clear();
        assert!(matches!(
            contract.thumbnail_hash(),
            Err(CoreError::MissingField("vendorListings[0].item.images[0]"))
        ));

        contract.vendor_listings.clear();
        assert!(matches!(
            contract.thumbnail_hash(),
            Err(CoreError::MissingField("vendorListings[0]"))
        ));
    }

    #[test]
    fn test_missing_buyer_order() {
        let contract = Contract::default();
        assert!(matches!(
            contract.payment_address(),
            Err(CoreError::MissingField("buyerOrder"))
        ));
    }
}
