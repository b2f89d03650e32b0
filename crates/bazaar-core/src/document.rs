//! Durable document encodings.
//!
//! - Contracts are stored as human-readable JSON: four-space indent,
//!   lowerCamelCase keys, enums as strings, every field emitted.
//! - Transaction lists are stored as compact JSON arrays.
//!
//! Decoding is lenient about absent fields (they take their default value)
//! but never about malformed input: corrupt bytes are a [`CoreError::DecodingError`].

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::contract::Contract;
use crate::error::{CoreError, Result};
use crate::wallet::TransactionRecord;

/// Indent used for stored contract documents.
const DOCUMENT_INDENT: &[u8] = b"    ";

/// Serialize a contract into its stored document form.
pub fn contract_to_document(contract: &Contract) -> Result<String> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(DOCUMENT_INDENT));
    contract
        .serialize(&mut serializer)
        .map_err(|e| CoreError::EncodingError(e.to_string()))?;
    String::from_utf8(buf).map_err(|e| CoreError::EncodingError(e.to_string()))
}

/// Parse a stored contract document.
pub fn contract_from_document(bytes: &[u8]) -> Result<Contract> {
    serde_json::from_slice(bytes).map_err(|e| CoreError::DecodingError(e.to_string()))
}

/// Serialize transaction records into their stored list form.
pub fn encode_transactions(records: &[TransactionRecord]) -> Result<Vec<u8>> {
    serde_json::to_vec(records).map_err(|e| CoreError::EncodingError(e.to_string()))
}

/// Parse a stored transaction list.
///
/// Zero-length input and a JSON `null` both decode to an empty list; wallets
/// have historically written either for "no records".
pub fn decode_transactions(bytes: &[u8]) -> Result<Vec<TransactionRecord>> {
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    let records: Option<Vec<TransactionRecord>> =
        serde_json::from_slice(bytes).map_err(|e| CoreError::DecodingError(e.to_string()))?;
    Ok(records.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{BuyerId, Item, Image, Listing, Order, Payment, PaymentMethod, Timestamp};
    use crate::wallet::Txid;

    fn sample_contract() -> Contract {
        Contract {
            vendor_listings: vec![Listing {
                slug: "hand-thrown-mug".into(),
                vendor_id: "QmVendor".into(),
                item: Some(Item {
                    title: "Hand Thrown Mug".into(),
                    description: "Stoneware".into(),
                    price: 1_200,
                    images: vec![Image {
                        hash: "zb2rhMug".into(),
                        filename: "mug.png".into(),
                    }],
                }),
            }],
            buyer_order: Some(Order {
                buyer_id: Some(BuyerId {
                    guid: "QmBuyer".into(),
                    blockchain_id: "@buyer".into(),
                }),
                timestamp: Some(Timestamp::from_seconds(1_490_000_000)),
                payment: Some(Payment {
                    method: PaymentMethod::Direct,
                    amount: 1_200,
                    address: "1BuyerPaysHere".into(),
                    ..Payment::default()
                }),
                ..Order::default()
            }),
            vendor_order_confirmation: None,
        }
    }

    #[test]
    fn test_document_roundtrip() {
        let contract = sample_contract();
        let doc = contract_to_document(&contract).unwrap();
        let decoded = contract_from_document(doc.as_bytes()).unwrap();
        assert_eq!(decoded, contract);
    }

    #[test]
    fn test_document_layout() {
        let doc = contract_to_document(&sample_contract()).unwrap();

        assert!(doc.starts_with("{\n    \"vendorListings\": ["));
        assert!(doc.contains("\"method\": \"DIRECT\""));
        // Defaults are emitted, not skipped.
        assert!(doc.contains("\"vendorOrderConfirmation\": null"));
        assert!(doc.contains("\"moderator\": \"\""));
    }

    #[test]
    fn test_document_missing_fields_default() {
        let contract = contract_from_document(br#"{"vendorListings": []}"#).unwrap();
        assert_eq!(contract, Contract::default());
    }

    #[test]
    fn test_document_rejects_garbage() {
        let err = contract_from_document(b"{not json").unwrap_err();
        assert!(matches!(err, CoreError::DecodingError(_)));
    }

    #[test]
    fn test_transactions_empty_forms() {
        assert!(decode_transactions(b"").unwrap().is_empty());
        assert!(decode_transactions(b"null").unwrap().is_empty());
        assert!(decode_transactions(b"[]").unwrap().is_empty());
        assert!(decode_transactions(b"[{").is_err());
    }

    #[test]
    fn test_transactions_roundtrip() {
        let records = vec![TransactionRecord {
            txid: Txid::from_bytes([7; 32]),
            index: 0,
            value: 1_200,
            script_pub_key: "a914".into(),
            spent: false,
            timestamp: 1_490_000_100,
        }];
        let bytes = encode_transactions(&records).unwrap();
        assert_eq!(decode_transactions(&bytes).unwrap(), records);
    }
}
