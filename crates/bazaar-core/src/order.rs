//! Order lifecycle states.
//!
//! The store never drives transitions; it persists whichever state the
//! order-processing logic hands it, as a stable integer code.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Lifecycle stage of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum OrderState {
    /// Order received, nothing else has happened.
    #[default]
    Pending = 0,
    /// Waiting for the buyer to fund the payment address.
    AwaitingPayment = 1,
    /// Funded, waiting for an in-person pickup.
    AwaitingPickup = 2,
    /// Funded, waiting for the vendor to ship.
    AwaitingFulfillment = 3,
    /// Some, not all, items have been fulfilled.
    PartiallyFulfilled = 4,
    /// All items fulfilled.
    Fulfilled = 5,
    /// Buyer confirmed receipt and payment was released.
    Completed = 6,
    /// Buyer cancelled before the vendor accepted.
    Canceled = 7,
    /// Vendor declined the order.
    Declined = 8,
    /// Vendor refunded the buyer.
    Refunded = 9,
    /// A dispute was opened with the moderator.
    Disputed = 10,
    /// The moderator made a decision.
    Decided = 11,
    /// The dispute payout was accepted.
    Resolved = 12,
}

impl OrderState {
    /// All states, in code order.
    pub const ALL: [OrderState; 13] = [
        Self::Pending,
        Self::AwaitingPayment,
        Self::AwaitingPickup,
        Self::AwaitingFulfillment,
        Self::PartiallyFulfilled,
        Self::Fulfilled,
        Self::Completed,
        Self::Canceled,
        Self::Declined,
        Self::Refunded,
        Self::Disputed,
        Self::Decided,
        Self::Resolved,
    ];

    /// Convert to the integer code used in storage.
    pub fn to_i64(self) -> i64 {
        self as i64
    }

    /// Try to parse from a stored integer code.
    pub fn from_i64(value: i64) -> Option<Self> {
        usize::try_from(value)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
    }
}

impl TryFrom<i64> for OrderState {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_i64(value).ok_or(CoreError::UnknownOrderState(value))
    }
}

impl fmt::Display for OrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "PENDING",
            Self::AwaitingPayment => "AWAITING_PAYMENT",
            Self::AwaitingPickup => "AWAITING_PICKUP",
            Self::AwaitingFulfillment => "AWAITING_FULFILLMENT",
            Self::PartiallyFulfilled => "PARTIALLY_FULFILLED",
            Self::Fulfilled => "FULFILLED",
            Self::Completed => "COMPLETED",
            Self::Canceled => "CANCELED",
            Self::Declined => "DECLINED",
            Self::Refunded => "REFUNDED",
            Self::Disputed => "DISPUTED",
            Self::Decided => "DECIDED",
            Self::Resolved => "RESOLVED",
        };
        f.write_str(name)
    }
}
