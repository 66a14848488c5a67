//! Order payload

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    cart::{Cart, CartLine},
    checkout::DeliveryAddress,
};

/// Body of the order submission request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPayload {
    /// Validated address form
    pub address: DeliveryAddress,

    /// Cart snapshot
    pub cart: Vec<CartLine>,

    /// Cart total at submission time
    pub total: Decimal,

    /// Submission instant, serialized as ISO-8601 UTC
    pub timestamp: Timestamp,
}

impl OrderPayload {
    /// Snapshot a cart for submission.
    pub fn new(address: DeliveryAddress, cart: &Cart, timestamp: Timestamp) -> Self {
        Self {
            address,
            cart: cart.items(),
            total: cart.total(),
            timestamp,
        }
    }
}
