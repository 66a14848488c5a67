//! Checkout

mod customer;
mod gateway;
mod hours;
mod order;
mod pipeline;

pub use customer::{
    ADDRESS_STORAGE_KEY, AddressType, DeliveryAddress, LatLng, MIN_ADDRESS_CHARS, ValidationError,
    is_valid_phone, last_address,
};
pub use gateway::{HttpOrderGateway, MockOrderGateway, OrderGateway, SubmitError};
pub use hours::{
    Clock, DELIVERY_TIME_ZONE, DeliveryWindow, FixedClock, LAST_HOUR, OPEN_HOUR, SystemClock,
};
pub use order::OrderPayload;
pub use pipeline::{CheckoutOutcome, CheckoutPipeline, FAILED_NOTICE, SUBMITTED_NOTICE, View};
