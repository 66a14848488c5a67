//! Order submission pipeline
//!
//! Runs a checkout attempt to completion: validation, delivery hours,
//! minimum order, address persistence and finally the remote submission.
//! Every step before the submission is free of network effects, and nothing
//! at all is written unless validation passes.

use std::{fmt, sync::Arc};

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::{
    cart::Cart,
    checkout::{
        ADDRESS_STORAGE_KEY, Clock, DeliveryAddress, DeliveryWindow, OrderGateway, OrderPayload,
        SubmitError, SystemClock, ValidationError,
    },
    storage::{Storage, save_json},
};

/// Confirmation shown after a successful submission.
pub const SUBMITTED_NOTICE: &str =
    "We received your order and will contact you shortly to confirm it.";

/// Warning shown when the submission fails.
pub const FAILED_NOTICE: &str = "Error sending your order. Please check your connection.";

/// Where the customer ends up after a checkout attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Back on the address form, nothing sent
    Address,

    /// The landing page
    Landing,
}

/// Result of a checkout attempt.
#[derive(Debug)]
pub enum CheckoutOutcome {
    /// Rejected before any effect
    Invalid(ValidationError),

    /// Rejected because deliveries are closed at this hour
    OutsideDeliveryHours {
        /// Local hour in the delivery zone at the attempt
        local_hour: i8,

        /// User-facing description of the delivery window
        notice: String,
    },

    /// Accepted by the remote endpoint
    Submitted(OrderPayload),

    /// Sent but not accepted; the cart is untouched
    Failed(SubmitError),
}

impl CheckoutOutcome {
    /// Message to show the customer.
    pub fn notice(&self) -> String {
        match self {
            CheckoutOutcome::Invalid(error) => error.to_string(),
            CheckoutOutcome::OutsideDeliveryHours { notice, .. } => notice.clone(),
            CheckoutOutcome::Submitted(_) => SUBMITTED_NOTICE.to_string(),
            CheckoutOutcome::Failed(_) => FAILED_NOTICE.to_string(),
        }
    }

    /// View to show next.
    pub fn next_view(&self) -> View {
        match self {
            CheckoutOutcome::Invalid(_) | CheckoutOutcome::OutsideDeliveryHours { .. } => {
                View::Address
            }
            CheckoutOutcome::Submitted(_) | CheckoutOutcome::Failed(_) => View::Landing,
        }
    }

    /// Whether the order was accepted.
    pub fn is_submitted(&self) -> bool {
        matches!(self, CheckoutOutcome::Submitted(_))
    }
}

/// Checkout pipeline.
pub struct CheckoutPipeline {
    storage: Arc<dyn Storage>,
    gateway: Arc<dyn OrderGateway>,
    clock: Arc<dyn Clock>,
    window: DeliveryWindow,
    minimum_order: Decimal,
}

impl fmt::Debug for CheckoutPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutPipeline")
            .field("clock", &self.clock)
            .field("window", &self.window)
            .field("minimum_order", &self.minimum_order)
            .finish_non_exhaustive()
    }
}

impl CheckoutPipeline {
    /// Create a pipeline using the wall clock and no minimum order.
    pub fn new(
        storage: Arc<dyn Storage>,
        gateway: Arc<dyn OrderGateway>,
        window: DeliveryWindow,
    ) -> Self {
        Self {
            storage,
            gateway,
            clock: Arc::new(SystemClock),
            window,
            minimum_order: Decimal::ZERO,
        }
    }

    /// Use a different clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Require a minimum cart total; zero disables the check.
    #[must_use]
    pub fn with_minimum_order(mut self, minimum_order: Decimal) -> Self {
        self.minimum_order = minimum_order;
        self
    }

    /// Run one checkout attempt for `cart`.
    ///
    /// The cart is never modified. No retries are made.
    pub async fn submit(&self, cart: &Cart, address: DeliveryAddress) -> CheckoutOutcome {
        let address = match address.validated() {
            Ok(address) => address,
            Err(error) => return CheckoutOutcome::Invalid(error),
        };

        let now = self.clock.now();

        if !self.window.is_open(now) {
            let local_hour = self.window.local_hour(now);

            info!(local_hour, "checkout outside delivery hours");

            return CheckoutOutcome::OutsideDeliveryHours {
                local_hour,
                notice: self.window.notice(),
            };
        }

        if cart.is_empty() {
            return CheckoutOutcome::Invalid(ValidationError::EmptyCart);
        }

        let total = cart.total();

        if self.minimum_order > Decimal::ZERO && total < self.minimum_order {
            return CheckoutOutcome::Invalid(ValidationError::BelowMinimum {
                minimum: self.minimum_order,
                total,
            });
        }

        save_json(self.storage.as_ref(), ADDRESS_STORAGE_KEY, &address);

        let payload = OrderPayload::new(address, cart, now);

        match self.gateway.submit(&payload).await {
            Ok(()) => {
                info!(lines = payload.cart.len(), total = %payload.total, "order submitted");

                CheckoutOutcome::Submitted(payload)
            }
            Err(error) => {
                warn!(%error, "order submission failed");

                CheckoutOutcome::Failed(error)
            }
        }
    }
}
