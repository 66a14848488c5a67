//! Order Endpoint Config

use std::time::Duration;

use clap::Args;
use rust_decimal::Decimal;

use crate::checkout::{HttpOrderGateway, SubmitError};

/// Remote order endpoint settings.
#[derive(Debug, Args)]
pub struct OrderConfig {
    /// Base URL orders are posted to (`{base}/order`)
    #[arg(long, env = "ORDER_BASE_URL", default_value = "http://localhost:3000")]
    pub order_base_url: String,

    /// Submission timeout in seconds
    #[arg(long, env = "ORDER_TIMEOUT_SECONDS", default_value_t = 15)]
    pub order_timeout_seconds: u64,

    /// Minimum order total; 0 disables the check
    #[arg(long, env = "MINIMUM_ORDER", default_value_t = Decimal::ZERO)]
    pub minimum_order: Decimal,
}

impl OrderConfig {
    /// Submission timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.order_timeout_seconds)
    }

    /// Build the HTTP gateway.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn gateway(&self) -> Result<HttpOrderGateway, SubmitError> {
        HttpOrderGateway::new(&self.order_base_url, self.timeout())
    }
}
