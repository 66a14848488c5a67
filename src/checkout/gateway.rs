//! Remote order endpoint

use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::checkout::OrderPayload;

/// Errors that can occur when submitting an order.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Transport failure: connection, timeout or serialization
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status
    #[error("order rejected with status {status}: {body}")]
    Rejected {
        /// HTTP status code
        status: u16,

        /// Response body, possibly empty
        body: String,
    },
}

/// Accepts submitted orders.
#[automock]
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Submit an order. Only success or failure is reported back.
    ///
    /// # Errors
    ///
    /// Returns a [`SubmitError`] if the order was not accepted.
    async fn submit(&self, payload: &OrderPayload) -> Result<(), SubmitError>;
}

/// Posts orders as JSON to `{base_url}/order`.
#[derive(Debug, Clone)]
pub struct HttpOrderGateway {
    url: String,
    http: Client,
}

impl HttpOrderGateway {
    /// Create a gateway for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SubmitError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            url: order_url(base_url),
            http,
        })
    }

    /// Endpoint orders are posted to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl OrderGateway for HttpOrderGateway {
    async fn submit(&self, payload: &OrderPayload) -> Result<(), SubmitError> {
        debug!(url = %self.url, lines = payload.cart.len(), "posting order");

        let response = self.http.post(&self.url).json(payload).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();

            return Err(SubmitError::Rejected { status, body });
        }

        Ok(())
    }
}

fn order_url(base_url: &str) -> String {
    format!("{}/order", base_url.trim_end_matches('/'))
}
