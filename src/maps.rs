//! Maps provider
//!
//! Optional map-based address entry. The provider is bootstrapped lazily and
//! at most once per process: concurrent callers wait on the same in-flight
//! bootstrap and share its result. A failed bootstrap leaves nothing cached,
//! so a later call tries again.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::checkout::LatLng;

/// Reverse geocoding endpoint.
pub const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Marker left in unconfigured keys.
const KEY_PLACEHOLDER: &str = "YOUR_";

/// Errors raised by the maps provider.
#[derive(Debug, Error)]
pub enum MapsError {
    /// No provider key is configured
    #[error("maps provider is not configured")]
    Disabled,

    /// HTTP transport failure
    #[error("maps http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with an error status
    #[error("maps provider returned status {0}")]
    Provider(String),
}

/// Provider credentials and requested libraries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapsSettings {
    /// Provider API key
    pub api_key: String,

    /// Provider libraries to enable, e.g. `places`
    pub libraries: Vec<String>,
}

impl MapsSettings {
    /// Whether the key is still a placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.api_key.is_empty() || self.api_key.contains(KEY_PLACEHOLDER)
    }
}

/// Turns a picked location into address text.
#[automock]
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Formatted address for a location, if the provider knows one.
    ///
    /// # Errors
    ///
    /// Returns a [`MapsError`] if the provider cannot be reached or refuses
    /// the request.
    async fn reverse_geocode(&self, location: LatLng) -> Result<Option<String>, MapsError>;
}

/// Brings up the maps provider.
#[automock]
#[async_trait]
pub trait MapsBootstrap: Send + Sync {
    /// Initialize the provider and return a geocoder bound to it.
    ///
    /// # Errors
    ///
    /// Returns a [`MapsError`] if the provider cannot be initialized.
    async fn bootstrap(&self, settings: &MapsSettings) -> Result<Arc<dyn Geocoder>, MapsError>;
}

/// Single-flight, lazily bootstrapped maps provider.
pub struct MapsLoader {
    settings: Option<MapsSettings>,
    bootstrap: Arc<dyn MapsBootstrap>,
    geocoder: OnceCell<Arc<dyn Geocoder>>,
}

impl fmt::Debug for MapsLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapsLoader")
            .field("settings", &self.settings)
            .field("loaded", &self.geocoder.initialized())
            .finish_non_exhaustive()
    }
}

impl MapsLoader {
    /// Create a loader. `None` settings disable map mode.
    pub fn new(settings: Option<MapsSettings>, bootstrap: Arc<dyn MapsBootstrap>) -> Self {
        Self {
            settings,
            bootstrap,
            geocoder: OnceCell::new(),
        }
    }

    /// A loader backed by the HTTP provider.
    pub fn http(settings: Option<MapsSettings>) -> Self {
        Self::new(settings, Arc::new(HttpMapsBootstrap))
    }

    /// Whether map mode is available at all.
    pub fn is_enabled(&self) -> bool {
        self.settings.is_some()
    }

    /// Whether a bootstrap has already succeeded.
    pub fn is_loaded(&self) -> bool {
        self.geocoder.initialized()
    }

    /// Get the geocoder, bootstrapping the provider on first use.
    ///
    /// # Errors
    ///
    /// Returns [`MapsError::Disabled`] when no settings are configured, or the
    /// bootstrap error. Failed bootstraps are retried on the next call.
    pub async fn load(&self) -> Result<Arc<dyn Geocoder>, MapsError> {
        let settings = self.settings.as_ref().ok_or(MapsError::Disabled)?;

        let geocoder = self
            .geocoder
            .get_or_try_init(|| async {
                debug!(libraries = ?settings.libraries, "bootstrapping maps provider");

                self.bootstrap.bootstrap(settings).await
            })
            .await?;

        Ok(Arc::clone(geocoder))
    }

    /// Address text for a picked location. Failures are logged and yield `None`.
    pub async fn describe_location(&self, location: LatLng) -> Option<String> {
        let geocoder = match self.load().await {
            Ok(geocoder) => geocoder,
            Err(error) => {
                warn!(%error, "maps provider unavailable");
                return None;
            }
        };

        match geocoder.reverse_geocode(location).await {
            Ok(address) => address,
            Err(error) => {
                warn!(%error, lat = location.lat, lng = location.lng, "reverse geocoding failed");
                None
            }
        }
    }
}

/// Bootstraps the HTTP geocoding provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpMapsBootstrap;

#[async_trait]
impl MapsBootstrap for HttpMapsBootstrap {
    async fn bootstrap(&self, settings: &MapsSettings) -> Result<Arc<dyn Geocoder>, MapsError> {
        if settings.is_placeholder() {
            warn!("maps API key is not set; update the provider configuration");
        }

        Ok(Arc::new(GoogleGeocoder::new(settings.api_key.clone())?))
    }
}

/// Reverse geocoding over the provider's JSON API.
#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
    api_key: String,
    http: Client,
}

impl GoogleGeocoder {
    /// Create a geocoder for the given key.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: String) -> Result<Self, MapsError> {
        Ok(Self {
            api_key,
            http: Client::builder().build()?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,

    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
}

impl GeocodeResponse {
    fn into_address(self) -> Result<Option<String>, MapsError> {
        match self.status.as_str() {
            "OK" => Ok(self
                .results
                .into_iter()
                .next()
                .map(|result| result.formatted_address)),
            "ZERO_RESULTS" => Ok(None),
            _ => Err(MapsError::Provider(self.status)),
        }
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn reverse_geocode(&self, location: LatLng) -> Result<Option<String>, MapsError> {
        let latlng = format!("{},{}", location.lat, location.lng);

        let response: GeocodeResponse = self
            .http
            .get(GEOCODE_URL)
            .query(&[("latlng", latlng.as_str()), ("key", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response.into_address()
    }
}
