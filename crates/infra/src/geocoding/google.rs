//! Reqwest-backed Google Maps adapter.
//!
//! Owns transport details only: query encoding, timeout and HTTP error
//! mapping, and JSON decoding into a [`GeocodedAddress`].

use async_trait::async_trait;
use reqwest::Client;
use tracing::instrument;

use dreammap_core::{GeocodedAddress, Location};

use super::dto::GeocodeResponseDto;
use super::{GeocodeError, Geocoder};
use crate::config::GeocodingConfig;

/// Compass headings of the generated Street View images.
pub const STREET_VIEW_HEADINGS: [u16; 4] = [0, 90, 180, 270];

/// Street View image dimensions, `WIDTHxHEIGHT`.
pub const STREET_VIEW_SIZE: &str = "600x300";

pub struct GoogleGeocoder {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleGeocoder {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: &GeocodingConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    #[instrument(skip(self), err)]
    async fn resolve(&self, address: &str) -> Result<GeocodedAddress, GeocodeError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(GeocodeError::InvalidAddress);
        }
        let api_key = self.api_key.as_deref().ok_or(GeocodeError::MissingApiKey)?;

        let response = self
            .client
            .get(format!("{}/geocode/json", self.base_url))
            .query(&[("address", address), ("key", api_key)])
            .send()
            .await
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status.as_u16()));
        }

        let body: GeocodeResponseDto = response
            .json()
            .await
            .map_err(|e| GeocodeError::Decode(e.to_string()))?;
        let location = body.first_location()?;

        Ok(GeocodedAddress {
            location,
            street_view_urls: street_view_urls(&self.base_url, location, api_key),
        })
    }
}

/// One Street View image URL per heading in [`STREET_VIEW_HEADINGS`].
pub fn street_view_urls(base_url: &str, location: Location, api_key: &str) -> Vec<String> {
    STREET_VIEW_HEADINGS
        .iter()
        .map(|heading| {
            format!(
                "{base_url}/streetview?size={STREET_VIEW_SIZE}&location={},{}&heading={heading}&key={api_key}",
                location.lat, location.lng
            )
        })
        .collect()
}
