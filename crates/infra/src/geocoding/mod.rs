//! External geocoding / Street View adapter.

use async_trait::async_trait;
use thiserror::Error;

use dreammap_core::GeocodedAddress;

mod dto;
pub mod google;

pub use google::GoogleGeocoder;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeocodeError {
    /// Rejected before any upstream call.
    #[error("address must not be blank")]
    InvalidAddress,

    #[error("geocoding API key is not configured")]
    MissingApiKey,

    #[error("geocoding request failed: {0}")]
    Transport(String),

    #[error("geocoding API responded with HTTP {0}")]
    Status(u16),

    #[error("geocoding API returned {status}: {message}")]
    Api { status: String, message: String },

    #[error("no geocoding results for address")]
    NoResults,

    #[error("invalid geocoding response: {0}")]
    Decode(String),
}

impl GeocodeError {
    /// Whether the failure came from (or on the way to) the upstream service,
    /// as opposed to bad caller input.
    pub fn is_upstream(&self) -> bool {
        !matches!(self, Self::InvalidAddress)
    }
}

/// Resolves a free-form address to a point plus Street View images.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, address: &str) -> Result<GeocodedAddress, GeocodeError>;
}
