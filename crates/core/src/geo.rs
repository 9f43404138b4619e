//! Geocoding results.

use serde::{Deserialize, Serialize};

/// A WGS84 point as returned by the geocoder.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

/// An address resolved to a point, with Street View images around it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodedAddress {
    pub location: Location,
    /// One image URL per compass heading (0, 90, 180, 270).
    pub street_view_urls: Vec<String>,
}
