//! DTOs for decoding Google Geocoding API responses.

use serde::Deserialize;

use dreammap_core::Location;

use super::GeocodeError;

#[derive(Debug, Deserialize)]
pub(super) struct GeocodeResponseDto {
    pub(super) status: String,
    #[serde(default)]
    pub(super) results: Vec<GeocodeResultDto>,
    pub(super) error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GeocodeResultDto {
    pub(super) geometry: GeometryDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct GeometryDto {
    pub(super) location: Location,
}

impl GeocodeResponseDto {
    /// Location of the first result. An empty result set is an error, whatever
    /// the reported status.
    pub(super) fn first_location(self) -> Result<Location, GeocodeError> {
        match self.status.as_str() {
            "OK" | "ZERO_RESULTS" => {}
            _ => {
                return Err(GeocodeError::Api {
                    message: self.error_message.unwrap_or_default(),
                    status: self.status,
                });
            }
        }

        let location = self
            .results
            .into_iter()
            .next()
            .map(|r| r.geometry.location)
            .ok_or(GeocodeError::NoResults)?;

        if !location.lat.is_finite() || !location.lng.is_finite() {
            return Err(GeocodeError::Decode("non-finite coordinates".into()));
        }
        Ok(location)
    }
}
