//! Dreams: geotagged records owned by a user.

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::id::{DreamId, UserId};

/// A stored dream, serialized with the camelCase field names clients use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dream {
    pub id: DreamId,
    pub description: String,
    pub image_path: Option<String>,
    pub street_view_image: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub done: bool,
    /// Owner at creation time. Recorded only; mutations are not restricted to it.
    pub user_id: UserId,
}

impl Entity for Dream {
    type Id = DreamId;

    fn id(&self) -> DreamId {
        self.id
    }
}

/// A validated dream ready to be inserted. New dreams always start with `done = false`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDream {
    pub description: String,
    pub image_path: Option<String>,
    pub street_view_image: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub user_id: UserId,
}

impl NewDream {
    pub fn new(
        user_id: UserId,
        description: String,
        image_path: Option<String>,
        street_view_image: Option<String>,
        latitude: f64,
        longitude: f64,
    ) -> DomainResult<Self> {
        validate_description(&description)?;
        validate_latitude(latitude)?;
        validate_longitude(longitude)?;
        Ok(Self {
            description,
            image_path,
            street_view_image,
            latitude,
            longitude,
            user_id,
        })
    }

    /// Materialize the stored record once the store has assigned an id.
    pub fn into_dream(self, id: DreamId) -> Dream {
        Dream {
            id,
            description: self.description,
            image_path: self.image_path,
            street_view_image: self.street_view_image,
            latitude: self.latitude,
            longitude: self.longitude,
            done: false,
            user_id: self.user_id,
        }
    }
}

/// Field replacement for an existing dream. `None` leaves the stored value untouched.
///
/// The nullable fields are doubly optional: `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DreamChanges {
    pub description: Option<String>,
    pub image_path: Option<Option<String>>,
    pub street_view_image: Option<Option<String>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl DreamChanges {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        if let Some(latitude) = self.latitude {
            validate_latitude(latitude)?;
        }
        if let Some(longitude) = self.longitude {
            validate_longitude(longitude)?;
        }
        Ok(())
    }

    pub fn apply_to(&self, dream: &mut Dream) {
        if let Some(description) = &self.description {
            dream.description.clone_from(description);
        }
        if let Some(image_path) = &self.image_path {
            dream.image_path.clone_from(image_path);
        }
        if let Some(street_view_image) = &self.street_view_image {
            dream.street_view_image.clone_from(street_view_image);
        }
        if let Some(latitude) = self.latitude {
            dream.latitude = latitude;
        }
        if let Some(longitude) = self.longitude {
            dream.longitude = longitude;
        }
    }
}

fn validate_description(description: &str) -> DomainResult<()> {
    if description.trim().is_empty() {
        return Err(DomainError::validation("description must not be blank"));
    }
    Ok(())
}

fn validate_latitude(latitude: f64) -> DomainResult<()> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(DomainError::validation("latitude must be within [-90, 90]"));
    }
    Ok(())
}

fn validate_longitude(longitude: f64) -> DomainResult<()> {
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(DomainError::validation("longitude must be within [-180, 180]"));
    }
    Ok(())
}
