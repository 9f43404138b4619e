//! Request/response bodies. Field names are camelCase on the wire.

use serde::{Deserialize, Deserializer, Serialize};

use dreammap_core::{DomainResult, DreamChanges, NewDream, UserId};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDreamRequest {
    pub description: String,
    #[serde(default)]
    pub image_path: Option<String>,
    /// Stored as the dream's `streetViewImage`.
    #[serde(default)]
    pub selected_street_view: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl CreateDreamRequest {
    pub fn into_new_dream(self, owner: UserId) -> DomainResult<NewDream> {
        NewDream::new(
            owner,
            self.description,
            self.image_path,
            self.selected_street_view,
            self.latitude,
            self.longitude,
        )
    }
}

/// Omitted fields are left unchanged; an explicit `null` clears the nullable ones.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDreamRequest {
    pub description: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub image_path: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub street_view_image: Option<Option<String>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl UpdateDreamRequest {
    pub fn into_changes(self) -> DomainResult<DreamChanges> {
        let changes = DreamChanges {
            description: self.description,
            image_path: self.image_path,
            street_view_image: self.street_view_image,
            latitude: self.latitude,
            longitude: self.longitude,
        };
        changes.validate()?;
        Ok(changes)
    }
}

/// Marks a field as present, so `null` arrives as `Some(None)` rather than `None`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct SetDoneRequest {
    pub done: bool,
}

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CoordinatesRequest {
    pub address: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn selected_street_view_becomes_street_view_image() {
        let req: CreateDreamRequest = serde_json::from_value(json!({
            "description": "Climb it",
            "imagePath": "/img/1.png",
            "selectedStreetView": "https://sv/0",
            "latitude": 45.0,
            "longitude": 6.0,
        }))
        .unwrap();

        let dream = req.into_new_dream(UserId::new(3)).unwrap();
        assert_eq!(dream.street_view_image.as_deref(), Some("https://sv/0"));
        assert_eq!(dream.image_path.as_deref(), Some("/img/1.png"));
        assert_eq!(dream.user_id, UserId::new(3));
    }

    #[test]
    fn create_requires_coordinates() {
        let parsed = serde_json::from_value::<CreateDreamRequest>(json!({ "description": "d" }));
        assert!(parsed.is_err());
    }

    #[test]
    fn empty_update_changes_nothing() {
        let req: UpdateDreamRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(req.into_changes().unwrap(), DreamChanges::default());
    }

    #[test]
    fn update_distinguishes_null_from_omitted() {
        let req: UpdateDreamRequest =
            serde_json::from_value(json!({ "imagePath": null, "streetViewImage": "https://sv/1" }))
                .unwrap();
        let changes = req.into_changes().unwrap();

        assert_eq!(changes.image_path, Some(None));
        assert_eq!(changes.street_view_image, Some(Some("https://sv/1".into())));
        assert_eq!(changes.description, None);
    }

    #[test]
    fn update_validates_present_fields() {
        let req = UpdateDreamRequest {
            latitude: Some(120.0),
            ..Default::default()
        };
        assert!(req.into_changes().is_err());
    }
}
