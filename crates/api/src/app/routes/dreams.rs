use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
};

use tracing::instrument;

use dreammap_core::{Dream, DreamId, GeocodedAddress};
use dreammap_infra::StoreError;

use crate::app::dto::{
    CoordinatesRequest, CreateDreamRequest, MessageResponse, SetDoneRequest, UpdateDreamRequest,
};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::UserContext;

#[instrument(skip_all, fields(operation = "list_dreams"))]
pub async fn list_dreams(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<Vec<Dream>>, ApiError> {
    let dreams = services
        .store
        .list_dreams()
        .await
        .map_err(|e| ApiError::internal("list_dreams", "Failed to fetch dreams", e))?;
    Ok(Json(dreams))
}

#[instrument(skip_all, fields(operation = "get_dream"))]
pub async fn get_dream(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<Dream>, ApiError> {
    let id: DreamId = id.parse()?;

    match services.store.get_dream(id).await {
        Ok(dream) => Ok(Json(dream)),
        Err(StoreError::NotFound) => Err(ApiError::NotFound("Dream not found")),
        Err(e) => Err(ApiError::internal("get_dream", "Failed to fetch dream", e)),
    }
}

#[instrument(skip_all, fields(operation = "create_dream"))]
pub async fn create_dream(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    body: Result<Json<CreateDreamRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Dream>), ApiError> {
    let Json(body) = body?;
    let new_dream = body.into_new_dream(user.user_id())?;

    let dream = services
        .store
        .create_dream(new_dream)
        .await
        .map_err(|e| ApiError::internal("create_dream", "Failed to create dream", e))?;

    tracing::info!(dream_id = %dream.id, user_id = %user.user_id(), "dream created");
    Ok((StatusCode::CREATED, Json(dream)))
}

#[instrument(skip_all, fields(operation = "update_dream"))]
pub async fn update_dream(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<UpdateDreamRequest>, JsonRejection>,
) -> Result<Json<Dream>, ApiError> {
    let id: DreamId = id.parse()?;
    let Json(body) = body?;
    let changes = body.into_changes()?;

    let dream = services
        .store
        .update_dream(id, changes)
        .await
        .map_err(|e| ApiError::internal("update_dream", "Failed to update dream", e))?;
    Ok(Json(dream))
}

#[instrument(skip_all, fields(operation = "set_dream_done"))]
pub async fn set_dream_done(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<SetDoneRequest>, JsonRejection>,
) -> Result<Json<Dream>, ApiError> {
    let id: DreamId = id.parse()?;
    let Json(body) = body?;

    let dream = services
        .store
        .set_dream_done(id, body.done)
        .await
        .map_err(|e| ApiError::internal("set_dream_done", "Failed to update dream status", e))?;
    Ok(Json(dream))
}

#[instrument(skip_all, fields(operation = "delete_dream"))]
pub async fn delete_dream(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id: DreamId = id.parse()?;

    services
        .store
        .delete_dream(id)
        .await
        .map_err(|e| ApiError::internal("delete_dream", "Failed to delete dream", e))?;
    Ok(Json(MessageResponse {
        message: "Dream deleted successfully",
    }))
}

#[instrument(skip_all, fields(operation = "geocode"))]
pub async fn coordinates(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<CoordinatesRequest>, JsonRejection>,
) -> Result<Json<GeocodedAddress>, ApiError> {
    let Json(body) = body?;
    let resolved = services.geocoder.resolve(&body.address).await?;
    Ok(Json(resolved))
}
