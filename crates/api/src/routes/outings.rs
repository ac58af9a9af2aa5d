//! Admin outing management routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::outing::{CreateOutingRequest, Outing, OutingSummary, UpdateCapacityRequest};
use persistence::repositories::{OutingRegistrationRepository, OutingRepository};

use crate::app::AppState;
use crate::error::ApiError;

/// Response for the admin outings listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct OutingsResponse {
    pub data: Vec<OutingSummary>,
}

/// Create a new outing.
///
/// POST /api/v1/admin/outings
pub async fn create_outing(
    State(state): State<AppState>,
    Json(request): Json<CreateOutingRequest>,
) -> Result<(StatusCode, Json<Outing>), ApiError> {
    request.validate()?;

    let outings = OutingRepository::new(state.pool.clone());

    let outing = outings
        .create(
            request.title.trim(),
            request.starts_at,
            request.location.as_deref(),
            request.description.as_deref(),
            request.image_url.as_deref(),
            request.capacity,
        )
        .await?;

    info!(
        outing_id = %outing.id,
        title = %outing.title,
        capacity = ?outing.capacity,
        "Outing created"
    );

    Ok((StatusCode::CREATED, Json(outing.into())))
}

/// List all outings with their signed counts, most recent first.
///
/// GET /api/v1/admin/outings
pub async fn list_outings(
    State(state): State<AppState>,
) -> Result<Json<OutingsResponse>, ApiError> {
    let outings = OutingRepository::new(state.pool.clone());
    let registrations = OutingRegistrationRepository::new(state.pool.clone());

    let all = outings.list_all().await?;
    let outing_ids: Vec<Uuid> = all.iter().map(|o| o.id).collect();
    let signed_counts = registrations.count_signed_by_outing_ids(&outing_ids).await?;
    let counts_by_outing: std::collections::HashMap<Uuid, i64> = signed_counts
        .into_iter()
        .map(|row| (row.outing_id, row.signed_count))
        .collect();

    let data = all
        .into_iter()
        .map(|o| OutingSummary {
            signed_count: counts_by_outing.get(&o.id).copied().unwrap_or(0),
            id: o.id,
            title: o.title,
            starts_at: o.starts_at,
            location: o.location,
            image_url: o.image_url,
            capacity: o.capacity,
        })
        .collect();

    Ok(Json(OutingsResponse { data }))
}

/// Update an outing's capacity.
///
/// PATCH /api/v1/admin/outings/:id/capacity
///
/// Lowering capacity below the current signed count leaves existing
/// signatures in place; no eviction happens.
pub async fn update_capacity(
    State(state): State<AppState>,
    Path(outing_id): Path<Uuid>,
    Json(request): Json<UpdateCapacityRequest>,
) -> Result<Json<Outing>, ApiError> {
    request.validate()?;

    let outings = OutingRepository::new(state.pool.clone());

    let outing = outings
        .update_capacity(outing_id, request.capacity)
        .await?
        .ok_or_else(|| ApiError::NotFound("Outing not found".to_string()))?;

    info!(
        outing_id = %outing.id,
        capacity = ?outing.capacity,
        "Outing capacity updated"
    );

    Ok(Json(outing.into()))
}
