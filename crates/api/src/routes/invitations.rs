//! Admin invitation routes.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use domain::models::invitation::{InviteReport, InviteRequest, RemindReport, RemindRequest};
use persistence::repositories::ChildRepository;
use shared::validation::SCHOOL_LEVELS;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::OutingInvitationManager;

/// One level row of the invitation screen.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LevelCount {
    pub level: String,
    pub count: i64,
}

/// Response for the level listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LevelsResponse {
    pub data: Vec<LevelCount>,
}

/// Invite children to an outing.
///
/// POST /api/v1/admin/outings/:id/invitations
pub async fn invite(
    State(state): State<AppState>,
    Path(outing_id): Path<Uuid>,
    Json(request): Json<InviteRequest>,
) -> Result<Json<InviteReport>, ApiError> {
    let manager =
        OutingInvitationManager::new(state.pool.clone(), state.config.calendar.timezone);

    let report = manager.invite(outing_id, &request).await?;
    Ok(Json(report))
}

/// Remind non-respondents of an outing.
///
/// POST /api/v1/admin/outings/:id/reminders
pub async fn remind(
    State(state): State<AppState>,
    Path(outing_id): Path<Uuid>,
    Json(request): Json<RemindRequest>,
) -> Result<Json<RemindReport>, ApiError> {
    let manager =
        OutingInvitationManager::new(state.pool.clone(), state.config.calendar.timezone);

    let report = manager.remind_invited(outing_id, &request).await?;
    Ok(Json(report))
}

/// The fixed level list with per-level child counts, in school order.
///
/// GET /api/v1/admin/levels
pub async fn list_levels(State(state): State<AppState>) -> Result<Json<LevelsResponse>, ApiError> {
    let children = ChildRepository::new(state.pool.clone());

    let counts = children.count_by_level().await?;
    let by_level: std::collections::HashMap<String, i64> = counts
        .into_iter()
        .map(|row| (row.level, row.count))
        .collect();

    let data = SCHOOL_LEVELS
        .iter()
        .map(|level| LevelCount {
            level: (*level).to_string(),
            count: by_level.get(*level).copied().unwrap_or(0),
        })
        .collect();

    Ok(Json(LevelsResponse { data }))
}
