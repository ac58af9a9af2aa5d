//! Parent account routes: profile, children and message threads.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::child::ChildSummary;
use domain::models::message::{Message, SendMessageRequest, PARENT_MESSAGE_SUBJECT};
use domain::models::parent::ParentProfile;
use persistence::entities::MessageSenderDb;
use persistence::repositories::{ChildRepository, MessageRepository, ParentProfileRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ParentAuth;

/// Default and maximum number of messages returned per thread.
const DEFAULT_MESSAGE_LIMIT: i64 = 50;
const MAX_MESSAGE_LIMIT: i64 = 200;

/// Response for the children listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ChildrenResponse {
    pub data: Vec<ChildSummary>,
}

/// Query parameters for the message listing.
#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    pub limit: Option<i64>,
}

/// Response for the message listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MessagesResponse {
    pub data: Vec<Message>,
}

/// Get the calling parent's profile.
///
/// GET /api/v1/account/profile
pub async fn get_profile(
    State(state): State<AppState>,
    parent: ParentAuth,
) -> Result<Json<ParentProfile>, ApiError> {
    let profiles = ParentProfileRepository::new(state.pool.clone());

    let profile = profiles
        .find_by_id(parent.parent_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    Ok(Json(profile.into()))
}

/// List the calling parent's children.
///
/// GET /api/v1/account/children
pub async fn list_children(
    State(state): State<AppState>,
    parent: ParentAuth,
) -> Result<Json<ChildrenResponse>, ApiError> {
    let children = ChildRepository::new(state.pool.clone());

    let kids = children.find_for_parent(parent.parent_id).await?;
    let data = kids
        .into_iter()
        .map(|entity| domain::models::child::Child::from(entity).into())
        .collect();

    Ok(Json(ChildrenResponse { data }))
}

/// List a child's message thread, newest first.
///
/// GET /api/v1/account/children/:child_id/messages
pub async fn list_messages(
    State(state): State<AppState>,
    parent: ParentAuth,
    Path(child_id): Path<Uuid>,
    Query(query): Query<MessagesQuery>,
) -> Result<Json<MessagesResponse>, ApiError> {
    let children = ChildRepository::new(state.pool.clone());
    let messages = MessageRepository::new(state.pool.clone());

    children
        .find_owned(child_id, parent.parent_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Child not found".to_string()))?;

    let limit = query
        .limit
        .unwrap_or(DEFAULT_MESSAGE_LIMIT)
        .clamp(1, MAX_MESSAGE_LIMIT);

    let rows = messages.list_for_child(child_id, limit).await?;
    let data = rows.into_iter().map(Into::into).collect();

    Ok(Json(MessagesResponse { data }))
}

/// Send a free-text message from the parent to the staff.
///
/// POST /api/v1/account/messages
pub async fn send_message(
    State(state): State<AppState>,
    parent: ParentAuth,
    Json(request): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    request.validate()?;

    let children = ChildRepository::new(state.pool.clone());
    let messages = MessageRepository::new(state.pool.clone());

    children
        .find_owned(request.child_id, parent.parent_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Child not found".to_string()))?;

    let body = request.body.trim();
    if body.is_empty() {
        return Err(ApiError::Validation("Message vide.".to_string()));
    }

    let message = messages
        .create(
            request.child_id,
            PARENT_MESSAGE_SUBJECT,
            body,
            MessageSenderDb::Parent,
        )
        .await?;

    info!(
        child_id = %request.child_id,
        message_id = %message.id,
        "Parent message sent"
    );

    Ok((StatusCode::CREATED, Json(message.into())))
}
