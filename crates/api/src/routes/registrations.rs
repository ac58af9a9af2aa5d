//! Outing registration routes: the parent outings tab, the consent form and
//! the post-event admin review.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use domain::models::outing::OutingSummary;
use domain::models::registration::{
    OutingRegistration, RegistrationDetail, RegistrationStatus, RegistrationWithOuting,
    SignRequest, SignatureMetadata,
};
use persistence::entities::RegistrationWithOutingEntity;
use persistence::repositories::{OutingRegistrationRepository, OutingRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ParentAuth;
use crate::services::OutingConsentService;

/// Most recent past outings shown in the tab.
const PAST_OUTINGS_LIMIT: usize = 20;

/// Response for the parent outings tab.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ChildOutingsResponse {
    /// The child's registrations for outings that have not started yet.
    pub upcoming: Vec<RegistrationWithOuting>,
    /// The child's registrations for past outings, most recent first.
    pub past: Vec<RegistrationWithOuting>,
    /// Signed registrations among `upcoming`.
    pub signed_count: u32,
    pub total_upcoming: u32,
    /// Percentage of upcoming registrations already signed.
    pub signed_rate: i32,
    /// All outings with their global signed counts, most recent first.
    pub outings: Vec<OutingSummary>,
}

/// Admin request to set a post-event review status.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ReviewRequest {
    pub status: RegistrationStatus,
}

/// The outings tab for one child.
///
/// GET /api/v1/account/children/:child_id/outings
pub async fn child_outings(
    State(state): State<AppState>,
    parent: ParentAuth,
    Path(child_id): Path<Uuid>,
) -> Result<Json<ChildOutingsResponse>, ApiError> {
    let children = persistence::repositories::ChildRepository::new(state.pool.clone());
    let registrations = OutingRegistrationRepository::new(state.pool.clone());
    let outings = OutingRepository::new(state.pool.clone());

    children
        .find_owned(child_id, parent.parent_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Child not found".to_string()))?;

    let child_regs = registrations.find_for_child(child_id).await?;
    let now = chrono::Utc::now();

    let (upcoming_rows, mut past_rows): (Vec<_>, Vec<_>) = child_regs
        .into_iter()
        .partition(|r| r.outing_starts_at >= now);

    past_rows.sort_by(|a, b| b.outing_starts_at.cmp(&a.outing_starts_at));
    past_rows.truncate(PAST_OUTINGS_LIMIT);

    let signed_count = upcoming_rows
        .iter()
        .filter(|r| {
            r.signed_at.is_some() || RegistrationStatus::from(r.status).counts_as_signed()
        })
        .count() as u32;
    let total_upcoming = upcoming_rows.len() as u32;
    let signed_rate = if total_upcoming == 0 {
        0
    } else {
        ((signed_count as f64) * 100.0 / (total_upcoming as f64)).round() as i32
    };

    // Global signed counts so the tab can show "(n places restantes)".
    let all_outings = outings.list_all().await?;
    let outing_ids: Vec<Uuid> = all_outings.iter().map(|o| o.id).collect();
    let signed_counts = registrations.count_signed_by_outing_ids(&outing_ids).await?;
    let counts_by_outing: std::collections::HashMap<Uuid, i64> = signed_counts
        .into_iter()
        .map(|row| (row.outing_id, row.signed_count))
        .collect();

    let outing_summaries = all_outings
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

    Ok(Json(ChildOutingsResponse {
        upcoming: upcoming_rows.iter().map(to_registration_with_outing).collect(),
        past: past_rows.iter().map(to_registration_with_outing).collect(),
        signed_count,
        total_upcoming,
        signed_rate,
        outings: outing_summaries,
    }))
}

/// Detail of one registration, including the signature block once signed.
///
/// GET /api/v1/account/registrations/:id
pub async fn registration_detail(
    State(state): State<AppState>,
    parent: ParentAuth,
    Path(registration_id): Path<Uuid>,
) -> Result<Json<RegistrationDetail>, ApiError> {
    let registrations = OutingRegistrationRepository::new(state.pool.clone());

    let row = registrations
        .find_owned_with_outing(registration_id, parent.parent_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Registration not found".to_string()))?;

    Ok(Json(RegistrationDetail {
        id: row.id,
        child_id: row.child_id,
        status: row.status.into(),
        notes: row.notes.clone(),
        signed_at: row.signed_at,
        signature_name: row.signature_name.clone(),
        signature_phone: row.signature_phone.clone(),
        health_notes: row.health_notes.clone(),
        signature_image: row.signature_image.clone(),
        outing: row.outing(),
    }))
}

/// Sign the consent form for a registration.
///
/// POST /api/v1/account/registrations/:id/sign
pub async fn sign_registration(
    State(state): State<AppState>,
    parent: ParentAuth,
    Path(registration_id): Path<Uuid>,
    headers: HeaderMap,
    Json(request): Json<SignRequest>,
) -> Result<Json<OutingRegistration>, ApiError> {
    let service = OutingConsentService::new(state.pool.clone());

    let metadata = SignatureMetadata {
        ip: client_ip(&headers),
        user_agent: headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    };

    let registration = service
        .sign(registration_id, parent.parent_id, &request, metadata)
        .await?;

    Ok(Json(registration))
}

/// Decline an invitation.
///
/// POST /api/v1/account/registrations/:id/decline
pub async fn decline_registration(
    State(state): State<AppState>,
    parent: ParentAuth,
    Path(registration_id): Path<Uuid>,
) -> Result<Json<OutingRegistration>, ApiError> {
    let registrations = OutingRegistrationRepository::new(state.pool.clone());

    let registration = registrations
        .decline(registration_id, parent.parent_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Registration not found".to_string()))?;

    info!(registration_id = %registration.id, "Invitation declined");

    Ok(Json(registration.into()))
}

/// Set the post-event review status of a registration.
///
/// POST /api/v1/admin/registrations/:id/review
///
/// Only `attended` and `absent` are valid review statuses.
pub async fn review_registration(
    State(state): State<AppState>,
    Path(registration_id): Path<Uuid>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<OutingRegistration>, ApiError> {
    if !matches!(
        request.status,
        RegistrationStatus::Attended | RegistrationStatus::Absent
    ) {
        return Err(ApiError::Validation(
            "Review status must be attended or absent".to_string(),
        ));
    }

    let registrations = OutingRegistrationRepository::new(state.pool.clone());

    let registration = registrations
        .set_review_status(registration_id, request.status.into())
        .await?
        .ok_or_else(|| ApiError::NotFound("Registration not found".to_string()))?;

    info!(
        registration_id = %registration.id,
        status = %RegistrationStatus::from(registration.status),
        "Registration reviewed"
    );

    Ok(Json(registration.into()))
}

fn to_registration_with_outing(row: &RegistrationWithOutingEntity) -> RegistrationWithOuting {
    RegistrationWithOuting {
        id: row.id,
        child_id: row.child_id,
        status: row.status.into(),
        signed_at: row.signed_at,
        outing: row.outing(),
    }
}

/// Best-effort client address for the signature audit trail.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_client_ip_from_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("192.0.2.10, 10.0.0.1"),
        );
        assert_eq!(client_ip(&headers).as_deref(), Some("192.0.2.10"));
    }

    #[test]
    fn test_client_ip_from_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("192.0.2.20"));
        assert_eq!(client_ip(&headers).as_deref(), Some("192.0.2.20"));
    }

    #[test]
    fn test_client_ip_missing() {
        let headers = HeaderMap::new();
        assert_eq!(client_ip(&headers), None);
    }
}
