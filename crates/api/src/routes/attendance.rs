//! Attendance routes: the parent-facing Saturday calendar and the admin
//! roster form.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain::models::attendance::{Attendance, AttendanceStats, RosterCounts, SaveRosterRequest};
use domain::services::calendar::{
    build_month_view, clamp_month_into_year, default_school_start_year, month_bounds,
    parse_month_key, school_year_dates, MonthView,
};
use persistence::repositories::{AttendanceRepository, ChildRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ParentAuth;
use crate::services::AttendanceRecorder;

/// Trailing window for the account attendance KPIs, in days.
const STATS_WINDOW_DAYS: i64 = 30;

/// Query parameters for the month calendar view.
#[derive(Debug, Deserialize)]
pub struct MonthViewQuery {
    /// School start year (e.g. 2025 for the 2025/2026 year); defaults to the
    /// year containing today.
    pub year: Option<i32>,
    /// Month key "YYYY-MM"; defaults to today's month clamped into the
    /// school year.
    pub month: Option<String>,
}

/// Attendance stats block of the calendar response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct StatsBlock {
    pub present: i64,
    pub absent: i64,
    pub presence_rate: i32,
}

/// Response for the parent month calendar.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MonthViewResponse {
    pub school_year: i32,
    pub stats: StatsBlock,
    pub calendar: MonthView,
}

/// Query parameters for the admin roster view.
#[derive(Debug, Deserialize)]
pub struct RosterQuery {
    pub date: Option<NaiveDate>,
}

/// Response after saving a roster.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SaveRosterResponse {
    pub date: NaiveDate,
    pub counts: RosterCounts,
}

/// Month calendar for one child, Saturday slots only.
///
/// GET /api/v1/account/children/:child_id/attendance
pub async fn month_view(
    State(state): State<AppState>,
    parent: ParentAuth,
    Path(child_id): Path<Uuid>,
    Query(query): Query<MonthViewQuery>,
) -> Result<Json<MonthViewResponse>, ApiError> {
    let children = ChildRepository::new(state.pool.clone());
    let attendances = AttendanceRepository::new(state.pool.clone());

    children
        .find_owned(child_id, parent.parent_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Child not found".to_string()))?;

    let tz = state.config.calendar.timezone;
    let today = chrono::Utc::now().with_timezone(&tz).date_naive();

    let school_year = query.year.unwrap_or_else(|| default_school_start_year(today));
    let (sy_start, sy_end) = school_year_dates(school_year);

    let month_start = query
        .month
        .as_deref()
        .and_then(parse_month_key)
        .unwrap_or_else(|| clamp_month_into_year(today, sy_start, sy_end));

    let (from, to) = month_bounds(month_start);
    let records: Vec<Attendance> = attendances
        .find_for_child_between(child_id, from, to)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let calendar = build_month_view(month_start, &records, sy_start, sy_end);

    let window_start = today - Duration::days(STATS_WINDOW_DAYS);
    let tallies = attendances
        .stats_for_child(child_id, window_start, today)
        .await?;
    let stats = AttendanceStats {
        present: tallies.present_count,
        absent: tallies.absent_count,
    };

    Ok(Json(MonthViewResponse {
        school_year,
        stats: StatsBlock {
            present: stats.present,
            absent: stats.absent,
            presence_rate: stats.presence_rate(),
        },
        calendar,
    }))
}

/// The eligible roster and recorded statuses for one day.
///
/// GET /api/v1/admin/attendance
pub async fn get_roster(
    State(state): State<AppState>,
    Query(query): Query<RosterQuery>,
) -> Result<Json<crate::services::attendance::RosterView>, ApiError> {
    let recorder = AttendanceRecorder::new(state.pool.clone(), state.config.calendar.timezone);
    let date = query.date.unwrap_or_else(|| recorder.today());

    let view = recorder.roster_for_day(date).await?;
    Ok(Json(view))
}

/// Save one day's roster submission.
///
/// POST /api/v1/admin/attendance
pub async fn save_roster(
    State(state): State<AppState>,
    Json(request): Json<SaveRosterRequest>,
) -> Result<Json<SaveRosterResponse>, ApiError> {
    let recorder = AttendanceRecorder::new(state.pool.clone(), state.config.calendar.timezone);

    let (date, counts) = recorder.save_roster(&request).await?;
    Ok(Json(SaveRosterResponse { date, counts }))
}
