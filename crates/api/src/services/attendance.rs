//! Attendance recorder.
//!
//! Reconciles a full-roster status submission for one day against existing
//! records. The roster of eligible children is resolved here (validated
//! children of approved parents); the per-day write batch itself is one
//! repository transaction.

use chrono::NaiveDate;
use chrono_tz::Tz;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use domain::models::attendance::{RosterCounts, SaveRosterRequest};
use persistence::entities::{AttendanceStatusDb, ChildEntity};
use persistence::repositories::{AttendanceRepository, ChildRepository};

use crate::error::ApiError;

/// One line of the admin roster view.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RosterLine {
    pub child_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub level: String,
    /// Recorded status for the day, absent means "unset".
    pub status: Option<domain::models::attendance::AttendanceStatus>,
}

/// The admin roster view for one day.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RosterView {
    pub date: NaiveDate,
    pub children: Vec<RosterLine>,
}

/// Service recording daily attendance rosters.
#[derive(Clone)]
pub struct AttendanceRecorder {
    attendances: AttendanceRepository,
    children: ChildRepository,
    timezone: Tz,
}

impl AttendanceRecorder {
    /// Creates the service over the given connection pool.
    pub fn new(pool: PgPool, timezone: Tz) -> Self {
        Self {
            attendances: AttendanceRepository::new(pool.clone()),
            children: ChildRepository::new(pool),
            timezone,
        }
    }

    /// Today's date in the configured civil zone.
    ///
    /// The zone is explicit so the roster day never shifts around midnight
    /// for operators away from UTC.
    pub fn today(&self) -> NaiveDate {
        chrono::Utc::now().with_timezone(&self.timezone).date_naive()
    }

    /// The eligible roster with any statuses already recorded for `date`.
    pub async fn roster_for_day(&self, date: NaiveDate) -> Result<RosterView, ApiError> {
        let children = self.eligible_roster().await?;
        let recorded = self.attendances.find_for_day(date).await?;

        let by_child: std::collections::HashMap<Uuid, AttendanceStatusDb> =
            recorded.iter().map(|a| (a.child_id, a.status)).collect();

        let lines = children
            .into_iter()
            .map(|child| RosterLine {
                status: by_child.get(&child.id).map(|s| (*s).into()),
                child_id: child.id,
                first_name: child.first_name,
                last_name: child.last_name,
                level: child.level,
            })
            .collect();

        Ok(RosterView {
            date,
            children: lines,
        })
    }

    /// Applies one roster submission.
    ///
    /// Children missing from the posted map count as `unset`; children
    /// outside the eligible roster are ignored. The whole batch commits in
    /// one transaction and the returned counts feed the operator's feedback
    /// line.
    pub async fn save_roster(&self, request: &SaveRosterRequest) -> Result<(NaiveDate, RosterCounts), ApiError> {
        let date = request.date.unwrap_or_else(|| self.today());
        let children = self.eligible_roster().await?;

        let entries: Vec<(Uuid, Option<AttendanceStatusDb>)> = children
            .iter()
            .map(|child| {
                let status = request
                    .statuses
                    .get(&child.id)
                    .and_then(|posted| posted.as_attendance())
                    .map(AttendanceStatusDb::from);
                (child.id, status)
            })
            .collect();

        let counts = self.attendances.reconcile_day(date, &entries).await?;

        info!(
            date = %date,
            created = counts.created,
            updated = counts.updated,
            deleted = counts.deleted,
            "Attendance roster saved"
        );

        Ok((date, counts))
    }

    /// Validated children of approved parents, the roster eligible for
    /// attendance marking.
    async fn eligible_roster(&self) -> Result<Vec<ChildEntity>, ApiError> {
        Ok(self.children.find_validated(&[], &[]).await?)
    }
}
