//! Attendance entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::attendance::{Attendance, AttendanceStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for attendance_status that maps to the PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "attendance_status", rename_all = "lowercase")]
pub enum AttendanceStatusDb {
    Present,
    Absent,
    Late,
    Excused,
}

impl From<AttendanceStatusDb> for AttendanceStatus {
    fn from(db_status: AttendanceStatusDb) -> Self {
        match db_status {
            AttendanceStatusDb::Present => AttendanceStatus::Present,
            AttendanceStatusDb::Absent => AttendanceStatus::Absent,
            AttendanceStatusDb::Late => AttendanceStatus::Late,
            AttendanceStatusDb::Excused => AttendanceStatus::Excused,
        }
    }
}

impl From<AttendanceStatus> for AttendanceStatusDb {
    fn from(status: AttendanceStatus) -> Self {
        match status {
            AttendanceStatus::Present => AttendanceStatusDb::Present,
            AttendanceStatus::Absent => AttendanceStatusDb::Absent,
            AttendanceStatus::Late => AttendanceStatusDb::Late,
            AttendanceStatus::Excused => AttendanceStatusDb::Excused,
        }
    }
}

/// Database row mapping for the attendances table.
#[derive(Debug, Clone, FromRow)]
pub struct AttendanceEntity {
    pub id: Uuid,
    pub child_id: Uuid,
    pub date: NaiveDate,
    pub status: AttendanceStatusDb,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<AttendanceEntity> for Attendance {
    fn from(entity: AttendanceEntity) -> Self {
        Self {
            id: entity.id,
            child_id: entity.child_id,
            date: entity.date,
            status: entity.status.into(),
            notes: entity.notes,
            created_at: entity.created_at,
        }
    }
}

/// Present/absent tally row over a period.
#[derive(Debug, Clone, FromRow)]
pub struct AttendanceStatsEntity {
    pub present_count: i64,
    pub absent_count: i64,
}
