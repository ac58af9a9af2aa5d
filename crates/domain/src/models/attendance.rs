//! Attendance domain models.
//!
//! One row per (child, day); the absence of a row means "unset".

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Stored attendance status.
///
/// The roster form only writes `present`/`absent`; `late` and `excused`
/// exist in the data and are surfaced read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttendanceStatus::Present => write!(f, "present"),
            AttendanceStatus::Absent => write!(f, "absent"),
            AttendanceStatus::Late => write!(f, "late"),
            AttendanceStatus::Excused => write!(f, "excused"),
        }
    }
}

/// Status posted for one child in a roster submission.
///
/// `unset` clears any existing record for the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RosterStatus {
    Present,
    Absent,
    Unset,
}

impl RosterStatus {
    /// The stored status this roster value maps to, `None` for `unset`.
    pub fn as_attendance(&self) -> Option<AttendanceStatus> {
        match self {
            RosterStatus::Present => Some(AttendanceStatus::Present),
            RosterStatus::Absent => Some(AttendanceStatus::Absent),
            RosterStatus::Unset => None,
        }
    }
}

/// A recorded attendance entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Attendance {
    pub id: Uuid,
    pub child_id: Uuid,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Full-roster submission for one day.
///
/// Children missing from `statuses` are treated as `unset`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SaveRosterRequest {
    /// Day being recorded; defaults to today in the configured zone.
    pub date: Option<NaiveDate>,
    pub statuses: HashMap<Uuid, RosterStatus>,
}

/// Outcome counts of a roster reconciliation, for operator feedback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RosterCounts {
    pub created: u32,
    pub updated: u32,
    pub deleted: u32,
}

/// Present/absent tallies over a period (late/excused excluded).
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AttendanceStats {
    pub present: i64,
    pub absent: i64,
}

impl AttendanceStats {
    pub fn total(&self) -> i64 {
        self.present + self.absent
    }

    /// Presence percentage, rounded; 0 when no rows.
    pub fn presence_rate(&self) -> i32 {
        let total = self.total();
        if total == 0 {
            0
        } else {
            ((self.present as f64) * 100.0 / (total as f64)).round() as i32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attendance_status_display() {
        assert_eq!(AttendanceStatus::Present.to_string(), "present");
        assert_eq!(AttendanceStatus::Absent.to_string(), "absent");
        assert_eq!(AttendanceStatus::Late.to_string(), "late");
        assert_eq!(AttendanceStatus::Excused.to_string(), "excused");
    }

    #[test]
    fn test_roster_status_as_attendance() {
        assert_eq!(
            RosterStatus::Present.as_attendance(),
            Some(AttendanceStatus::Present)
        );
        assert_eq!(
            RosterStatus::Absent.as_attendance(),
            Some(AttendanceStatus::Absent)
        );
        assert_eq!(RosterStatus::Unset.as_attendance(), None);
    }

    #[test]
    fn test_roster_status_rejects_unknown_value() {
        // The posted schema is fixed: anything else is a deserialization error.
        let parsed: Result<RosterStatus, _> = serde_json::from_str("\"late\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_presence_rate() {
        let stats = AttendanceStats {
            present: 3,
            absent: 1,
        };
        assert_eq!(stats.total(), 4);
        assert_eq!(stats.presence_rate(), 75);
    }

    #[test]
    fn test_presence_rate_empty() {
        assert_eq!(AttendanceStats::default().presence_rate(), 0);
    }

    #[test]
    fn test_presence_rate_rounds() {
        let stats = AttendanceStats {
            present: 2,
            absent: 1,
        };
        assert_eq!(stats.presence_rate(), 67);
    }

    #[test]
    fn test_roster_counts_default() {
        let counts = RosterCounts::default();
        assert_eq!(counts.created, 0);
        assert_eq!(counts.updated, 0);
        assert_eq!(counts.deleted, 0);
    }
}
