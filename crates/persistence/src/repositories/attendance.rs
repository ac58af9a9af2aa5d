//! Attendance repository for database operations.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::attendance::RosterCounts;

use crate::entities::{AttendanceEntity, AttendanceStatsEntity, AttendanceStatusDb};
use crate::metrics::QueryTimer;

const ATTENDANCE_COLUMNS: &str = "id, child_id, date, status, notes, created_at";

/// Repository for attendance database operations.
#[derive(Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    /// Creates a new AttendanceRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List a child's attendance rows between two dates inclusive.
    pub async fn find_for_child_between(
        &self,
        child_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AttendanceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_attendance_for_child");
        let result = sqlx::query_as::<_, AttendanceEntity>(&format!(
            r#"
            SELECT {ATTENDANCE_COLUMNS}
            FROM attendances
            WHERE child_id = $1 AND date >= $2 AND date <= $3
            ORDER BY date ASC
            "#
        ))
        .bind(child_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Present/absent tallies for a child over a period (late/excused are
    /// excluded from both counts).
    pub async fn stats_for_child(
        &self,
        child_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<AttendanceStatsEntity, sqlx::Error> {
        let timer = QueryTimer::new("attendance_stats_for_child");
        let result = sqlx::query_as::<_, AttendanceStatsEntity>(
            r#"
            SELECT
                COUNT(id) FILTER (WHERE status = 'present') AS present_count,
                COUNT(id) FILTER (WHERE status = 'absent') AS absent_count
            FROM attendances
            WHERE child_id = $1 AND date >= $2 AND date <= $3
            "#,
        )
        .bind(child_id)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List all attendance rows recorded for one day.
    pub async fn find_for_day(&self, date: NaiveDate) -> Result<Vec<AttendanceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_attendance_for_day");
        let result = sqlx::query_as::<_, AttendanceEntity>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendances WHERE date = $1"
        ))
        .bind(date)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Reconciles one day's roster submission in a single transaction.
    ///
    /// Per child: `None` deletes any existing row, `Some(status)` updates the
    /// existing row or inserts a new one. Returns created/updated/deleted
    /// counts; either the whole roster commits or none of it does.
    pub async fn reconcile_day(
        &self,
        date: NaiveDate,
        entries: &[(Uuid, Option<AttendanceStatusDb>)],
    ) -> Result<RosterCounts, sqlx::Error> {
        let timer = QueryTimer::new("reconcile_attendance_day");
        let mut counts = RosterCounts::default();
        let mut tx = self.pool.begin().await?;

        for (child_id, status) in entries {
            match status {
                None => {
                    let deleted =
                        sqlx::query("DELETE FROM attendances WHERE child_id = $1 AND date = $2")
                            .bind(child_id)
                            .bind(date)
                            .execute(&mut *tx)
                            .await?
                            .rows_affected();
                    counts.deleted += deleted as u32;
                }
                Some(status) => {
                    let updated = sqlx::query(
                        "UPDATE attendances SET status = $3 WHERE child_id = $1 AND date = $2",
                    )
                    .bind(child_id)
                    .bind(date)
                    .bind(status)
                    .execute(&mut *tx)
                    .await?
                    .rows_affected();

                    if updated > 0 {
                        counts.updated += 1;
                    } else {
                        sqlx::query(
                            "INSERT INTO attendances (child_id, date, status) VALUES ($1, $2, $3)",
                        )
                        .bind(child_id)
                        .bind(date)
                        .bind(status)
                        .execute(&mut *tx)
                        .await?;
                        counts.created += 1;
                    }
                }
            }
        }

        tx.commit().await?;
        timer.record();
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    // Note: AttendanceRepository tests require a database connection; the
    // roster round-trip is covered by crates/api/tests/attendance_integration.rs.
}
