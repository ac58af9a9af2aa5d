//! Child repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{ChildEntity, LevelCountEntity};
use crate::metrics::QueryTimer;

const CHILD_COLUMNS: &str = "id, parent_id, first_name, last_name, date_of_birth, level, school, \
                             notes, is_approved, may_leave_unaccompanied, created_at";

/// Repository for child-related database operations.
#[derive(Clone)]
pub struct ChildRepository {
    pool: PgPool,
}

impl ChildRepository {
    /// Creates a new ChildRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a child by ID, restricted to the given parent.
    pub async fn find_owned(
        &self,
        id: Uuid,
        parent_id: Uuid,
    ) -> Result<Option<ChildEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_child_owned");
        let result = sqlx::query_as::<_, ChildEntity>(&format!(
            "SELECT {CHILD_COLUMNS} FROM children WHERE id = $1 AND parent_id = $2"
        ))
        .bind(id)
        .bind(parent_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List the children attached to a parent, ordered by first name.
    pub async fn find_for_parent(&self, parent_id: Uuid) -> Result<Vec<ChildEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_children_for_parent");
        let result = sqlx::query_as::<_, ChildEntity>(&format!(
            "SELECT {CHILD_COLUMNS} FROM children WHERE parent_id = $1 ORDER BY first_name ASC"
        ))
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List validated children (approved child of an approved parent),
    /// optionally filtered by level set and/or explicit id set.
    ///
    /// Empty filter arrays mean "no filter"; both filters AND together when
    /// given. Ordered by last name then first name.
    pub async fn find_validated(
        &self,
        levels: &[String],
        child_ids: &[Uuid],
    ) -> Result<Vec<ChildEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_validated_children");
        let result = sqlx::query_as::<_, ChildEntity>(
            r#"
            SELECT c.id, c.parent_id, c.first_name, c.last_name, c.date_of_birth, c.level,
                   c.school, c.notes, c.is_approved, c.may_leave_unaccompanied, c.created_at
            FROM children c
            JOIN parent_profiles p ON c.parent_id = p.id
            WHERE p.is_approved = TRUE
              AND c.is_approved = TRUE
              AND (cardinality($1::text[]) = 0 OR c.level = ANY($1))
              AND (cardinality($2::uuid[]) = 0 OR c.id = ANY($2))
            ORDER BY c.last_name ASC, c.first_name ASC
            "#,
        )
        .bind(levels)
        .bind(child_ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Per-level child counts, for the invitation screen.
    pub async fn count_by_level(&self) -> Result<Vec<LevelCountEntity>, sqlx::Error> {
        let timer = QueryTimer::new("count_children_by_level");
        let result = sqlx::query_as::<_, LevelCountEntity>(
            r#"
            SELECT level, COUNT(id) AS count
            FROM children
            GROUP BY level
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // Note: ChildRepository tests require a database connection and are
    // covered by integration tests.
}
