//! Parent profile repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ParentProfileEntity;
use crate::metrics::QueryTimer;

/// Repository for parent-profile database operations.
#[derive(Clone)]
pub struct ParentProfileRepository {
    pool: PgPool,
}

impl ParentProfileRepository {
    /// Creates a new ParentProfileRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a parent profile by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ParentProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_parent_profile_by_id");
        let result = sqlx::query_as::<_, ParentProfileEntity>(
            r#"
            SELECT id, first_name, last_name, phone, relation_to_child,
                   address, postal_code, city, is_approved, photo_consent, created_at
            FROM parent_profiles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // Note: ParentProfileRepository tests require a database connection and are
    // covered by integration tests.
}
