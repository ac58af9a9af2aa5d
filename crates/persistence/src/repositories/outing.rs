//! Outing repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::OutingEntity;
use crate::metrics::QueryTimer;

/// Repository for outing-related database operations.
#[derive(Clone)]
pub struct OutingRepository {
    pool: PgPool,
}

impl OutingRepository {
    /// Creates a new OutingRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new outing.
    pub async fn create(
        &self,
        title: &str,
        starts_at: DateTime<Utc>,
        location: Option<&str>,
        description: Option<&str>,
        image_url: Option<&str>,
        capacity: Option<i32>,
    ) -> Result<OutingEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_outing");
        let result = sqlx::query_as::<_, OutingEntity>(
            r#"
            INSERT INTO outings (title, starts_at, location, description, image_url, capacity)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, starts_at, location, description, image_url, capacity, created_at
            "#,
        )
        .bind(title)
        .bind(starts_at)
        .bind(location)
        .bind(description)
        .bind(image_url)
        .bind(capacity)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an outing by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<OutingEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_outing_by_id");
        let result = sqlx::query_as::<_, OutingEntity>(
            r#"
            SELECT id, title, starts_at, location, description, image_url, capacity, created_at
            FROM outings
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List all outings, most recent start first.
    pub async fn list_all(&self) -> Result<Vec<OutingEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_outings");
        let result = sqlx::query_as::<_, OutingEntity>(
            r#"
            SELECT id, title, starts_at, location, description, image_url, capacity, created_at
            FROM outings
            ORDER BY starts_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update an outing's capacity.
    ///
    /// Lowering capacity below the current signed count does not evict
    /// existing signatures; they are grandfathered.
    pub async fn update_capacity(
        &self,
        id: Uuid,
        capacity: Option<i32>,
    ) -> Result<Option<OutingEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_outing_capacity");
        let result = sqlx::query_as::<_, OutingEntity>(
            r#"
            UPDATE outings
            SET capacity = $2
            WHERE id = $1
            RETURNING id, title, starts_at, location, description, image_url, capacity, created_at
            "#,
        )
        .bind(id)
        .bind(capacity)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // Note: OutingRepository tests require a database connection and are
    // covered by integration tests.
}
