//! Outing entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::outing::Outing;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the outings table.
#[derive(Debug, Clone, FromRow)]
pub struct OutingEntity {
    pub id: Uuid,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub capacity: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<OutingEntity> for Outing {
    fn from(entity: OutingEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            starts_at: entity.starts_at,
            location: entity.location,
            description: entity.description,
            image_url: entity.image_url,
            capacity: entity.capacity,
            created_at: entity.created_at,
        }
    }
}
