//! Parent profile entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::parent::ParentProfile;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the parent_profiles table.
#[derive(Debug, Clone, FromRow)]
pub struct ParentProfileEntity {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub relation_to_child: String,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub is_approved: bool,
    pub photo_consent: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ParentProfileEntity> for ParentProfile {
    fn from(entity: ParentProfileEntity) -> Self {
        Self {
            id: entity.id,
            first_name: entity.first_name,
            last_name: entity.last_name,
            phone: entity.phone,
            relation_to_child: entity.relation_to_child,
            address: entity.address,
            postal_code: entity.postal_code,
            city: entity.city,
            is_approved: entity.is_approved,
            photo_consent: entity.photo_consent,
            created_at: entity.created_at,
        }
    }
}
