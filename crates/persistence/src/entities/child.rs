//! Child entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::child::Child;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the children table.
#[derive(Debug, Clone, FromRow)]
pub struct ChildEntity {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub level: String,
    pub school: Option<String>,
    pub notes: Option<String>,
    pub is_approved: bool,
    pub may_leave_unaccompanied: bool,
    pub created_at: DateTime<Utc>,
}

impl ChildEntity {
    /// Child's display name ("First Last").
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl From<ChildEntity> for Child {
    fn from(entity: ChildEntity) -> Self {
        Self {
            id: entity.id,
            parent_id: entity.parent_id,
            first_name: entity.first_name,
            last_name: entity.last_name,
            date_of_birth: entity.date_of_birth,
            level: entity.level,
            school: entity.school,
            notes: entity.notes,
            is_approved: entity.is_approved,
            may_leave_unaccompanied: entity.may_leave_unaccompanied,
            created_at: entity.created_at,
        }
    }
}

/// Per-level child count row for the invitation screen.
#[derive(Debug, Clone, FromRow)]
pub struct LevelCountEntity {
    pub level: String,
    pub count: i64,
}
