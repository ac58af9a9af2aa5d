//! Outing registration entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::outing::Outing;
use domain::models::registration::{OutingRegistration, RegistrationStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for registration_status that maps to the PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "registration_status", rename_all = "lowercase")]
pub enum RegistrationStatusDb {
    Invited,
    Confirmed,
    Declined,
    Attended,
    Absent,
}

impl From<RegistrationStatusDb> for RegistrationStatus {
    fn from(db_status: RegistrationStatusDb) -> Self {
        match db_status {
            RegistrationStatusDb::Invited => RegistrationStatus::Invited,
            RegistrationStatusDb::Confirmed => RegistrationStatus::Confirmed,
            RegistrationStatusDb::Declined => RegistrationStatus::Declined,
            RegistrationStatusDb::Attended => RegistrationStatus::Attended,
            RegistrationStatusDb::Absent => RegistrationStatus::Absent,
        }
    }
}

impl From<RegistrationStatus> for RegistrationStatusDb {
    fn from(status: RegistrationStatus) -> Self {
        match status {
            RegistrationStatus::Invited => RegistrationStatusDb::Invited,
            RegistrationStatus::Confirmed => RegistrationStatusDb::Confirmed,
            RegistrationStatus::Declined => RegistrationStatusDb::Declined,
            RegistrationStatus::Attended => RegistrationStatusDb::Attended,
            RegistrationStatus::Absent => RegistrationStatusDb::Absent,
        }
    }
}

/// Database row mapping for the outing_registrations table.
#[derive(Debug, Clone, FromRow)]
pub struct OutingRegistrationEntity {
    pub id: Uuid,
    pub child_id: Uuid,
    pub outing_id: Uuid,
    pub status: RegistrationStatusDb,
    pub notes: Option<String>,
    pub signed_at: Option<DateTime<Utc>>,
    pub signature_name: Option<String>,
    pub signature_phone: Option<String>,
    pub health_notes: Option<String>,
    pub signature_image: Option<String>,
    pub signature_ip: Option<String>,
    pub signature_user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<OutingRegistrationEntity> for OutingRegistration {
    fn from(entity: OutingRegistrationEntity) -> Self {
        Self {
            id: entity.id,
            child_id: entity.child_id,
            outing_id: entity.outing_id,
            status: entity.status.into(),
            notes: entity.notes,
            signed_at: entity.signed_at,
            signature_name: entity.signature_name,
            signature_phone: entity.signature_phone,
            health_notes: entity.health_notes,
            signature_image: entity.signature_image,
            signature_ip: entity.signature_ip,
            signature_user_agent: entity.signature_user_agent,
            created_at: entity.created_at,
        }
    }
}

/// Registration row joined with its outing, for parent-facing listings.
#[derive(Debug, Clone, FromRow)]
pub struct RegistrationWithOutingEntity {
    pub id: Uuid,
    pub child_id: Uuid,
    pub status: RegistrationStatusDb,
    pub notes: Option<String>,
    pub signed_at: Option<DateTime<Utc>>,
    pub signature_name: Option<String>,
    pub signature_phone: Option<String>,
    pub health_notes: Option<String>,
    pub signature_image: Option<String>,
    // Outing columns
    pub outing_id: Uuid,
    pub outing_title: String,
    pub outing_starts_at: DateTime<Utc>,
    pub outing_location: Option<String>,
    pub outing_description: Option<String>,
    pub outing_image_url: Option<String>,
    pub outing_capacity: Option<i32>,
    pub outing_created_at: DateTime<Utc>,
}

impl RegistrationWithOutingEntity {
    /// Extracts the joined outing columns as a domain outing.
    pub fn outing(&self) -> Outing {
        Outing {
            id: self.outing_id,
            title: self.outing_title.clone(),
            starts_at: self.outing_starts_at,
            location: self.outing_location.clone(),
            description: self.outing_description.clone(),
            image_url: self.outing_image_url.clone(),
            capacity: self.outing_capacity,
            created_at: self.outing_created_at,
        }
    }
}

/// Registration row joined with child names, for invitation reminders.
#[derive(Debug, Clone, FromRow)]
pub struct RegistrationWithChildEntity {
    pub id: Uuid,
    pub child_id: Uuid,
    pub status: RegistrationStatusDb,
    // Child columns
    pub child_first_name: String,
    pub child_last_name: String,
}

impl RegistrationWithChildEntity {
    /// Child's display name ("First Last").
    pub fn child_full_name(&self) -> String {
        format!("{} {}", self.child_first_name, self.child_last_name)
    }
}

/// Per-outing signed-registration count row.
#[derive(Debug, Clone, FromRow)]
pub struct SignedCountEntity {
    pub outing_id: Uuid,
    pub signed_count: i64,
}
