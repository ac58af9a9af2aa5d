//! Outing registration domain models.
//!
//! A registration is the per-child record of invitation/response status for
//! one outing; (child, outing) pairs are unique.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::outing::Outing;

/// Lifecycle of a registration.
///
/// `invited -> confirmed` through parent signing, `invited -> declined`
/// through the parent, `confirmed|invited -> attended|absent` through
/// post-event admin review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Invited,
    Confirmed,
    Declined,
    Attended,
    Absent,
}

impl std::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistrationStatus::Invited => write!(f, "invited"),
            RegistrationStatus::Confirmed => write!(f, "confirmed"),
            RegistrationStatus::Declined => write!(f, "declined"),
            RegistrationStatus::Attended => write!(f, "attended"),
            RegistrationStatus::Absent => write!(f, "absent"),
        }
    }
}

impl RegistrationStatus {
    /// Whether the registration counts as signed for parent-facing KPIs.
    pub fn counts_as_signed(&self) -> bool {
        matches!(
            self,
            RegistrationStatus::Confirmed | RegistrationStatus::Attended
        )
    }
}

/// A child's registration for an outing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OutingRegistration {
    pub id: Uuid,
    pub child_id: Uuid,
    pub outing_id: Uuid,
    pub status: RegistrationStatus,
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

impl OutingRegistration {
    /// Whether a guardian signature has been recorded.
    pub fn is_signed(&self) -> bool {
        self.signed_at.is_some()
    }
}

/// Consent form submitted by a parent to sign a registration.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct SignRequest {
    /// Guardian's full name, as written on the consent form.
    #[validate(length(max = 160, message = "Name must be at most 160 characters"))]
    pub name: String,

    #[validate(length(max = 40, message = "Phone must be at most 40 characters"))]
    pub phone: String,

    /// Free-text health information (allergies, treatments).
    pub health_notes: Option<String>,

    /// Must be checked: "I authorise participation and certify being the
    /// legal guardian".
    pub consent: bool,

    /// Optional drawn signature as a `data:image/...` URL.
    pub signature_image: Option<String>,
}

/// Request-level metadata recorded alongside a signature.
#[derive(Debug, Clone, Default)]
pub struct SignatureMetadata {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// Signature fields ready to be written, after validation and trimming.
#[derive(Debug, Clone)]
pub struct SignatureDetails {
    pub name: String,
    pub phone: String,
    pub health_notes: Option<String>,
    pub signature_image: Option<String>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// Registration entry in parent-facing listings, joined with its outing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RegistrationWithOuting {
    pub id: Uuid,
    pub child_id: Uuid,
    pub status: RegistrationStatus,
    pub signed_at: Option<DateTime<Utc>>,
    pub outing: Outing,
}

/// Detail view of a registration, exposing the signature block so the
/// attestation renderer can consume it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RegistrationDetail {
    pub id: Uuid,
    pub child_id: Uuid,
    pub status: RegistrationStatus,
    pub notes: Option<String>,
    pub signed_at: Option<DateTime<Utc>>,
    pub signature_name: Option<String>,
    pub signature_phone: Option<String>,
    pub health_notes: Option<String>,
    pub signature_image: Option<String>,
    pub outing: Outing,
}
