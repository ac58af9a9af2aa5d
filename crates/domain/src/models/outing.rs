//! Outing domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A supervised activity children can be registered for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Outing {
    pub id: Uuid,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// Maximum number of signed registrations; `None` means unlimited.
    pub capacity: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl Outing {
    /// Whether the outing enforces a signed-registration limit.
    pub fn has_finite_capacity(&self) -> bool {
        self.capacity.is_some()
    }
}

/// Request to create an outing.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateOutingRequest {
    #[validate(length(min = 1, max = 160, message = "Title must be 1-160 characters"))]
    pub title: String,

    pub starts_at: DateTime<Utc>,

    #[validate(length(max = 160, message = "Location must be at most 160 characters"))]
    pub location: Option<String>,

    pub description: Option<String>,

    #[validate(length(max = 1024, message = "Image URL must be at most 1024 characters"))]
    pub image_url: Option<String>,

    /// Maximum signed registrations; omit for unlimited.
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: Option<i32>,
}

/// Request to update an outing's capacity.
///
/// Lowering capacity below the current signed count never evicts existing
/// signatures; further signing simply fails until attrition.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateCapacityRequest {
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: Option<i32>,
}

/// Outing entry in listings, with the global signed count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct OutingSummary {
    pub id: Uuid,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub capacity: Option<i32>,
    /// Registrations with a recorded signature, across all children.
    pub signed_count: i64,
}

impl OutingSummary {
    /// Remaining signable slots, `None` when unlimited.
    pub fn remaining_slots(&self) -> Option<i64> {
        self.capacity
            .map(|c| (c as i64 - self.signed_count).max(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_finite_capacity() {
        let mut outing = Outing {
            id: Uuid::new_v4(),
            title: "Sortie au Louvre".to_string(),
            starts_at: Utc::now(),
            location: Some("Paris".to_string()),
            description: None,
            image_url: None,
            capacity: Some(20),
            created_at: Utc::now(),
        };
        assert!(outing.has_finite_capacity());
        outing.capacity = None;
        assert!(!outing.has_finite_capacity());
    }

    #[test]
    fn test_create_outing_request_validation() {
        let valid = CreateOutingRequest {
            title: "Sortie au Louvre".to_string(),
            starts_at: Utc::now(),
            location: Some("Paris".to_string()),
            description: None,
            image_url: None,
            capacity: Some(20),
        };
        assert!(valid.validate().is_ok());

        let empty_title = CreateOutingRequest {
            title: String::new(),
            ..valid.clone()
        };
        assert!(empty_title.validate().is_err());

        let zero_capacity = CreateOutingRequest {
            capacity: Some(0),
            ..valid.clone()
        };
        assert!(zero_capacity.validate().is_err());

        let overlong_url = CreateOutingRequest {
            image_url: Some(format!("https://example.com/{}", "x".repeat(1024))),
            ..valid
        };
        assert!(overlong_url.validate().is_err());
    }

    #[test]
    fn test_remaining_slots() {
        let summary = OutingSummary {
            id: Uuid::new_v4(),
            title: "Piscine".to_string(),
            starts_at: Utc::now(),
            location: None,
            image_url: None,
            capacity: Some(10),
            signed_count: 7,
        };
        assert_eq!(summary.remaining_slots(), Some(3));
    }

    #[test]
    fn test_remaining_slots_never_negative() {
        // Capacity lowered after signing: grandfathered signatures may exceed it.
        let summary = OutingSummary {
            id: Uuid::new_v4(),
            title: "Piscine".to_string(),
            starts_at: Utc::now(),
            location: None,
            image_url: None,
            capacity: Some(5),
            signed_count: 7,
        };
        assert_eq!(summary.remaining_slots(), Some(0));
    }

    #[test]
    fn test_remaining_slots_unlimited() {
        let summary = OutingSummary {
            id: Uuid::new_v4(),
            title: "Piscine".to_string(),
            starts_at: Utc::now(),
            location: None,
            image_url: None,
            capacity: None,
            signed_count: 100,
        };
        assert_eq!(summary.remaining_slots(), None);
    }
}
