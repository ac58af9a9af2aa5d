//! Parent profile domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A legal guardian's profile.
///
/// Profiles are created by the registration wizard (out of scope here) and
/// approved by the back office. Only approved profiles can act on the portal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ParentProfile {
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

impl ParentProfile {
    /// Guardian's display name ("First Last").
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        let profile = ParentProfile {
            id: Uuid::new_v4(),
            first_name: "Awa".to_string(),
            last_name: "Diallo".to_string(),
            phone: "0612345678".to_string(),
            relation_to_child: "Mère".to_string(),
            address: None,
            postal_code: None,
            city: None,
            is_approved: true,
            photo_consent: false,
            created_at: Utc::now(),
        };
        assert_eq!(profile.full_name(), "Awa Diallo");
    }
}
