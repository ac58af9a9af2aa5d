//! Child domain model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A child attached to a parent profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Child {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    /// School level (CP, CE1, ..., Terminale).
    pub level: String,
    pub school: Option<String>,
    pub notes: Option<String>,
    /// Set by the back office once the registration file is complete.
    pub is_approved: bool,
    /// Whether the child may leave activities unaccompanied.
    pub may_leave_unaccompanied: bool,
    pub created_at: DateTime<Utc>,
}

impl Child {
    /// Child's display name ("First Last").
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Child entry in account listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ChildSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub level: String,
    pub school: Option<String>,
    pub may_leave_unaccompanied: bool,
}

impl From<Child> for ChildSummary {
    fn from(child: Child) -> Self {
        Self {
            id: child.id,
            first_name: child.first_name,
            last_name: child.last_name,
            level: child.level,
            school: child.school,
            may_leave_unaccompanied: child.may_leave_unaccompanied,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_child() -> Child {
        Child {
            id: Uuid::new_v4(),
            parent_id: Uuid::new_v4(),
            first_name: "Lina".to_string(),
            last_name: "Traoré".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2016, 4, 2),
            level: "CE2".to_string(),
            school: Some("École Jean Jaurès".to_string()),
            notes: None,
            is_approved: true,
            may_leave_unaccompanied: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_full_name() {
        assert_eq!(sample_child().full_name(), "Lina Traoré");
    }

    #[test]
    fn test_summary_from_child() {
        let child = sample_child();
        let id = child.id;
        let summary: ChildSummary = child.into();
        assert_eq!(summary.id, id);
        assert_eq!(summary.level, "CE2");
        assert!(!summary.may_leave_unaccompanied);
    }
}
