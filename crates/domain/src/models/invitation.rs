//! Bulk invitation request/response models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_true() -> bool {
    true
}

/// Admin request to invite children to an outing.
///
/// Targets are validated children filtered by `levels` and/or `child_ids`;
/// both filters AND together when both are given, and empty means "no
/// filter".
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct InviteRequest {
    #[serde(default)]
    pub levels: Vec<String>,

    #[serde(default)]
    pub child_ids: Vec<Uuid>,

    /// When true (the default), children already registered for the outing
    /// are skipped entirely; when false they keep their registration as-is
    /// but are still notified.
    #[serde(default = "default_true")]
    pub only_eligible: bool,

    #[serde(default)]
    pub send_message: bool,

    /// Optional message template; placeholders `{ENFANT}` `{SORTIE}`
    /// `{DATE}` `{LIEU}` are substituted per child.
    pub message_template: Option<String>,
}

/// Outcome counts of an invitation batch, for operator feedback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InviteReport {
    pub targets: u32,
    pub created: u32,
    pub skipped: u32,
    pub messages: u32,
}

/// Admin request to remind non-respondents of an outing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RemindRequest {
    #[serde(default = "default_true")]
    pub send_message: bool,

    pub message_template: Option<String>,
}

/// Outcome counts of a reminder run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RemindReport {
    /// Registrations currently in `invited` status.
    pub invited: u32,
    pub messages: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_request_defaults() {
        let request: InviteRequest = serde_json::from_str("{}").unwrap();
        assert!(request.levels.is_empty());
        assert!(request.child_ids.is_empty());
        assert!(request.only_eligible);
        assert!(!request.send_message);
        assert!(request.message_template.is_none());
    }

    #[test]
    fn test_invite_request_full() {
        let request: InviteRequest = serde_json::from_str(
            r#"{
                "levels": ["6e", "5e"],
                "only_eligible": false,
                "send_message": true,
                "message_template": "{ENFANT}"
            }"#,
        )
        .unwrap();
        assert_eq!(request.levels, vec!["6e", "5e"]);
        assert!(!request.only_eligible);
        assert!(request.send_message);
    }

    #[test]
    fn test_remind_request_defaults() {
        let request: RemindRequest = serde_json::from_str("{}").unwrap();
        assert!(request.send_message);
        assert!(request.message_template.is_none());
    }
}
