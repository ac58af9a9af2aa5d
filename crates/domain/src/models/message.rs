//! Message domain models.
//!
//! Messages are per-child threads between the staff and the parent; this
//! subsystem only writes rows, delivery/display is external.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageSender {
    Staff,
    Parent,
}

impl std::fmt::Display for MessageSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageSender::Staff => write!(f, "staff"),
            MessageSender::Parent => write!(f, "parent"),
        }
    }
}

/// A message attached to a child's thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Message {
    pub id: Uuid,
    pub child_id: Uuid,
    pub subject: String,
    pub body: String,
    pub sender: MessageSender,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

/// Free-text message sent by a parent from the account page.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct SendMessageRequest {
    pub child_id: Uuid,

    #[validate(length(min = 1, max = 4000, message = "Message body must be 1-4000 characters"))]
    pub body: String,
}

/// Subject used for parent-originated messages.
pub const PARENT_MESSAGE_SUBJECT: &str = "Message parent";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_display() {
        assert_eq!(MessageSender::Staff.to_string(), "staff");
        assert_eq!(MessageSender::Parent.to_string(), "parent");
    }

    #[test]
    fn test_send_message_request_validation() {
        let valid = SendMessageRequest {
            child_id: Uuid::new_v4(),
            body: "Bonjour".to_string(),
        };
        assert!(valid.validate().is_ok());

        let empty = SendMessageRequest {
            child_id: Uuid::new_v4(),
            body: String::new(),
        };
        assert!(empty.validate().is_err());
    }
}
