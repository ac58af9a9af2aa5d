//! Message entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::message::{Message, MessageSender};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for message_sender that maps to the PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "message_sender", rename_all = "lowercase")]
pub enum MessageSenderDb {
    Staff,
    Parent,
}

impl From<MessageSenderDb> for MessageSender {
    fn from(db_sender: MessageSenderDb) -> Self {
        match db_sender {
            MessageSenderDb::Staff => MessageSender::Staff,
            MessageSenderDb::Parent => MessageSender::Parent,
        }
    }
}

impl From<MessageSender> for MessageSenderDb {
    fn from(sender: MessageSender) -> Self {
        match sender {
            MessageSender::Staff => MessageSenderDb::Staff,
            MessageSender::Parent => MessageSenderDb::Parent,
        }
    }
}

/// Database row mapping for the messages table.
#[derive(Debug, Clone, FromRow)]
pub struct MessageEntity {
    pub id: Uuid,
    pub child_id: Uuid,
    pub subject: String,
    pub body: String,
    pub sender: MessageSenderDb,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl From<MessageEntity> for Message {
    fn from(entity: MessageEntity) -> Self {
        Self {
            id: entity.id,
            child_id: entity.child_id,
            subject: entity.subject,
            body: entity.body,
            sender: entity.sender.into(),
            created_at: entity.created_at,
            read_at: entity.read_at,
        }
    }
}
