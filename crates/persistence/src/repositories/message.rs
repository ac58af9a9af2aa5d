//! Message repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{MessageEntity, MessageSenderDb};
use crate::metrics::QueryTimer;

const MESSAGE_COLUMNS: &str = "id, child_id, subject, body, sender, created_at, read_at";

/// A staff message ready to be written for one child.
#[derive(Debug, Clone)]
pub struct StaffMessage {
    pub child_id: Uuid,
    pub subject: String,
    pub body: String,
}

/// Repository for message database operations.
#[derive(Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    /// Creates a new MessageRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List a child's messages, newest first.
    pub async fn list_for_child(
        &self,
        child_id: Uuid,
        limit: i64,
    ) -> Result<Vec<MessageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_messages_for_child");
        let result = sqlx::query_as::<_, MessageEntity>(&format!(
            r#"
            SELECT {MESSAGE_COLUMNS}
            FROM messages
            WHERE child_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#
        ))
        .bind(child_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a single message.
    pub async fn create(
        &self,
        child_id: Uuid,
        subject: &str,
        body: &str,
        sender: MessageSenderDb,
    ) -> Result<MessageEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_message");
        let result = sqlx::query_as::<_, MessageEntity>(&format!(
            r#"
            INSERT INTO messages (child_id, subject, body, sender)
            VALUES ($1, $2, $3, $4)
            RETURNING {MESSAGE_COLUMNS}
            "#
        ))
        .bind(child_id)
        .bind(subject)
        .bind(body)
        .bind(sender)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Write a batch of staff messages in one transaction.
    pub async fn create_staff_batch(&self, messages: &[StaffMessage]) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("create_staff_messages");
        let mut tx = self.pool.begin().await?;

        for message in messages {
            sqlx::query(
                r#"
                INSERT INTO messages (child_id, subject, body, sender)
                VALUES ($1, $2, $3, 'staff')
                "#,
            )
            .bind(message.child_id)
            .bind(&message.subject)
            .bind(&message.body)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        timer.record();
        Ok(())
    }
}
