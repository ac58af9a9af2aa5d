//! Outing registration repository for database operations.
//!
//! Holds the capacity-guarded signing transaction: the count-then-write
//! sequence runs under a row-level lock on the outing so concurrent signers
//! cannot overshoot the limit.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::registration::SignatureDetails;

use crate::entities::{
    OutingRegistrationEntity, RegistrationStatusDb, RegistrationWithChildEntity,
    RegistrationWithOutingEntity, SignedCountEntity,
};
use crate::metrics::QueryTimer;
use crate::repositories::message::StaffMessage;

const REGISTRATION_COLUMNS: &str =
    "id, child_id, outing_id, status, notes, signed_at, signature_name, signature_phone, \
     health_notes, signature_image, signature_ip, signature_user_agent, created_at";

/// Outcome of a signing attempt.
#[derive(Debug, Clone)]
pub enum SignOutcome {
    /// Signature recorded; registration is confirmed.
    Signed(OutingRegistrationEntity),
    /// The outing already has `signed` registrations against a limit of
    /// `capacity`; nothing was written.
    CapacityFull { capacity: i32, signed: i64 },
    /// Registration missing, or not owned by the calling parent.
    NotFound,
}

/// Repository for outing-registration database operations.
#[derive(Clone)]
pub struct OutingRegistrationRepository {
    pool: PgPool,
}

impl OutingRegistrationRepository {
    /// Creates a new OutingRegistrationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Records a guardian signature, enforcing outing capacity.
    ///
    /// The whole sequence is one transaction. For finite-capacity outings a
    /// `SELECT ... FOR UPDATE` on the outing row serializes concurrent
    /// signers: the signed-count read and the signature write both happen
    /// under the lock, which is released at commit/rollback. Unlimited
    /// outings skip the lock entirely, and a re-sign of an already-signed
    /// registration only overwrites its signature fields (its slot is
    /// already counted).
    pub async fn sign_with_capacity_check(
        &self,
        registration_id: Uuid,
        parent_id: Uuid,
        details: &SignatureDetails,
    ) -> Result<SignOutcome, sqlx::Error> {
        let timer = QueryTimer::new("sign_registration");
        let result = self
            .sign_in_transaction(registration_id, parent_id, details)
            .await;
        timer.record();
        result
    }

    async fn sign_in_transaction(
        &self,
        registration_id: Uuid,
        parent_id: Uuid,
        details: &SignatureDetails,
    ) -> Result<SignOutcome, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        // Ownership is part of the lookup: a registration of someone else's
        // child is indistinguishable from a missing one.
        let registration = sqlx::query_as::<_, OutingRegistrationEntity>(
            r#"
            SELECT r.id, r.child_id, r.outing_id, r.status, r.notes, r.signed_at,
                   r.signature_name, r.signature_phone, r.health_notes,
                   r.signature_image, r.signature_ip, r.signature_user_agent, r.created_at
            FROM outing_registrations r
            JOIN children c ON r.child_id = c.id
            WHERE r.id = $1 AND c.parent_id = $2
            "#,
        )
        .bind(registration_id)
        .bind(parent_id)
        .fetch_optional(&mut *tx)
        .await?;

        let registration = match registration {
            Some(r) => r,
            None => {
                tx.rollback().await?;
                return Ok(SignOutcome::NotFound);
            }
        };

        let unlocked_capacity: Option<i32> =
            sqlx::query_scalar("SELECT capacity FROM outings WHERE id = $1")
                .bind(registration.outing_id)
                .fetch_one(&mut *tx)
                .await?;

        // The capacity check only applies to first-time signs of limited
        // outings; a re-sign never grows the signed set.
        if unlocked_capacity.is_some() && registration.signed_at.is_none() {
            // Lock the outing row until commit; re-read capacity under the
            // lock in case an admin edit raced the probe above.
            let capacity: Option<i32> =
                sqlx::query_scalar("SELECT capacity FROM outings WHERE id = $1 FOR UPDATE")
                    .bind(registration.outing_id)
                    .fetch_one(&mut *tx)
                    .await?;

            if let Some(capacity) = capacity {
                // Self-exclusion keeps a double-submitted re-sign from
                // counting its own freshly-written signature.
                let signed: i64 = sqlx::query_scalar(
                    r#"
                    SELECT COUNT(*)
                    FROM outing_registrations
                    WHERE outing_id = $1 AND signed_at IS NOT NULL AND id <> $2
                    "#,
                )
                .bind(registration.outing_id)
                .bind(registration.id)
                .fetch_one(&mut *tx)
                .await?;

                if signed >= capacity as i64 {
                    tx.rollback().await?;
                    return Ok(SignOutcome::CapacityFull { capacity, signed });
                }
            }
        }

        let updated = sqlx::query_as::<_, OutingRegistrationEntity>(&format!(
            r#"
            UPDATE outing_registrations
            SET status = 'confirmed',
                signed_at = NOW(),
                signature_name = $2,
                signature_phone = $3,
                health_notes = $4,
                signature_image = $5,
                signature_ip = $6,
                signature_user_agent = $7
            WHERE id = $1
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(registration.id)
        .bind(&details.name)
        .bind(&details.phone)
        .bind(&details.health_notes)
        .bind(&details.signature_image)
        .bind(&details.ip)
        .bind(&details.user_agent)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(SignOutcome::Signed(updated))
    }

    /// Find a registration with its outing, restricted to the given parent.
    pub async fn find_owned_with_outing(
        &self,
        registration_id: Uuid,
        parent_id: Uuid,
    ) -> Result<Option<RegistrationWithOutingEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_registration_owned");
        let result = sqlx::query_as::<_, RegistrationWithOutingEntity>(
            r#"
            SELECT r.id, r.child_id, r.status, r.notes, r.signed_at,
                   r.signature_name, r.signature_phone, r.health_notes, r.signature_image,
                   o.id AS outing_id, o.title AS outing_title, o.starts_at AS outing_starts_at,
                   o.location AS outing_location, o.description AS outing_description,
                   o.image_url AS outing_image_url, o.capacity AS outing_capacity,
                   o.created_at AS outing_created_at
            FROM outing_registrations r
            JOIN children c ON r.child_id = c.id
            JOIN outings o ON r.outing_id = o.id
            WHERE r.id = $1 AND c.parent_id = $2
            "#,
        )
        .bind(registration_id)
        .bind(parent_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List a child's registrations with their outings, earliest start first.
    pub async fn find_for_child(
        &self,
        child_id: Uuid,
    ) -> Result<Vec<RegistrationWithOutingEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_registrations_for_child");
        let result = sqlx::query_as::<_, RegistrationWithOutingEntity>(
            r#"
            SELECT r.id, r.child_id, r.status, r.notes, r.signed_at,
                   r.signature_name, r.signature_phone, r.health_notes, r.signature_image,
                   o.id AS outing_id, o.title AS outing_title, o.starts_at AS outing_starts_at,
                   o.location AS outing_location, o.description AS outing_description,
                   o.image_url AS outing_image_url, o.capacity AS outing_capacity,
                   o.created_at AS outing_created_at
            FROM outing_registrations r
            JOIN outings o ON r.outing_id = o.id
            WHERE r.child_id = $1
            ORDER BY o.starts_at ASC
            "#,
        )
        .bind(child_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List registrations still in `invited` status for an outing, with the
    /// child names needed for reminder messages.
    pub async fn find_invited_for_outing(
        &self,
        outing_id: Uuid,
    ) -> Result<Vec<RegistrationWithChildEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_invited_for_outing");
        let result = sqlx::query_as::<_, RegistrationWithChildEntity>(
            r#"
            SELECT r.id, r.child_id, r.status,
                   c.first_name AS child_first_name, c.last_name AS child_last_name
            FROM outing_registrations r
            JOIN children c ON r.child_id = c.id
            WHERE r.outing_id = $1 AND r.status = 'invited'
            ORDER BY c.last_name ASC, c.first_name ASC
            "#,
        )
        .bind(outing_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Of the given children, the ones already registered for the outing.
    pub async fn existing_child_ids(
        &self,
        outing_id: Uuid,
        child_ids: &[Uuid],
    ) -> Result<Vec<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("find_existing_registration_children");
        let result = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT child_id
            FROM outing_registrations
            WHERE outing_id = $1 AND child_id = ANY($2)
            "#,
        )
        .bind(outing_id)
        .bind(child_ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Creates `invited` registrations for the given children and writes the
    /// accompanying staff messages, all in one transaction.
    ///
    /// Callers are expected to have filtered out already-registered children;
    /// a concurrent duplicate still trips the (child, outing) unique
    /// constraint and rolls the whole batch back.
    pub async fn create_invitations_with_messages(
        &self,
        outing_id: Uuid,
        child_ids: &[Uuid],
        messages: &[StaffMessage],
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("create_invitations");
        let mut tx = self.pool.begin().await?;

        for child_id in child_ids {
            sqlx::query(
                r#"
                INSERT INTO outing_registrations (child_id, outing_id, status)
                VALUES ($1, $2, 'invited')
                "#,
            )
            .bind(child_id)
            .bind(outing_id)
            .execute(&mut *tx)
            .await?;
        }

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

    /// Signed-registration counts for a set of outings; outings with no
    /// signatures are absent from the result.
    pub async fn count_signed_by_outing_ids(
        &self,
        outing_ids: &[Uuid],
    ) -> Result<Vec<SignedCountEntity>, sqlx::Error> {
        let timer = QueryTimer::new("count_signed_by_outings");
        let result = sqlx::query_as::<_, SignedCountEntity>(
            r#"
            SELECT outing_id, COUNT(id) AS signed_count
            FROM outing_registrations
            WHERE outing_id = ANY($1) AND signed_at IS NOT NULL
            GROUP BY outing_id
            "#,
        )
        .bind(outing_ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Decline an invitation on behalf of the owning parent.
    ///
    /// Only `invited` registrations can be declined; anything else returns
    /// `None` and is reported as not found.
    pub async fn decline(
        &self,
        registration_id: Uuid,
        parent_id: Uuid,
    ) -> Result<Option<OutingRegistrationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("decline_registration");
        let result = sqlx::query_as::<_, OutingRegistrationEntity>(
            r#"
            UPDATE outing_registrations r
            SET status = 'declined'
            FROM children c
            WHERE r.id = $1 AND r.child_id = c.id AND c.parent_id = $2
              AND r.status = 'invited'
            RETURNING r.id, r.child_id, r.outing_id, r.status, r.notes, r.signed_at,
                      r.signature_name, r.signature_phone, r.health_notes,
                      r.signature_image, r.signature_ip, r.signature_user_agent, r.created_at
            "#,
        )
        .bind(registration_id)
        .bind(parent_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Set the post-event review status (attended/absent). Admin only.
    pub async fn set_review_status(
        &self,
        registration_id: Uuid,
        status: RegistrationStatusDb,
    ) -> Result<Option<OutingRegistrationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("set_registration_review_status");
        let result = sqlx::query_as::<_, OutingRegistrationEntity>(&format!(
            r#"
            UPDATE outing_registrations
            SET status = $2
            WHERE id = $1
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(registration_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // Note: the capacity invariant is exercised end to end (including the
    // concurrent-signers property) by the integration tests in
    // crates/api/tests/consent_integration.rs.
}
