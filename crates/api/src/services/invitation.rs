//! Outing invitation manager.
//!
//! Bulk-creates invitation registrations for a target set of children,
//! idempotently per (child, outing), and optionally notifies parents through
//! the message thread. Reminders re-notify non-respondents without touching
//! their status.

use chrono_tz::Tz;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use domain::models::invitation::{InviteReport, InviteRequest, RemindReport, RemindRequest};
use domain::models::outing::Outing;
use domain::services::messaging::{
    render_message, INVITATION_SUBJECT, REMINDER_SUBJECT,
};
use persistence::repositories::{
    ChildRepository, MessageRepository, OutingRegistrationRepository, OutingRepository,
    StaffMessage,
};

use crate::error::ApiError;

/// Service running admin invitation batches.
#[derive(Clone)]
pub struct OutingInvitationManager {
    outings: OutingRepository,
    children: ChildRepository,
    registrations: OutingRegistrationRepository,
    messages: MessageRepository,
    timezone: Tz,
}

impl OutingInvitationManager {
    /// Creates the service over the given connection pool.
    pub fn new(pool: PgPool, timezone: Tz) -> Self {
        Self {
            outings: OutingRepository::new(pool.clone()),
            children: ChildRepository::new(pool.clone()),
            registrations: OutingRegistrationRepository::new(pool.clone()),
            messages: MessageRepository::new(pool),
            timezone,
        }
    }

    /// Invites the targeted children to an outing.
    ///
    /// Targets are validated children (approved child of an approved parent)
    /// filtered by level set and/or id set. Existing (child, outing) rows are
    /// never duplicated: with `only_eligible` they are skipped outright,
    /// without it they keep their row but are notified again. New rows are
    /// created as `invited`. Registrations and messages commit as one batch.
    pub async fn invite(
        &self,
        outing_id: Uuid,
        request: &InviteRequest,
    ) -> Result<InviteReport, ApiError> {
        let outing = self
            .outings
            .find_by_id(outing_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Outing not found".to_string()))?;

        let targets = self
            .children
            .find_validated(&request.levels, &request.child_ids)
            .await?;
        if targets.is_empty() {
            return Ok(InviteReport::default());
        }

        let target_ids: Vec<Uuid> = targets.iter().map(|c| c.id).collect();
        let existing = self
            .registrations
            .existing_child_ids(outing_id, &target_ids)
            .await?;

        let outing_model: Outing = outing.into();
        let mut created_ids = Vec::new();
        let mut messages = Vec::new();
        let mut skipped = 0u32;

        for child in &targets {
            let already_registered = existing.contains(&child.id);

            if already_registered && request.only_eligible {
                skipped += 1;
                continue;
            }

            if !already_registered {
                created_ids.push(child.id);
            }

            if request.send_message {
                messages.push(StaffMessage {
                    child_id: child.id,
                    subject: INVITATION_SUBJECT.to_string(),
                    body: render_message(
                        request.message_template.as_deref(),
                        &child.full_name(),
                        &outing_model,
                        self.timezone,
                    ),
                });
            }
        }

        self.registrations
            .create_invitations_with_messages(outing_id, &created_ids, &messages)
            .await?;

        let report = InviteReport {
            targets: targets.len() as u32,
            created: created_ids.len() as u32,
            skipped,
            messages: messages.len() as u32,
        };

        info!(
            outing_id = %outing_id,
            targets = report.targets,
            created = report.created,
            skipped = report.skipped,
            messages = report.messages,
            "Invitation batch processed"
        );

        Ok(report)
    }

    /// Re-notifies registrations still in `invited` status for an outing.
    ///
    /// Statuses are left untouched; only reminder messages are written,
    /// as one batch.
    pub async fn remind_invited(
        &self,
        outing_id: Uuid,
        request: &RemindRequest,
    ) -> Result<RemindReport, ApiError> {
        let outing = self
            .outings
            .find_by_id(outing_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Outing not found".to_string()))?;

        let invited = self.registrations.find_invited_for_outing(outing_id).await?;

        let mut messages = Vec::new();
        if request.send_message {
            let outing_model: Outing = outing.into();
            messages = invited
                .iter()
                .map(|registration| StaffMessage {
                    child_id: registration.child_id,
                    subject: REMINDER_SUBJECT.to_string(),
                    body: render_message(
                        request.message_template.as_deref(),
                        &registration.child_full_name(),
                        &outing_model,
                        self.timezone,
                    ),
                })
                .collect();
            self.messages.create_staff_batch(&messages).await?;
        }

        let report = RemindReport {
            invited: invited.len() as u32,
            messages: messages.len() as u32,
        };

        info!(
            outing_id = %outing_id,
            invited = report.invited,
            messages = report.messages,
            "Reminder batch processed"
        );

        Ok(report)
    }
}
