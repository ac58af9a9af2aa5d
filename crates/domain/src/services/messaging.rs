//! Invitation message templating.
//!
//! Staff messages sent with invitations and reminders support a small set of
//! placeholders; the rendered body is stored as a plain message row.

use chrono_tz::Tz;

use crate::models::outing::Outing;

/// Subject of invitation messages.
pub const INVITATION_SUBJECT: &str = "Invitation à une sortie";

/// Subject of reminder messages for non-respondents.
pub const REMINDER_SUBJECT: &str = "Relance — invitation sortie";

/// Default body used when the operator supplies no template.
pub const DEFAULT_INVITATION_TEMPLATE: &str = "Bonjour,\n\nVotre enfant {ENFANT} est invité(e) à la sortie « {SORTIE} » le {DATE} à {LIEU}.\nMerci de vous connecter à votre espace pour autoriser la participation.\n\nL'équipe de l'association";

/// Renders a message body for one child and outing.
///
/// Supported placeholders: `{ENFANT}` (child name), `{SORTIE}` (outing
/// title), `{DATE}` (start, dd/mm/yyyy hh:mm in `tz`), `{LIEU}` (location).
pub fn render_message(template: Option<&str>, child_name: &str, outing: &Outing, tz: Tz) -> String {
    let base = template.unwrap_or(DEFAULT_INVITATION_TEMPLATE);
    let starts_local = outing.starts_at.with_timezone(&tz);

    base.replace("{ENFANT}", child_name)
        .replace("{SORTIE}", &outing.title)
        .replace("{DATE}", &starts_local.format("%d/%m/%Y %H:%M").to_string())
        .replace("{LIEU}", outing.location.as_deref().unwrap_or("—"))
}
