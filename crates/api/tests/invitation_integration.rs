//! Integration tests for the bulk invitation manager.

mod common;

use domain::models::invitation::{InviteRequest, RemindRequest};
use parent_portal_api::services::OutingInvitationManager;
use uuid::Uuid;

fn manager(pool: &sqlx::PgPool) -> OutingInvitationManager {
    OutingInvitationManager::new(pool.clone(), chrono_tz::Europe::Paris)
}

fn invite_children(child_ids: Vec<Uuid>) -> InviteRequest {
    InviteRequest {
        levels: Vec::new(),
        child_ids,
        only_eligible: true,
        send_message: false,
        message_template: None,
    }
}

/// Inviting the same set twice never duplicates (child, outing) rows; the
/// second run reports everything as skipped.
#[tokio::test]
#[ignore = "requires a PostgreSQL database (set TEST_DATABASE_URL)"]
async fn invite_is_idempotent() {
    let pool = common::create_test_pool().await;
    let manager = manager(&pool);

    let outing = common::seed_outing(&pool, None).await;
    let parent = common::seed_parent(&pool, true).await;
    let mut child_ids = Vec::new();
    for _ in 0..3 {
        child_ids.push(common::seed_child(&pool, parent, "CE2", true).await);
    }

    let first = manager
        .invite(outing, &invite_children(child_ids.clone()))
        .await
        .expect("first batch");
    assert_eq!(first.targets, 3);
    assert_eq!(first.created, 3);
    assert_eq!(first.skipped, 0);

    let second = manager
        .invite(outing, &invite_children(child_ids.clone()))
        .await
        .expect("second batch");
    assert_eq!(second.targets, 3);
    assert_eq!(second.created, 0);
    assert_eq!(second.skipped, 3);

    let rows: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM outing_registrations WHERE outing_id = $1",
    )
    .bind(outing)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(rows, 3);
}

/// Level and id filters AND together, and only validated children qualify.
#[tokio::test]
#[ignore = "requires a PostgreSQL database (set TEST_DATABASE_URL)"]
async fn invite_filters_targets() {
    let pool = common::create_test_pool().await;
    let manager = manager(&pool);

    let outing = common::seed_outing(&pool, None).await;
    let parent = common::seed_parent(&pool, true).await;
    let sixth_grader = common::seed_child(&pool, parent, "6e", true).await;
    let fifth_grader = common::seed_child(&pool, parent, "CM1", true).await;
    let unapproved = common::seed_child(&pool, parent, "6e", false).await;

    let pending_parent = common::seed_parent(&pool, false).await;
    let pending_family_child = common::seed_child(&pool, pending_parent, "6e", true).await;

    let request = InviteRequest {
        levels: vec!["6e".to_string()],
        child_ids: vec![sixth_grader, fifth_grader, unapproved, pending_family_child],
        only_eligible: true,
        send_message: false,
        message_template: None,
    };

    let report = manager.invite(outing, &request).await.expect("batch");
    // Only the approved 6e child of an approved parent matches both filters.
    assert_eq!(report.targets, 1);
    assert_eq!(report.created, 1);

    let registered: Vec<Uuid> =
        sqlx::query_scalar("SELECT child_id FROM outing_registrations WHERE outing_id = $1")
            .bind(outing)
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(registered, vec![sixth_grader]);
}

/// With messages enabled, every notified child gets one rendered message,
/// and `only_eligible = false` re-notifies already-registered children
/// without touching their rows.
#[tokio::test]
#[ignore = "requires a PostgreSQL database (set TEST_DATABASE_URL)"]
async fn invite_sends_messages_and_renotifies() {
    let pool = common::create_test_pool().await;
    let manager = manager(&pool);

    let outing = common::seed_outing(&pool, None).await;
    let parent = common::seed_parent(&pool, true).await;
    let child = common::seed_child(&pool, parent, "5e", true).await;

    let first = manager
        .invite(
            outing,
            &InviteRequest {
                levels: Vec::new(),
                child_ids: vec![child],
                only_eligible: true,
                send_message: true,
                message_template: Some("Sortie {SORTIE} pour {ENFANT}".to_string()),
            },
        )
        .await
        .expect("first batch");
    assert_eq!(first.created, 1);
    assert_eq!(first.messages, 1);
    assert_eq!(common::message_count(&pool, child).await, 1);

    let body: String =
        sqlx::query_scalar("SELECT body FROM messages WHERE child_id = $1 ORDER BY created_at DESC LIMIT 1")
            .bind(child)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(body.starts_with("Sortie "));
    assert!(!body.contains("{SORTIE}"));
    assert!(!body.contains("{ENFANT}"));

    // only_eligible = false: no new row, but one more message.
    let second = manager
        .invite(
            outing,
            &InviteRequest {
                levels: Vec::new(),
                child_ids: vec![child],
                only_eligible: false,
                send_message: true,
                message_template: None,
            },
        )
        .await
        .expect("second batch");
    assert_eq!(second.created, 0);
    assert_eq!(second.skipped, 0);
    assert_eq!(second.messages, 1);
    assert_eq!(common::message_count(&pool, child).await, 2);

    let status = common::registration_status(
        &pool,
        sqlx::query_scalar("SELECT id FROM outing_registrations WHERE outing_id = $1")
            .bind(outing)
            .fetch_one(&pool)
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, "invited");
}

/// Reminders target `invited` registrations only and leave statuses alone.
#[tokio::test]
#[ignore = "requires a PostgreSQL database (set TEST_DATABASE_URL)"]
async fn remind_targets_invited_only() {
    let pool = common::create_test_pool().await;
    let manager = manager(&pool);

    let outing = common::seed_outing(&pool, None).await;
    let parent = common::seed_parent(&pool, true).await;

    let pending_child = common::seed_child(&pool, parent, "CE1", true).await;
    let pending_registration = common::seed_registration(&pool, pending_child, outing).await;

    let confirmed_child = common::seed_child(&pool, parent, "CE1", true).await;
    let confirmed_registration = common::seed_registration(&pool, confirmed_child, outing).await;
    sqlx::query(
        "UPDATE outing_registrations SET status = 'confirmed', signed_at = NOW() WHERE id = $1",
    )
    .bind(confirmed_registration)
    .execute(&pool)
    .await
    .unwrap();

    let report = manager
        .remind_invited(outing, &RemindRequest {
            send_message: true,
            message_template: None,
        })
        .await
        .expect("reminder run");

    assert_eq!(report.invited, 1);
    assert_eq!(report.messages, 1);
    assert_eq!(common::message_count(&pool, pending_child).await, 1);
    assert_eq!(common::message_count(&pool, confirmed_child).await, 0);

    // Statuses unchanged.
    assert_eq!(
        common::registration_status(&pool, pending_registration).await,
        "invited"
    );
    assert_eq!(
        common::registration_status(&pool, confirmed_registration).await,
        "confirmed"
    );
}

/// Reminder runs with messaging disabled still report the invited count.
#[tokio::test]
#[ignore = "requires a PostgreSQL database (set TEST_DATABASE_URL)"]
async fn remind_without_messages_counts_only() {
    let pool = common::create_test_pool().await;
    let manager = manager(&pool);

    let outing = common::seed_outing(&pool, None).await;
    let parent = common::seed_parent(&pool, true).await;
    let child = common::seed_child(&pool, parent, "4e", true).await;
    common::seed_registration(&pool, child, outing).await;

    let report = manager
        .remind_invited(outing, &RemindRequest {
            send_message: false,
            message_template: None,
        })
        .await
        .expect("reminder run");

    assert_eq!(report.invited, 1);
    assert_eq!(report.messages, 0);
    assert_eq!(common::message_count(&pool, child).await, 0);
}
