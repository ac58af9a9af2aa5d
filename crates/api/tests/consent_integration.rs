//! Integration tests for the consent signing service, including the
//! capacity invariant under concurrent signers.

mod common;

use domain::models::registration::{SignRequest, SignatureMetadata};
use parent_portal_api::services::{ConsentError, OutingConsentService};
use uuid::Uuid;

fn sign_request(name: &str) -> SignRequest {
    SignRequest {
        name: name.to_string(),
        phone: "0612345678".to_string(),
        health_notes: None,
        consent: true,
        signature_image: None,
    }
}

/// Capacity=2, three invited registrations: the first two signers succeed,
/// the third is rejected and its registration stays `invited`.
#[tokio::test]
#[ignore = "requires a PostgreSQL database (set TEST_DATABASE_URL)"]
async fn sign_respects_capacity_sequentially() {
    let pool = common::create_test_pool().await;
    let service = OutingConsentService::new(pool.clone());

    let outing = common::seed_outing(&pool, Some(2)).await;
    let mut registrations = Vec::new();
    for _ in 0..3 {
        let parent = common::seed_parent(&pool, true).await;
        let child = common::seed_child(&pool, parent, "CE2", true).await;
        let registration = common::seed_registration(&pool, child, outing).await;
        registrations.push((registration, parent));
    }

    let (reg1, parent1) = registrations[0];
    let (reg2, parent2) = registrations[1];
    let (reg3, parent3) = registrations[2];

    let signed = service
        .sign(reg1, parent1, &sign_request("Parent Un"), SignatureMetadata::default())
        .await
        .expect("first signer fits");
    assert!(signed.signed_at.is_some());
    assert_eq!(common::signed_count(&pool, outing).await, 1);

    service
        .sign(reg2, parent2, &sign_request("Parent Deux"), SignatureMetadata::default())
        .await
        .expect("second signer fits");
    assert_eq!(common::signed_count(&pool, outing).await, 2);

    let err = service
        .sign(reg3, parent3, &sign_request("Parent Trois"), SignatureMetadata::default())
        .await
        .expect_err("third signer must be rejected");
    assert!(matches!(
        err,
        ConsentError::CapacityExceeded {
            capacity: 2,
            signed: 2
        }
    ));

    // The rejected registration is left untouched.
    assert_eq!(common::registration_status(&pool, reg3).await, "invited");
    assert_eq!(common::signed_count(&pool, outing).await, 2);
}

/// Capacity property: C+k concurrent signers on a capacity-C outing produce
/// exactly C signatures and k capacity rejections.
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
#[ignore = "requires a PostgreSQL database (set TEST_DATABASE_URL)"]
async fn sign_respects_capacity_under_concurrency() {
    const CAPACITY: i32 = 3;
    const SIGNERS: usize = 8;

    let pool = common::create_test_pool().await;
    let service = OutingConsentService::new(pool.clone());

    let outing = common::seed_outing(&pool, Some(CAPACITY)).await;
    let mut registrations = Vec::new();
    for _ in 0..SIGNERS {
        let parent = common::seed_parent(&pool, true).await;
        let child = common::seed_child(&pool, parent, "CM1", true).await;
        let registration = common::seed_registration(&pool, child, outing).await;
        registrations.push((registration, parent));
    }

    let mut handles = Vec::new();
    for (registration, parent) in registrations {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service
                .sign(
                    registration,
                    parent,
                    &sign_request("Tuteur Concurrent"),
                    SignatureMetadata::default(),
                )
                .await
        }));
    }

    let mut succeeded = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.expect("signer task panicked") {
            Ok(_) => succeeded += 1,
            Err(ConsentError::CapacityExceeded { .. }) => rejected += 1,
            Err(other) => panic!("unexpected signing failure: {other}"),
        }
    }

    assert_eq!(succeeded, CAPACITY as usize);
    assert_eq!(rejected, SIGNERS - CAPACITY as usize);
    assert_eq!(common::signed_count(&pool, outing).await, CAPACITY as i64);
}

/// A null-capacity outing accepts every valid signature.
#[tokio::test]
#[ignore = "requires a PostgreSQL database (set TEST_DATABASE_URL)"]
async fn sign_unlimited_capacity_always_succeeds() {
    let pool = common::create_test_pool().await;
    let service = OutingConsentService::new(pool.clone());

    let outing = common::seed_outing(&pool, None).await;
    for _ in 0..5 {
        let parent = common::seed_parent(&pool, true).await;
        let child = common::seed_child(&pool, parent, "6e", true).await;
        let registration = common::seed_registration(&pool, child, outing).await;

        service
            .sign(registration, parent, &sign_request("Tuteur"), SignatureMetadata::default())
            .await
            .expect("unlimited outing never rejects on capacity");
    }

    assert_eq!(common::signed_count(&pool, outing).await, 5);
}

/// Re-signing an already-confirmed registration overwrites the signature
/// fields without re-checking capacity.
#[tokio::test]
#[ignore = "requires a PostgreSQL database (set TEST_DATABASE_URL)"]
async fn resign_overwrites_without_capacity_check() {
    let pool = common::create_test_pool().await;
    let service = OutingConsentService::new(pool.clone());

    let outing = common::seed_outing(&pool, Some(1)).await;
    let parent = common::seed_parent(&pool, true).await;
    let child = common::seed_child(&pool, parent, "CE1", true).await;
    let registration = common::seed_registration(&pool, child, outing).await;

    service
        .sign(registration, parent, &sign_request("Premier Nom"), SignatureMetadata::default())
        .await
        .expect("first sign fits");
    assert_eq!(common::signed_count(&pool, outing).await, 1);

    // The outing is now at capacity, but the same registration can re-sign.
    let resigned = service
        .sign(registration, parent, &sign_request("Nom Corrigé"), SignatureMetadata::default())
        .await
        .expect("re-sign must not hit the capacity check");

    assert_eq!(resigned.signature_name.as_deref(), Some("Nom Corrigé"));
    assert_eq!(common::signed_count(&pool, outing).await, 1);
}

/// Validation failures: missing consent or blank fields, nothing written.
#[tokio::test]
#[ignore = "requires a PostgreSQL database (set TEST_DATABASE_URL)"]
async fn sign_rejects_invalid_forms() {
    let pool = common::create_test_pool().await;
    let service = OutingConsentService::new(pool.clone());

    let outing = common::seed_outing(&pool, Some(10)).await;
    let parent = common::seed_parent(&pool, true).await;
    let child = common::seed_child(&pool, parent, "CM2", true).await;
    let registration = common::seed_registration(&pool, child, outing).await;

    let no_consent = SignRequest {
        consent: false,
        ..sign_request("Tuteur")
    };
    let err = service
        .sign(registration, parent, &no_consent, SignatureMetadata::default())
        .await
        .expect_err("consent checkbox is mandatory");
    assert!(matches!(err, ConsentError::Validation(_)));

    let blank_phone = SignRequest {
        phone: "   ".to_string(),
        ..sign_request("Tuteur")
    };
    let err = service
        .sign(registration, parent, &blank_phone, SignatureMetadata::default())
        .await
        .expect_err("blank phone is rejected");
    assert!(matches!(err, ConsentError::Validation(_)));

    assert_eq!(common::registration_status(&pool, registration).await, "invited");
    assert_eq!(common::signed_count(&pool, outing).await, 0);
}

/// Another family's registration reads as not found.
#[tokio::test]
#[ignore = "requires a PostgreSQL database (set TEST_DATABASE_URL)"]
async fn sign_rejects_foreign_registration() {
    let pool = common::create_test_pool().await;
    let service = OutingConsentService::new(pool.clone());

    let outing = common::seed_outing(&pool, None).await;
    let parent = common::seed_parent(&pool, true).await;
    let child = common::seed_child(&pool, parent, "3e", true).await;
    let registration = common::seed_registration(&pool, child, outing).await;

    let other_parent = common::seed_parent(&pool, true).await;

    let err = service
        .sign(registration, other_parent, &sign_request("Intrus"), SignatureMetadata::default())
        .await
        .expect_err("foreign registration must not be signable");
    assert!(matches!(err, ConsentError::NotFound));

    let err = service
        .sign(Uuid::new_v4(), parent, &sign_request("Tuteur"), SignatureMetadata::default())
        .await
        .expect_err("unknown registration id");
    assert!(matches!(err, ConsentError::NotFound));
}

/// Signature metadata (image, IP, user agent) is stored with the signature.
#[tokio::test]
#[ignore = "requires a PostgreSQL database (set TEST_DATABASE_URL)"]
async fn sign_records_signature_metadata() {
    let pool = common::create_test_pool().await;
    let service = OutingConsentService::new(pool.clone());

    let outing = common::seed_outing(&pool, None).await;
    let parent = common::seed_parent(&pool, true).await;
    let child = common::seed_child(&pool, parent, "CP", true).await;
    let registration = common::seed_registration(&pool, child, outing).await;

    let request = SignRequest {
        signature_image: Some("data:image/png;base64,iVBORw0KGgo=".to_string()),
        health_notes: Some("Allergie arachide".to_string()),
        ..sign_request("Awa Diallo")
    };
    let metadata = SignatureMetadata {
        ip: Some("192.0.2.10".to_string()),
        user_agent: Some("Mozilla/5.0".to_string()),
    };

    let signed = service
        .sign(registration, parent, &request, metadata)
        .await
        .expect("valid signature");

    assert_eq!(signed.signature_name.as_deref(), Some("Awa Diallo"));
    assert_eq!(signed.signature_phone.as_deref(), Some("0612345678"));
    assert_eq!(signed.health_notes.as_deref(), Some("Allergie arachide"));
    assert!(signed.signature_image.is_some());
    assert_eq!(signed.signature_ip.as_deref(), Some("192.0.2.10"));
    assert_eq!(signed.signature_user_agent.as_deref(), Some("Mozilla/5.0"));
    assert_eq!(
        common::registration_status(&pool, registration).await,
        "confirmed"
    );
}
