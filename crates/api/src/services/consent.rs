//! Outing consent service.
//!
//! Lets a parent irrevocably transition a registration into signed/confirmed
//! state while honoring the outing's capacity under concurrency. The
//! count-then-write atomicity itself lives in the repository transaction;
//! this service owns validation, normalisation and outcome mapping.

use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, warn};

use domain::models::registration::{
    OutingRegistration, SignRequest, SignatureDetails, SignatureMetadata,
};
use persistence::repositories::{OutingRegistrationRepository, SignOutcome};
use shared::validation::{is_signature_data_url, trimmed_non_empty};

use crate::error::ApiError;
use crate::middleware::metrics::{record_capacity_rejection, record_consent_signed};

/// Failures of a signing attempt.
#[derive(Debug, Error)]
pub enum ConsentError {
    /// Missing consent checkbox or required fields; nothing was written.
    #[error("Invalid consent form: {0}")]
    Validation(String),

    /// Registration missing or not owned by the calling parent. Surfaced as
    /// a plain not-found so other families' registrations stay invisible.
    #[error("Registration not found")]
    NotFound,

    /// The outing is full; the registration was left untouched.
    #[error("Outing full: {signed}/{capacity} signatures")]
    CapacityExceeded { capacity: i32, signed: i64 },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<ConsentError> for ApiError {
    fn from(err: ConsentError) -> Self {
        match err {
            ConsentError::Validation(msg) => ApiError::Validation(msg),
            ConsentError::NotFound => ApiError::NotFound("Registration not found".to_string()),
            ConsentError::CapacityExceeded { capacity, signed } => {
                ApiError::CapacityExceeded { capacity, signed }
            }
            ConsentError::Database(e) => e.into(),
        }
    }
}

/// Service recording guardian consent signatures.
#[derive(Clone)]
pub struct OutingConsentService {
    registrations: OutingRegistrationRepository,
}

impl OutingConsentService {
    /// Creates the service over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            registrations: OutingRegistrationRepository::new(pool),
        }
    }

    /// Signs a registration on behalf of the calling parent.
    ///
    /// Validates the form, then runs the capacity-guarded write. Re-signing
    /// an already-confirmed registration overwrites its signature fields
    /// without re-checking capacity (its slot is already counted).
    pub async fn sign(
        &self,
        registration_id: uuid::Uuid,
        parent_id: uuid::Uuid,
        request: &SignRequest,
        metadata: SignatureMetadata,
    ) -> Result<OutingRegistration, ConsentError> {
        let details = validate_sign_request(request, metadata)?;

        let outcome = self
            .registrations
            .sign_with_capacity_check(registration_id, parent_id, &details)
            .await?;

        match outcome {
            SignOutcome::Signed(entity) => {
                record_consent_signed();
                info!(
                    registration_id = %entity.id,
                    outing_id = %entity.outing_id,
                    child_id = %entity.child_id,
                    "Consent signature recorded"
                );
                Ok(entity.into())
            }
            SignOutcome::CapacityFull { capacity, signed } => {
                record_capacity_rejection();
                warn!(
                    registration_id = %registration_id,
                    capacity = capacity,
                    signed = signed,
                    "Signing rejected: outing full"
                );
                Err(ConsentError::CapacityExceeded { capacity, signed })
            }
            SignOutcome::NotFound => Err(ConsentError::NotFound),
        }
    }
}

/// Checks the consent form and normalises it into writable signature fields.
fn validate_sign_request(
    request: &SignRequest,
    metadata: SignatureMetadata,
) -> Result<SignatureDetails, ConsentError> {
    if !request.consent {
        return Err(ConsentError::Validation(
            "Vous devez autoriser la participation et certifier être représentant légal."
                .to_string(),
        ));
    }

    let name = trimmed_non_empty(&request.name)
        .ok_or_else(|| ConsentError::Validation("Nom et téléphone requis.".to_string()))?;
    let phone = trimmed_non_empty(&request.phone)
        .ok_or_else(|| ConsentError::Validation("Nom et téléphone requis.".to_string()))?;

    // A non-image payload is dropped rather than stored.
    let signature_image = request
        .signature_image
        .as_deref()
        .filter(|v| is_signature_data_url(v))
        .map(str::to_string);

    Ok(SignatureDetails {
        name: name.to_string(),
        phone: phone.to_string(),
        health_notes: request
            .health_notes
            .as_deref()
            .and_then(trimmed_non_empty)
            .map(str::to_string),
        signature_image,
        ip: metadata.ip,
        user_agent: metadata.user_agent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> SignRequest {
        SignRequest {
            name: "Awa Diallo".to_string(),
            phone: "0612345678".to_string(),
            health_notes: Some("Asthme, ventoline dans le sac".to_string()),
            consent: true,
            signature_image: None,
        }
    }

    #[test]
    fn test_validate_accepts_valid_form() {
        let details = validate_sign_request(&valid_request(), SignatureMetadata::default()).unwrap();
        assert_eq!(details.name, "Awa Diallo");
        assert_eq!(details.phone, "0612345678");
        assert_eq!(
            details.health_notes.as_deref(),
            Some("Asthme, ventoline dans le sac")
        );
    }

    #[test]
    fn test_validate_rejects_missing_consent() {
        let request = SignRequest {
            consent: false,
            ..valid_request()
        };
        let err = validate_sign_request(&request, SignatureMetadata::default()).unwrap_err();
        assert!(matches!(err, ConsentError::Validation(_)));
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let request = SignRequest {
            name: "   ".to_string(),
            ..valid_request()
        };
        let err = validate_sign_request(&request, SignatureMetadata::default()).unwrap_err();
        assert!(matches!(err, ConsentError::Validation(_)));
    }

    #[test]
    fn test_validate_rejects_blank_phone() {
        let request = SignRequest {
            phone: String::new(),
            ..valid_request()
        };
        let err = validate_sign_request(&request, SignatureMetadata::default()).unwrap_err();
        assert!(matches!(err, ConsentError::Validation(_)));
    }

    #[test]
    fn test_validate_trims_fields() {
        let request = SignRequest {
            name: "  Awa Diallo  ".to_string(),
            phone: " 0612345678 ".to_string(),
            health_notes: Some("   ".to_string()),
            ..valid_request()
        };
        let details = validate_sign_request(&request, SignatureMetadata::default()).unwrap();
        assert_eq!(details.name, "Awa Diallo");
        assert_eq!(details.phone, "0612345678");
        // Blank health notes normalise to None
        assert_eq!(details.health_notes, None);
    }

    #[test]
    fn test_validate_keeps_data_url_signature() {
        let request = SignRequest {
            signature_image: Some("data:image/png;base64,iVBORw0KGgo=".to_string()),
            ..valid_request()
        };
        let details = validate_sign_request(&request, SignatureMetadata::default()).unwrap();
        assert!(details.signature_image.is_some());
    }

    #[test]
    fn test_validate_drops_non_data_url_signature() {
        let request = SignRequest {
            signature_image: Some("https://example.com/sig.png".to_string()),
            ..valid_request()
        };
        let details = validate_sign_request(&request, SignatureMetadata::default()).unwrap();
        assert_eq!(details.signature_image, None);
    }

    #[test]
    fn test_validate_records_request_metadata() {
        let metadata = SignatureMetadata {
            ip: Some("192.0.2.10".to_string()),
            user_agent: Some("Mozilla/5.0".to_string()),
        };
        let details = validate_sign_request(&valid_request(), metadata).unwrap();
        assert_eq!(details.ip.as_deref(), Some("192.0.2.10"));
        assert_eq!(details.user_agent.as_deref(), Some("Mozilla/5.0"));
    }
}
