//! Authenticated-parent extractor.
//!
//! Validates the Bearer token in the Authorization header and exposes the
//! calling parent's profile id to route handlers. Tokens with the admin role
//! are rejected here; admin routes have their own middleware.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use shared::jwt::Role;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthContext;

/// Authenticated parent information from JWT.
#[derive(Debug, Clone)]
pub struct ParentAuth {
    /// Parent profile id from the JWT subject claim.
    pub parent_id: Uuid,
    /// JWT ID (jti) for session tracking.
    pub jti: String,
}

#[async_trait]
impl FromRequestParts<AppState> for ParentAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Auth info may already have been inserted by middleware
        if let Some(auth) = parts.extensions.get::<AuthContext>() {
            return from_context(auth);
        }

        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        if !auth_header.starts_with("Bearer ") {
            return Err(ApiError::Unauthorized(
                "Invalid Authorization header format".to_string(),
            ));
        }

        let token = &auth_header[7..];

        let jwt_config =
            AuthContext::create_jwt_config(&state.config.jwt).map_err(ApiError::Internal)?;

        let auth = AuthContext::validate(&jwt_config, token)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

        from_context(&auth)
    }
}

fn from_context(auth: &AuthContext) -> Result<ParentAuth, ApiError> {
    if auth.role != Role::Parent {
        return Err(ApiError::Forbidden(
            "Parent account required".to_string(),
        ));
    }
    Ok(ParentAuth {
        parent_id: auth.account_id,
        jti: auth.jti.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_context_parent() {
        let auth = AuthContext {
            account_id: Uuid::new_v4(),
            jti: "jti".to_string(),
            role: Role::Parent,
        };
        let parent = from_context(&auth).unwrap();
        assert_eq!(parent.parent_id, auth.account_id);
        assert_eq!(parent.jti, "jti");
    }

    #[test]
    fn test_from_context_rejects_admin() {
        let auth = AuthContext {
            account_id: Uuid::new_v4(),
            jti: "jti".to_string(),
            role: Role::Admin,
        };
        assert!(matches!(
            from_context(&auth),
            Err(ApiError::Forbidden(_))
        ));
    }
}
