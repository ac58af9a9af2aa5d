//! JWT authentication middleware.
//!
//! Validates the Bearer token and enforces the portal role. Issuing tokens
//! is the identity provider's job; the API only verifies them.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use shared::jwt::{JwtConfig, Role};

use crate::app::AppState;
use crate::config::JwtAuthConfig;

/// Authenticated account information extracted from JWT.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Account id from the JWT subject claim (parent profile id for
    /// parents).
    pub account_id: Uuid,
    /// JWT ID (jti) for session tracking.
    pub jti: String,
    /// Portal role carried by the token.
    pub role: Role,
}

impl AuthContext {
    /// Validates an access token and returns its authentication context.
    pub fn validate(jwt_config: &JwtConfig, token: &str) -> Result<Self, String> {
        let claims = jwt_config
            .validate_access_token(token)
            .map_err(|e| format!("Invalid token: {}", e))?;

        let account_id =
            Uuid::parse_str(&claims.sub).map_err(|_| "Invalid account ID in token".to_string())?;

        Ok(AuthContext {
            account_id,
            jti: claims.jti,
            role: claims.role,
        })
    }

    /// Creates a JwtConfig from JwtAuthConfig.
    pub fn create_jwt_config(config: &JwtAuthConfig) -> Result<JwtConfig, String> {
        JwtConfig::with_leeway(
            &config.private_key,
            &config.public_key,
            config.access_token_expiry_secs,
            config.refresh_token_expiry_secs,
            config.leeway_secs,
        )
        .map_err(|e| format!("Failed to initialize JWT config: {}", e))
    }
}

/// Middleware that requires an admin JWT.
///
/// Validates the Bearer token, rejects non-admin roles and stores the
/// authentication context in request extensions.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => {
            return unauthorized_response("Missing or invalid Authorization header");
        }
    };

    let jwt_config = match AuthContext::create_jwt_config(&state.config.jwt) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to create JWT config: {}", e);
            return internal_error_response("Authentication service unavailable");
        }
    };

    match AuthContext::validate(&jwt_config, token) {
        Ok(auth) if auth.role == Role::Admin => {
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Ok(_) => forbidden_response("Admin access required"),
        Err(e) => {
            tracing::debug!("JWT validation failed: {}", e);
            unauthorized_response("Invalid or expired token")
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message,
        })),
    )
        .into_response()
}

fn forbidden_response(message: &str) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": "forbidden",
            "message": message,
        })),
    )
        .into_response()
}

fn internal_error_response(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": message,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_context_clone() {
        let auth = AuthContext {
            account_id: Uuid::new_v4(),
            jti: "test_jti".to_string(),
            role: Role::Parent,
        };
        let cloned = auth.clone();
        assert_eq!(auth.account_id, cloned.account_id);
        assert_eq!(cloned.role, Role::Parent);
    }

    #[test]
    fn test_unauthorized_response_status() {
        let response = unauthorized_response("nope");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_forbidden_response_status() {
        let response = forbidden_response("nope");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
