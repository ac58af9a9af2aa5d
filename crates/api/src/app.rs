use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, require_admin, trace_id};
use crate::routes::{account, attendance, health, invitations, outings, registrations};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        pool,
        config: config.clone(),
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Parent routes (authenticated via the ParentAuth extractor)
    let parent_routes = Router::new()
        .route("/api/v1/account/profile", get(account::get_profile))
        .route("/api/v1/account/children", get(account::list_children))
        .route(
            "/api/v1/account/children/:child_id/attendance",
            get(attendance::month_view),
        )
        .route(
            "/api/v1/account/children/:child_id/outings",
            get(registrations::child_outings),
        )
        .route(
            "/api/v1/account/children/:child_id/messages",
            get(account::list_messages),
        )
        .route("/api/v1/account/messages", post(account::send_message))
        .route(
            "/api/v1/account/registrations/:id",
            get(registrations::registration_detail),
        )
        .route(
            "/api/v1/account/registrations/:id/sign",
            post(registrations::sign_registration),
        )
        .route(
            "/api/v1/account/registrations/:id/decline",
            post(registrations::decline_registration),
        );

    // Admin routes (require an admin JWT)
    let admin_routes = Router::new()
        .route(
            "/api/v1/admin/outings",
            get(outings::list_outings).post(outings::create_outing),
        )
        .route(
            "/api/v1/admin/outings/:id/capacity",
            patch(outings::update_capacity),
        )
        .route(
            "/api/v1/admin/outings/:id/invitations",
            post(invitations::invite),
        )
        .route(
            "/api/v1/admin/outings/:id/reminders",
            post(invitations::remind),
        )
        .route("/api/v1/admin/levels", get(invitations::list_levels))
        .route(
            "/api/v1/admin/attendance",
            get(attendance::get_roster).post(attendance::save_roster),
        )
        .route(
            "/api/v1/admin/registrations/:id/review",
            post(registrations::review_registration),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(parent_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(trace_id))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}
