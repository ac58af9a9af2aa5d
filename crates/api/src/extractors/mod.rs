//! Axum request extractors.

pub mod parent_auth;

pub use parent_auth::ParentAuth;
