//! Shared utilities and common types for the parent-portal backend.
//!
//! This crate provides common functionality used across all other crates:
//! - JWT token handling for the authentication seam
//! - Common validation logic for user-submitted fields

pub mod jwt;
pub mod validation;
