//! Domain layer for the parent-portal backend.
//!
//! This crate contains:
//! - Domain models (children, outings, registrations, attendance, messages)
//! - Pure domain services (school-year calendar, message templating)

pub mod models;
pub mod services;
