//! Repository implementations for database operations.

pub mod attendance;
pub mod child;
pub mod message;
pub mod outing;
pub mod parent;
pub mod registration;

pub use attendance::AttendanceRepository;
pub use child::ChildRepository;
pub use message::{MessageRepository, StaffMessage};
pub use outing::OutingRepository;
pub use parent::ParentProfileRepository;
pub use registration::{OutingRegistrationRepository, SignOutcome};
