//! Application services.
//!
//! The three stateful cores of the portal: consent signing with capacity
//! enforcement, bulk invitations, and daily attendance recording.

pub mod attendance;
pub mod consent;
pub mod invitation;

pub use attendance::AttendanceRecorder;
pub use consent::{ConsentError, OutingConsentService};
pub use invitation::OutingInvitationManager;
