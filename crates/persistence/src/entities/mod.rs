//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod attendance;
pub mod child;
pub mod message;
pub mod outing;
pub mod parent;
pub mod registration;

pub use attendance::{AttendanceEntity, AttendanceStatsEntity, AttendanceStatusDb};
pub use child::{ChildEntity, LevelCountEntity};
pub use message::{MessageEntity, MessageSenderDb};
pub use outing::OutingEntity;
pub use parent::ParentProfileEntity;
pub use registration::{
    OutingRegistrationEntity, RegistrationStatusDb, RegistrationWithChildEntity,
    RegistrationWithOutingEntity, SignedCountEntity,
};
