//! Common type definitions.
//!
//! All entity IDs are UUIDs wrapped in type aliases so signatures say which entity they refer to:
//!
//! - [`UserGroupId`]: Regional authority identifier
//! - [`LocationId`]: Testing centre / office identifier
//! - [`UserId`]: User account identifier
//! - [`AssignmentId`]: Staff-to-location assignment identifier
//! - [`ResourceId`]: Location resource identifier
//!
//! # Utility Functions
//!
//! - [`abbrev_uuid`]: Abbreviate UUIDs to first 8 chars for logging

use uuid::Uuid;

// Type aliases for IDs
pub type UserGroupId = Uuid;
pub type LocationId = Uuid;
pub type UserId = Uuid;
pub type AssignmentId = Uuid;
pub type ResourceId = Uuid;

/// Abbreviate a UUID to its first 8 characters for more readable logs and traces
/// Example: "550e8400-e29b-41d4-a716-446655440000" -> "550e8400"
pub fn abbrev_uuid(uuid: &Uuid) -> String {
    uuid.to_string().chars().take(8).collect()
}
