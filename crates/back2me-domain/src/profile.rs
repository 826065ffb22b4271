//! Profile module - read-only projection of a user record
//!
//! Profiles are owned by the account flows; this core reads them to resolve
//! display names and contact addresses for notifications.

use crate::ids::UserId;

/// A user record, as visible to the claim and rating workflows
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    /// Unique identifier
    pub id: UserId,

    /// Display name shown to counterparts
    pub display_name: String,

    /// Reference to an avatar asset, if the user set one
    pub avatar_ref: Option<String>,

    /// Contact email address
    pub email: String,
}
