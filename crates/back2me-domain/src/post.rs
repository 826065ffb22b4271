//! Post module - read-only projection of a lost/found listing
//!
//! Posts are created, edited, and deleted by the posting flows. This core
//! only reads ownership and title from them, through the [`PostStore`]
//! seam.
//!
//! [`PostStore`]: crate::traits::PostStore

use crate::ids::{PostId, UserId};

/// A lost/found item listing, as visible to the claim workflow
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    /// Unique identifier
    pub id: PostId,

    /// The user who created the post; sole authority over its claims
    pub owner_id: UserId,

    /// Listing title, embedded in owner notifications
    pub title: String,
}
