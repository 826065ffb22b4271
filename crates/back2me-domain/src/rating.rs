//! Rating module - star assessments users leave for each other

use crate::ids::{ClaimId, RatingId, UserId};
use std::fmt;

/// A star value bounded to the 1-5 range
///
/// The bound is enforced at construction so that an out-of-range value
/// cannot exist past the validation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Stars(u8);

impl Stars {
    /// Lowest permitted star value
    pub const MIN: u8 = 1;

    /// Highest permitted star value
    pub const MAX: u8 = 5;

    /// Construct a star value, rejecting anything outside 1-5
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    /// Get the raw star value
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Stars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A rating one user leaves for another
///
/// At most one rating may exist per (rater, rated) pair. A rating is created
/// once and never mutated or deleted by this core. `claim_id` is present for
/// ratings triggered by a claim exchange and absent for direct profile
/// ratings.
#[derive(Debug, Clone, PartialEq)]
pub struct Rating {
    /// Unique identifier
    pub id: RatingId,

    /// The user giving the rating
    pub rater_user_id: UserId,

    /// The user being rated
    pub rated_user_id: UserId,

    /// Star value, 1-5
    pub stars: Stars,

    /// Optional free-text feedback
    pub comment: Option<String>,

    /// The claim this rating stems from, if any
    pub claim_id: Option<ClaimId>,

    /// When this rating was created (seconds since Unix epoch)
    pub created_at: u64,
}
