//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and
//! infrastructure. Storage and delivery implementations live in other
//! crates. Conflicts the storage layer must arbitrate (a lost transition
//! race, the rating pair uniqueness constraint) surface as typed outcomes
//! rather than implementation-specific errors, so the services above can
//! map them without downcasting.

use crate::claim::{Claim, ClaimStatus};
use crate::ids::{ClaimId, PostId, RatingId, UserId};
use crate::notification::ClaimNotification;
use crate::post::Post;
use crate::profile::Profile;
use crate::rating::Rating;

/// Outcome of a conditional claim transition
///
/// The transition only applies while the claim is still pending; a
/// concurrent writer that loses the race observes [`NotPending`] with the
/// status the winner left behind.
///
/// [`NotPending`]: TransitionOutcome::NotPending
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionOutcome {
    /// The status was applied; carries the updated claim
    Applied(Claim),

    /// The claim was already terminal; carries the current status
    NotPending(ClaimStatus),

    /// No claim with the given id exists
    NotFound,
}

/// Outcome of inserting a rating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingInsert {
    /// The rating was persisted
    Inserted(RatingId),

    /// A rating for this (rater, rated) pair already exists
    DuplicatePair,
}

/// Trait for storing and retrieving claims
///
/// Implemented by the infrastructure layer (back2me-store)
pub trait ClaimStore {
    /// Error type for store operations
    type Error;

    /// Persist a new claim
    fn insert_claim(&mut self, claim: Claim) -> Result<ClaimId, Self::Error>;

    /// Get a claim by ID
    fn get_claim(&self, id: ClaimId) -> Result<Option<Claim>, Self::Error>;

    /// Apply a terminal status if and only if the claim is still pending
    fn transition_claim(
        &mut self,
        id: ClaimId,
        new_status: ClaimStatus,
    ) -> Result<TransitionOutcome, Self::Error>;

    /// All claims filed against a post, newest first
    fn claims_for_post(&self, post_id: PostId) -> Result<Vec<Claim>, Self::Error>;

    /// Claims filed against a post by one claimant, newest first
    fn claims_for_post_by_claimer(
        &self,
        post_id: PostId,
        claimer_id: UserId,
    ) -> Result<Vec<Claim>, Self::Error>;
}

/// Trait for storing and retrieving ratings
///
/// Implemented by the infrastructure layer (back2me-store)
pub trait RatingStore {
    /// Error type for store operations
    type Error;

    /// Persist a rating, reporting a pair conflict as a typed outcome
    fn insert_rating(&mut self, rating: Rating) -> Result<RatingInsert, Self::Error>;

    /// All ratings received by a user
    fn ratings_for_user(&self, rated_user_id: UserId) -> Result<Vec<Rating>, Self::Error>;

    /// Whether a rating for the (rater, rated) pair exists
    fn has_rating(&self, rater_id: UserId, rated_user_id: UserId)
        -> Result<bool, Self::Error>;
}

/// Read access to posts, owned by the posting flows
pub trait PostStore {
    /// Error type for store operations
    type Error;

    /// Get a post by ID
    fn get_post(&self, id: PostId) -> Result<Option<Post>, Self::Error>;
}

/// Read access to user profiles, owned by the account flows
pub trait ProfileStore {
    /// Error type for store operations
    type Error;

    /// Get a profile by ID
    fn get_profile(&self, id: UserId) -> Result<Option<Profile>, Self::Error>;
}

/// Fire-and-forget delivery of owner notifications
///
/// Implementations must never block the caller and must contain their own
/// failures: claim creation has already committed by the time this is
/// invoked, and a delivery problem must not surface through it.
pub trait ClaimNotifier {
    /// Enqueue a notification for best-effort delivery
    fn notify_owner_of_claim(&self, notification: ClaimNotification);
}
