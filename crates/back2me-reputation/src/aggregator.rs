//! Rating submission and reputation computation

use crate::RatingError;
use back2me_domain::traits::{RatingInsert, RatingStore};
use back2me_domain::{auth, ClaimId, Rating, RatingId, Reputation, Stars, UserId};
use std::fmt::Display;
use std::time::{SystemTime, UNIX_EPOCH};

/// The ReputationAggregator owns rating records and the derived score
///
/// The aggregate is never cached: every read recomputes from the stored
/// rows, so it cannot drift from its inputs.
#[derive(Debug, Default)]
pub struct ReputationAggregator;

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

impl ReputationAggregator {
    /// Create a new aggregator
    pub fn new() -> Self {
        Self
    }

    /// Submit a rating from one user about another
    ///
    /// Fails with [`RatingError::SelfRating`] when rater and rated match,
    /// [`RatingError::Validation`] for out-of-range stars, and
    /// [`RatingError::DuplicateRating`] when the (rater, rated) pair
    /// already has a rating. The duplicate check runs here before the
    /// insert, and the store's uniqueness constraint backs it up: a
    /// concurrent submission losing that race surfaces as
    /// [`RatingError::DuplicateRating`] too, never as an overwrite.
    pub fn submit_rating<S>(
        &self,
        store: &mut S,
        rater_id: UserId,
        rated_user_id: UserId,
        stars: u8,
        comment: Option<String>,
        claim_id: Option<ClaimId>,
    ) -> Result<Rating, RatingError>
    where
        S: RatingStore,
        S::Error: Display,
    {
        if rater_id == rated_user_id {
            return Err(RatingError::SelfRating);
        }

        let stars = Stars::new(stars).ok_or_else(|| {
            RatingError::Validation(format!(
                "Stars must be between {} and {}",
                Stars::MIN,
                Stars::MAX
            ))
        })?;

        let existing = store
            .has_rating(rater_id, rated_user_id)
            .map_err(|e| RatingError::Store(format!("Failed to check for rating: {}", e)))?;
        if existing {
            return Err(RatingError::DuplicateRating);
        }
        debug_assert!(auth::can_rate(rater_id, rated_user_id, existing));

        let comment = comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        let rating = Rating {
            id: RatingId::new(),
            rater_user_id: rater_id,
            rated_user_id,
            stars,
            comment,
            claim_id,
            created_at: unix_now(),
        };

        let outcome = store
            .insert_rating(rating.clone())
            .map_err(|e| RatingError::Store(format!("Failed to persist rating: {}", e)))?;

        match outcome {
            RatingInsert::Inserted(_) => Ok(rating),
            RatingInsert::DuplicatePair => Err(RatingError::DuplicateRating),
        }
    }

    /// Recompute a user's reputation from the stored ratings
    ///
    /// Returns the unrated aggregate (average 0.0, count 0) when no
    /// ratings exist.
    pub fn get_reputation<S>(&self, store: &S, user_id: UserId) -> Result<Reputation, RatingError>
    where
        S: RatingStore,
        S::Error: Display,
    {
        let ratings = store
            .ratings_for_user(user_id)
            .map_err(|e| RatingError::Store(format!("Failed to load ratings: {}", e)))?;

        Ok(Reputation::from_stars(ratings.into_iter().map(|r| r.stars)))
    }

    /// Whether a rating by `rater_id` for `rated_user_id` exists
    pub fn has_rated<S>(
        &self,
        store: &S,
        rater_id: UserId,
        rated_user_id: UserId,
    ) -> Result<bool, RatingError>
    where
        S: RatingStore,
        S::Error: Display,
    {
        store
            .has_rating(rater_id, rated_user_id)
            .map_err(|e| RatingError::Store(format!("Failed to check for rating: {}", e)))
    }

    /// Whether `rater_id` is currently allowed to rate `rated_user_id`
    ///
    /// The answer callers use to decide whether to offer the rating
    /// action at all.
    pub fn can_rate<S>(
        &self,
        store: &S,
        rater_id: UserId,
        rated_user_id: UserId,
    ) -> Result<bool, RatingError>
    where
        S: RatingStore,
        S::Error: Display,
    {
        let existing = self.has_rated(store, rater_id, rated_user_id)?;
        Ok(auth::can_rate(rater_id, rated_user_id, existing))
    }
}
