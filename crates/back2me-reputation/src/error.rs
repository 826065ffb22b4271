//! Reputation aggregator error types

use thiserror::Error;

/// Errors that can occur during rating operations
#[derive(Error, Debug)]
pub enum RatingError {
    /// Malformed input, rejected before any mutation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The rater and the rated user are the same person
    #[error("Users cannot rate themselves")]
    SelfRating,

    /// A rating by this rater for this user already exists
    #[error("You have already rated this user")]
    DuplicateRating,

    /// Store error during a rating operation
    #[error("Store error: {0}")]
    Store(String),
}
