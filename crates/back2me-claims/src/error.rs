//! Claim registry error types

use back2me_domain::ClaimStatus;
use thiserror::Error;

/// Errors that can occur during claim operations
///
/// None of these are fatal: every variant is a per-request failure returned
/// to the caller. Notification problems never appear here at all; they are
/// logged and swallowed past the point where the claim has committed.
#[derive(Error, Debug)]
pub enum ClaimError {
    /// Malformed input, rejected before any mutation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The claimant owns the post; owners cannot claim their own items
    #[error("Post owners cannot file a claim on their own post")]
    InvalidClaimant,

    /// The actor does not own the post the claim was filed against
    #[error("Only the post owner may decide this claim")]
    Unauthorized,

    /// The claim already reached a terminal status
    #[error("Claim is already {current}; no further transition is permitted")]
    InvalidTransition {
        /// The status the claim currently holds
        current: ClaimStatus,
    },

    /// No post with the given id exists
    #[error("Post not found")]
    PostNotFound,

    /// No claim with the given id exists
    #[error("Claim not found")]
    ClaimNotFound,

    /// Store error during a claim operation
    #[error("Store error: {0}")]
    Store(String),
}
