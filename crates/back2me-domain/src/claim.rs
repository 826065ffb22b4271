//! Claim module - a request asserting a relationship to a post

use crate::ids::{ClaimId, PostId, UserId};
use std::fmt;

/// Lifecycle status of a claim
///
/// A claim starts `Pending` and transitions at most once, to `Accepted` or
/// `Rejected`. Both are terminal: no further transition is permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClaimStatus {
    /// Awaiting a decision from the post owner
    Pending,

    /// Approved by the post owner (terminal)
    Accepted,

    /// Declined by the post owner (terminal)
    Rejected,
}

impl ClaimStatus {
    /// Get the status name as the persisted literal string
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "pending",
            ClaimStatus::Accepted => "accepted",
            ClaimStatus::Rejected => "rejected",
        }
    }

    /// Parse a status from its persisted literal
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ClaimStatus::Pending),
            "accepted" => Some(ClaimStatus::Accepted),
            "rejected" => Some(ClaimStatus::Rejected),
            _ => None,
        }
    }

    /// Whether this status admits no further transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, ClaimStatus::Accepted | ClaimStatus::Rejected)
    }
}

impl std::str::FromStr for ClaimStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid claim status: {}", s))
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A claim filed by a non-owner against a post
///
/// Claims reference their post and claimant by id only; ownership of the
/// referenced records stays with the posting and account flows. Once a claim
/// reaches a terminal status it is immutable except for read access.
#[derive(Debug, Clone, PartialEq)]
pub struct Claim {
    /// Unique identifier
    pub id: ClaimId,

    /// The post this claim is filed against
    pub post_id: PostId,

    /// The user who filed the claim
    pub claimer_id: UserId,

    /// Free-text explanation of why the item belongs to the claimant
    pub message: String,

    /// Current lifecycle status
    pub status: ClaimStatus,

    /// When this claim was created (seconds since Unix epoch)
    pub created_at: u64,
}

impl Claim {
    /// Create a new pending claim
    ///
    /// Every claim enters the system as `Pending`; the only mutation path
    /// afterwards is the store's conditional transition.
    pub fn new(
        id: ClaimId,
        post_id: PostId,
        claimer_id: UserId,
        message: String,
        created_at: u64,
    ) -> Self {
        Self {
            id,
            post_id,
            claimer_id,
            message,
            status: ClaimStatus::Pending,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_literals_roundtrip() {
        for status in [ClaimStatus::Pending, ClaimStatus::Accepted, ClaimStatus::Rejected] {
            assert_eq!(ClaimStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_status_parse_rejects_unknown() {
        assert_eq!(ClaimStatus::parse("approved"), None);
        assert_eq!(ClaimStatus::parse(""), None);
        assert_eq!(ClaimStatus::parse("PENDING"), None);
    }

    #[test]
    fn test_terminality() {
        assert!(!ClaimStatus::Pending.is_terminal());
        assert!(ClaimStatus::Accepted.is_terminal());
        assert!(ClaimStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_new_claim_is_pending() {
        let claim = Claim::new(
            ClaimId::new(),
            PostId::new(),
            UserId::new(),
            "I lost this near the station".to_string(),
            1234567890,
        );

        assert_eq!(claim.status, ClaimStatus::Pending);
    }
}
