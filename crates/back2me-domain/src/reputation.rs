//! Reputation module - derived aggregate of ratings received
//!
//! Reputation is never stored; it is recomputed on demand from the rating
//! rows so that the aggregate can never drift from its inputs.

use crate::rating::Stars;

/// Aggregate reputation of a user
///
/// Plain arithmetic mean of the stars received, no weighting or decay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reputation {
    /// Mean star value across all ratings received; 0.0 when unrated
    pub average: f64,

    /// Number of ratings received
    pub count: usize,
}

impl Reputation {
    /// The reputation of a user with no ratings
    pub fn unrated() -> Self {
        Self { average: 0.0, count: 0 }
    }

    /// Compute the aggregate from the stars of all ratings received
    pub fn from_stars<I>(stars: I) -> Self
    where
        I: IntoIterator<Item = Stars>,
    {
        let mut sum: u64 = 0;
        let mut count: usize = 0;

        for s in stars {
            sum += u64::from(s.value());
            count += 1;
        }

        if count == 0 {
            return Self::unrated();
        }

        Self {
            average: sum as f64 / count as f64,
            count,
        }
    }
}

impl Default for Reputation {
    fn default() -> Self {
        Self::unrated()
    }
}
