//! Back2Me Reputation Aggregator
//!
//! Owns rating records and the derived reputation score:
//! - Rating submission with self-rating and duplicate-pair prevention
//! - On-demand recomputation of a user's average and count
//! - The has-rated probe callers use to decide whether to offer rating
//!
//! # Examples
//!
//! ```no_run
//! use back2me_reputation::ReputationAggregator;
//!
//! let aggregator = ReputationAggregator::new();
//!
//! // let rating = aggregator.submit_rating(&mut store, rater, rated, 5, None, None)?;
//! // let reputation = aggregator.get_reputation(&store, rated)?;
//! ```

#![warn(missing_docs)]

mod aggregator;
mod error;

pub use aggregator::ReputationAggregator;
pub use error::RatingError;
