//! Back2Me Claim Registry
//!
//! Owns claim records and enforces the claim state machine:
//! - Claim creation with claimant and message validation
//! - Owner-only transitions to the terminal accepted/rejected states
//! - Viewer-scoped claim listings (owner sees all, claimant sees own)
//! - Best-effort owner notification scheduling after a claim commits
//!
//! # Examples
//!
//! ```no_run
//! use back2me_claims::{ClaimRegistry, ClaimConfig};
//!
//! let registry = ClaimRegistry::new(ClaimConfig::default());
//!
//! // File a claim against a post
//! // let claim = registry.create_claim(&mut store, claimant_id, post_id, message)?;
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod registry;

pub use config::ClaimConfig;
pub use error::ClaimError;
pub use registry::ClaimRegistry;
