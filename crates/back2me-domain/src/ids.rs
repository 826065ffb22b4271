//! Identifier newtypes backed by UUIDv7
//!
//! UUIDv7 provides:
//! - Chronological sortability for temporal queries
//! - 128-bit uniqueness
//! - RFC 9562-standard format with broad ecosystem support
//! - No coordination required for distributed generation
//!
//! User and post identifiers are assigned by the account and posting flows;
//! claim and rating identifiers are generated by this core. All four share
//! the same representation so that stores can persist them uniformly.

use std::fmt;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u128);

        impl $name {
            /// Generate a new UUIDv7-based identifier
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7().as_u128())
            }

            /// Create an identifier from a raw u128 value
            ///
            /// This is primarily for storage layer deserialization.
            pub fn from_value(value: u128) -> Self {
                Self(value)
            }

            /// Parse an identifier from a UUID string
            pub fn from_string(s: &str) -> Result<Self, String> {
                uuid::Uuid::parse_str(s)
                    .map(|u| Self(u.as_u128()))
                    .map_err(|e| format!("Invalid UUID string: {}", e))
            }

            /// Get the raw u128 value
            pub fn value(&self) -> u128 {
                self.0
            }

            /// Get the timestamp component of the UUIDv7 (milliseconds since Unix epoch)
            pub fn timestamp(&self) -> u64 {
                // UUIDv7: top 48 bits are Unix millisecond timestamp
                (self.0 >> 80) as u64
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", uuid::Uuid::from_u128(self.0))
            }
        }
    };
}

uuid_id! {
    /// Unique identifier for a claim
    ClaimId
}

uuid_id! {
    /// Unique identifier for a rating
    RatingId
}

uuid_id! {
    /// Identifier of a user profile, assigned by the account flows
    UserId
}

uuid_id! {
    /// Identifier of a post, assigned by the posting flows
    PostId
}
