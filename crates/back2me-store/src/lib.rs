//! Back2Me Storage Layer
//!
//! Implements the ClaimStore, RatingStore, PostStore, and ProfileStore
//! traits using SQLite.
//!
//! # Architecture
//!
//! - SQLite for all persisted records (claims, ratings, posts, profiles)
//! - Claim transitions are a single conditional UPDATE, so concurrent
//!   attempts are serialized by the database and only the first applies
//! - Rating pair uniqueness is a UNIQUE constraint; the losing writer of a
//!   race gets a typed duplicate outcome, never a silent overwrite
//!
//! # Examples
//!
//! ```no_run
//! use back2me_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for claim and rating operations
//! ```

#![warn(missing_docs)]

use back2me_domain::traits::{
    ClaimStore, PostStore, ProfileStore, RatingInsert, RatingStore, TransitionOutcome,
};
use back2me_domain::{Claim, ClaimId, ClaimStatus, Post, PostId, Profile, Rating, RatingId, UserId};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// SQLite-based implementation of the persistence seams
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own
/// SqliteStore instance, or access must be serialized by the caller.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use back2me_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("back2me.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Convert an id's raw value to bytes for storage
    fn id_to_bytes(value: u128) -> Vec<u8> {
        value.to_be_bytes().to_vec()
    }

    /// Convert stored bytes back to an id's raw value
    fn bytes_to_id(bytes: &[u8]) -> Result<u128, StoreError> {
        if bytes.len() != 16 {
            return Err(StoreError::InvalidData(format!(
                "Expected 16 bytes for id, got {}",
                bytes.len()
            )));
        }
        let mut arr = [0u8; 16];
        arr.copy_from_slice(bytes);
        Ok(u128::from_be_bytes(arr))
    }

    fn column_id(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<u128> {
        let bytes: Vec<u8> = row.get(idx)?;
        Self::bytes_to_id(&bytes).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Blob, Box::new(e))
        })
    }

    fn row_to_claim(row: &rusqlite::Row<'_>) -> rusqlite::Result<Claim> {
        let status_str: String = row.get(4)?;
        let status = ClaimStatus::parse(&status_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                4,
                rusqlite::types::Type::Text,
                Box::new(StoreError::InvalidData(format!(
                    "Unknown claim status: {}",
                    status_str
                ))),
            )
        })?;

        Ok(Claim {
            id: ClaimId::from_value(Self::column_id(row, 0)?),
            post_id: PostId::from_value(Self::column_id(row, 1)?),
            claimer_id: UserId::from_value(Self::column_id(row, 2)?),
            message: row.get(3)?,
            status,
            created_at: row.get::<_, i64>(5)? as u64,
        })
    }

    fn row_to_rating(row: &rusqlite::Row<'_>) -> rusqlite::Result<Rating> {
        let stars_raw: i64 = row.get(3)?;
        let stars = u8::try_from(stars_raw)
            .ok()
            .and_then(back2me_domain::Stars::new)
            .ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    3,
                    rusqlite::types::Type::Integer,
                    Box::new(StoreError::InvalidData(format!(
                        "Stars out of range: {}",
                        stars_raw
                    ))),
                )
            })?;

        let claim_id_bytes: Option<Vec<u8>> = row.get(5)?;
        let claim_id = match claim_id_bytes {
            Some(bytes) => Some(ClaimId::from_value(Self::bytes_to_id(&bytes).map_err(
                |e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        5,
                        rusqlite::types::Type::Blob,
                        Box::new(e),
                    )
                },
            )?)),
            None => None,
        };

        Ok(Rating {
            id: RatingId::from_value(Self::column_id(row, 0)?),
            rater_user_id: UserId::from_value(Self::column_id(row, 1)?),
            rated_user_id: UserId::from_value(Self::column_id(row, 2)?),
            stars,
            comment: row.get(4)?,
            claim_id,
            created_at: row.get::<_, i64>(6)? as u64,
        })
    }

    /// Insert a post record
    ///
    /// Posts are owned by the posting flows; this exists for those flows
    /// and for seeding test fixtures, not for the claim workflow.
    pub fn insert_post(&mut self, post: &Post) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO posts (id, owner_id, title) VALUES (?1, ?2, ?3)",
            params![
                Self::id_to_bytes(post.id.value()),
                Self::id_to_bytes(post.owner_id.value()),
                &post.title,
            ],
        )?;
        Ok(())
    }

    /// Insert or replace a profile record
    ///
    /// Profiles are owned by the account flows; this exists for those
    /// flows and for seeding test fixtures, not for the claim workflow.
    pub fn upsert_profile(&mut self, profile: &Profile) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO profiles (id, display_name, avatar_ref, email)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
             display_name = excluded.display_name,
             avatar_ref = excluded.avatar_ref,
             email = excluded.email",
            params![
                Self::id_to_bytes(profile.id.value()),
                &profile.display_name,
                &profile.avatar_ref,
                &profile.email,
            ],
        )?;
        Ok(())
    }
}

impl ClaimStore for SqliteStore {
    type Error = StoreError;

    fn insert_claim(&mut self, claim: Claim) -> Result<ClaimId, Self::Error> {
        self.conn.execute(
            "INSERT INTO claims (id, post_id, claimer_id, message, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                Self::id_to_bytes(claim.id.value()),
                Self::id_to_bytes(claim.post_id.value()),
                Self::id_to_bytes(claim.claimer_id.value()),
                &claim.message,
                claim.status.as_str(),
                claim.created_at as i64,
            ],
        )?;

        Ok(claim.id)
    }

    fn get_claim(&self, id: ClaimId) -> Result<Option<Claim>, Self::Error> {
        let claim = self
            .conn
            .query_row(
                "SELECT id, post_id, claimer_id, message, status, created_at
                 FROM claims WHERE id = ?1",
                params![Self::id_to_bytes(id.value())],
                Self::row_to_claim,
            )
            .optional()?;

        Ok(claim)
    }

    fn transition_claim(
        &mut self,
        id: ClaimId,
        new_status: ClaimStatus,
    ) -> Result<TransitionOutcome, Self::Error> {
        if !new_status.is_terminal() {
            return Err(StoreError::InvalidData(format!(
                "Transition target must be terminal, got: {}",
                new_status
            )));
        }

        let id_bytes = Self::id_to_bytes(id.value());

        // Optimistic: the status only applies while the claim is still
        // pending, so a second concurrent attempt updates zero rows.
        let updated = self.conn.execute(
            "UPDATE claims SET status = ?2 WHERE id = ?1 AND status = 'pending'",
            params![&id_bytes, new_status.as_str()],
        )?;

        if updated == 1 {
            let claim = self.get_claim(id)?.ok_or_else(|| {
                StoreError::InvalidData(format!("Claim disappeared after transition: {}", id))
            })?;
            return Ok(TransitionOutcome::Applied(claim));
        }

        match self.get_claim(id)? {
            Some(existing) => Ok(TransitionOutcome::NotPending(existing.status)),
            None => Ok(TransitionOutcome::NotFound),
        }
    }

    fn claims_for_post(&self, post_id: PostId) -> Result<Vec<Claim>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, post_id, claimer_id, message, status, created_at
             FROM claims WHERE post_id = ?1
             ORDER BY created_at DESC, id DESC",
        )?;

        let claims = stmt
            .query_map(params![Self::id_to_bytes(post_id.value())], Self::row_to_claim)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(claims)
    }

    fn claims_for_post_by_claimer(
        &self,
        post_id: PostId,
        claimer_id: UserId,
    ) -> Result<Vec<Claim>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, post_id, claimer_id, message, status, created_at
             FROM claims WHERE post_id = ?1 AND claimer_id = ?2
             ORDER BY created_at DESC, id DESC",
        )?;

        let claims = stmt
            .query_map(
                params![
                    Self::id_to_bytes(post_id.value()),
                    Self::id_to_bytes(claimer_id.value())
                ],
                Self::row_to_claim,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(claims)
    }
}

impl RatingStore for SqliteStore {
    type Error = StoreError;

    fn insert_rating(&mut self, rating: Rating) -> Result<RatingInsert, Self::Error> {
        let result = self.conn.execute(
            "INSERT INTO ratings
             (id, rater_user_id, rated_user_id, stars, comment, claim_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                Self::id_to_bytes(rating.id.value()),
                Self::id_to_bytes(rating.rater_user_id.value()),
                Self::id_to_bytes(rating.rated_user_id.value()),
                i64::from(rating.stars.value()),
                &rating.comment,
                rating.claim_id.map(|c| Self::id_to_bytes(c.value())),
                rating.created_at as i64,
            ],
        );

        match result {
            Ok(_) => Ok(RatingInsert::Inserted(rating.id)),
            // The UNIQUE(rater_user_id, rated_user_id) constraint is the
            // serialization point for concurrent submissions of the same
            // pair; the loser surfaces as a typed conflict.
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Ok(RatingInsert::DuplicatePair)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn ratings_for_user(&self, rated_user_id: UserId) -> Result<Vec<Rating>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, rater_user_id, rated_user_id, stars, comment, claim_id, created_at
             FROM ratings WHERE rated_user_id = ?1
             ORDER BY created_at DESC, id DESC",
        )?;

        let ratings = stmt
            .query_map(
                params![Self::id_to_bytes(rated_user_id.value())],
                Self::row_to_rating,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ratings)
    }

    fn has_rating(
        &self,
        rater_id: UserId,
        rated_user_id: UserId,
    ) -> Result<bool, Self::Error> {
        let exists: bool = self
            .conn
            .query_row(
                "SELECT 1 FROM ratings WHERE rater_user_id = ?1 AND rated_user_id = ?2",
                params![
                    Self::id_to_bytes(rater_id.value()),
                    Self::id_to_bytes(rated_user_id.value())
                ],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);

        Ok(exists)
    }
}

impl PostStore for SqliteStore {
    type Error = StoreError;

    fn get_post(&self, id: PostId) -> Result<Option<Post>, Self::Error> {
        let post = self
            .conn
            .query_row(
                "SELECT id, owner_id, title FROM posts WHERE id = ?1",
                params![Self::id_to_bytes(id.value())],
                |row| {
                    Ok(Post {
                        id: PostId::from_value(Self::column_id(row, 0)?),
                        owner_id: UserId::from_value(Self::column_id(row, 1)?),
                        title: row.get(2)?,
                    })
                },
            )
            .optional()?;

        Ok(post)
    }
}

impl ProfileStore for SqliteStore {
    type Error = StoreError;

    fn get_profile(&self, id: UserId) -> Result<Option<Profile>, Self::Error> {
        let profile = self
            .conn
            .query_row(
                "SELECT id, display_name, avatar_ref, email FROM profiles WHERE id = ?1",
                params![Self::id_to_bytes(id.value())],
                |row| {
                    Ok(Profile {
                        id: UserId::from_value(Self::column_id(row, 0)?),
                        display_name: row.get(1)?,
                        avatar_ref: row.get(2)?,
                        email: row.get(3)?,
                    })
                },
            )
            .optional()?;

        Ok(profile)
    }
}
