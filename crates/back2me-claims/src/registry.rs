//! Claim lifecycle logic

use crate::{ClaimConfig, ClaimError};
use back2me_domain::traits::{
    ClaimNotifier, ClaimStore, PostStore, ProfileStore, TransitionOutcome,
};
use back2me_domain::{auth, Claim, ClaimId, ClaimNotification, ClaimStatus, PostId, UserId};
use std::fmt::Display;
use std::time::{SystemTime, UNIX_EPOCH};

/// The ClaimRegistry owns claim records and their state machine
///
/// Operations take the acting user's id explicitly and the store as a
/// generic argument; the registry itself holds only configuration and the
/// optional notification seam.
pub struct ClaimRegistry {
    config: ClaimConfig,
    notifier: Option<Box<dyn ClaimNotifier + Send + Sync>>,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

impl ClaimRegistry {
    /// Create a new registry with the given configuration
    pub fn new(config: ClaimConfig) -> Self {
        Self {
            config,
            notifier: None,
        }
    }

    /// Create a registry with default configuration
    pub fn default_config() -> Self {
        Self::new(ClaimConfig::default())
    }

    /// Attach a notification seam for owner alerts on new claims
    pub fn with_notifier(mut self, notifier: Box<dyn ClaimNotifier + Send + Sync>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// File a claim against a post
    ///
    /// Fails with [`ClaimError::InvalidClaimant`] when the claimant owns the
    /// post, and with [`ClaimError::Validation`] when the message is empty
    /// or too long. On success the pending claim is persisted and returned,
    /// and an owner notification is scheduled best-effort: a lookup or
    /// enqueue problem is logged and never fails the call, because the
    /// claim has already committed.
    pub fn create_claim<S>(
        &self,
        store: &mut S,
        claimant_id: UserId,
        post_id: PostId,
        message: &str,
    ) -> Result<Claim, ClaimError>
    where
        S: ClaimStore + PostStore + ProfileStore,
        <S as ClaimStore>::Error: Display,
        <S as PostStore>::Error: Display,
        <S as ProfileStore>::Error: Display,
    {
        let message = message.trim();
        if message.is_empty() {
            return Err(ClaimError::Validation("Claim message is empty".to_string()));
        }
        if message.chars().count() > self.config.max_message_len {
            return Err(ClaimError::Validation(format!(
                "Claim message exceeds {} characters",
                self.config.max_message_len
            )));
        }

        let post = store
            .get_post(post_id)
            .map_err(|e| ClaimError::Store(format!("Failed to load post: {}", e)))?
            .ok_or(ClaimError::PostNotFound)?;

        if claimant_id == post.owner_id {
            return Err(ClaimError::InvalidClaimant);
        }

        let claim = Claim::new(
            ClaimId::new(),
            post_id,
            claimant_id,
            message.to_string(),
            unix_now(),
        );

        store
            .insert_claim(claim.clone())
            .map_err(|e| ClaimError::Store(format!("Failed to persist claim: {}", e)))?;

        // The claim has committed; everything below is best-effort.
        self.schedule_notification(store, &post.title, post.owner_id, claimant_id, message);

        Ok(claim)
    }

    /// Accept or reject a claim
    ///
    /// Only the owner of the claim's post may decide it, and only while the
    /// claim is still pending. The store applies the status conditionally,
    /// so of two concurrent attempts exactly one succeeds and the other
    /// observes [`ClaimError::InvalidTransition`].
    pub fn transition_claim<S>(
        &self,
        store: &mut S,
        actor_id: UserId,
        claim_id: ClaimId,
        new_status: ClaimStatus,
    ) -> Result<Claim, ClaimError>
    where
        S: ClaimStore + PostStore,
        <S as ClaimStore>::Error: Display,
        <S as PostStore>::Error: Display,
    {
        if !new_status.is_terminal() {
            return Err(ClaimError::Validation(format!(
                "Transition target must be accepted or rejected, got: {}",
                new_status
            )));
        }

        let claim = store
            .get_claim(claim_id)
            .map_err(|e| ClaimError::Store(format!("Failed to load claim: {}", e)))?
            .ok_or(ClaimError::ClaimNotFound)?;

        let post = store
            .get_post(claim.post_id)
            .map_err(|e| ClaimError::Store(format!("Failed to load post: {}", e)))?
            .ok_or(ClaimError::PostNotFound)?;

        if !auth::can_transition_claim(actor_id, &post) {
            return Err(ClaimError::Unauthorized);
        }

        let outcome = store
            .transition_claim(claim_id, new_status)
            .map_err(|e| ClaimError::Store(format!("Failed to transition claim: {}", e)))?;

        match outcome {
            TransitionOutcome::Applied(updated) => Ok(updated),
            TransitionOutcome::NotPending(current) => {
                Err(ClaimError::InvalidTransition { current })
            }
            TransitionOutcome::NotFound => Err(ClaimError::ClaimNotFound),
        }
    }

    /// List the claims on a post that a viewer is entitled to see
    ///
    /// The post owner sees every claim, newest first. Any other viewer sees
    /// only their own claims; a viewer with no claims on the post gets an
    /// empty list.
    pub fn list_claims_for_viewer<S>(
        &self,
        store: &S,
        viewer_id: UserId,
        post_id: PostId,
    ) -> Result<Vec<Claim>, ClaimError>
    where
        S: ClaimStore + PostStore,
        <S as ClaimStore>::Error: Display,
        <S as PostStore>::Error: Display,
    {
        let post = store
            .get_post(post_id)
            .map_err(|e| ClaimError::Store(format!("Failed to load post: {}", e)))?
            .ok_or(ClaimError::PostNotFound)?;

        let claims = if auth::can_view_all_claims(viewer_id, &post) {
            store.claims_for_post(post_id)
        } else {
            store.claims_for_post_by_claimer(post_id, viewer_id)
        }
        .map_err(|e| ClaimError::Store(format!("Failed to list claims: {}", e)))?;

        Ok(claims)
    }

    /// Resolve contact details and hand the payload to the notifier
    ///
    /// Must not fail the surrounding operation: every problem is logged and
    /// dropped here.
    fn schedule_notification<S>(
        &self,
        store: &S,
        post_title: &str,
        owner_id: UserId,
        claimant_id: UserId,
        message: &str,
    ) where
        S: ProfileStore,
        <S as ProfileStore>::Error: Display,
    {
        let Some(notifier) = &self.notifier else {
            return;
        };

        let owner = match store.get_profile(owner_id) {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                tracing::warn!(%owner_id, "Owner profile missing, skipping claim notification");
                return;
            }
            Err(e) => {
                tracing::error!(%owner_id, "Owner profile lookup failed: {}", e);
                return;
            }
        };

        let claimant = match store.get_profile(claimant_id) {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                tracing::warn!(%claimant_id, "Claimant profile missing, skipping claim notification");
                return;
            }
            Err(e) => {
                tracing::error!(%claimant_id, "Claimant profile lookup failed: {}", e);
                return;
            }
        };

        notifier.notify_owner_of_claim(ClaimNotification {
            owner_email: owner.email,
            owner_name: owner.display_name,
            claimer_name: claimant.display_name,
            claimer_email: claimant.email,
            post_title: post_title.to_string(),
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use back2me_domain::{Post, Profile};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    // Mock store for testing (in-memory)
    #[derive(Default)]
    struct MockStore {
        claims: Vec<Claim>,
        posts: HashMap<u128, Post>,
        profiles: HashMap<u128, Profile>,
    }

    impl MockStore {
        fn add_user(&mut self, name: &str) -> UserId {
            let id = UserId::new();
            self.profiles.insert(
                id.value(),
                Profile {
                    id,
                    display_name: name.to_string(),
                    avatar_ref: None,
                    email: format!("{}@example.com", name.to_lowercase()),
                },
            );
            id
        }

        fn add_post(&mut self, owner_id: UserId, title: &str) -> PostId {
            let id = PostId::new();
            self.posts.insert(
                id.value(),
                Post {
                    id,
                    owner_id,
                    title: title.to_string(),
                },
            );
            id
        }
    }

    impl ClaimStore for MockStore {
        type Error = String;

        fn insert_claim(&mut self, claim: Claim) -> Result<ClaimId, Self::Error> {
            let id = claim.id;
            self.claims.push(claim);
            Ok(id)
        }

        fn get_claim(&self, id: ClaimId) -> Result<Option<Claim>, Self::Error> {
            Ok(self.claims.iter().find(|c| c.id == id).cloned())
        }

        fn transition_claim(
            &mut self,
            id: ClaimId,
            new_status: ClaimStatus,
        ) -> Result<TransitionOutcome, Self::Error> {
            match self.claims.iter_mut().find(|c| c.id == id) {
                Some(claim) if claim.status == ClaimStatus::Pending => {
                    claim.status = new_status;
                    Ok(TransitionOutcome::Applied(claim.clone()))
                }
                Some(claim) => Ok(TransitionOutcome::NotPending(claim.status)),
                None => Ok(TransitionOutcome::NotFound),
            }
        }

        fn claims_for_post(&self, post_id: PostId) -> Result<Vec<Claim>, Self::Error> {
            let mut claims: Vec<Claim> = self
                .claims
                .iter()
                .filter(|c| c.post_id == post_id)
                .cloned()
                .collect();
            claims.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            Ok(claims)
        }

        fn claims_for_post_by_claimer(
            &self,
            post_id: PostId,
            claimer_id: UserId,
        ) -> Result<Vec<Claim>, Self::Error> {
            Ok(self
                .claims_for_post(post_id)?
                .into_iter()
                .filter(|c| c.claimer_id == claimer_id)
                .collect())
        }
    }

    impl PostStore for MockStore {
        type Error = String;

        fn get_post(&self, id: PostId) -> Result<Option<Post>, Self::Error> {
            Ok(self.posts.get(&id.value()).cloned())
        }
    }

    impl ProfileStore for MockStore {
        type Error = String;

        fn get_profile(&self, id: UserId) -> Result<Option<Profile>, Self::Error> {
            Ok(self.profiles.get(&id.value()).cloned())
        }
    }

    // Notifier that records payloads instead of delivering them
    #[derive(Clone, Default)]
    struct RecordingNotifier {
        sent: Arc<Mutex<Vec<ClaimNotification>>>,
    }

    impl ClaimNotifier for RecordingNotifier {
        fn notify_owner_of_claim(&self, notification: ClaimNotification) {
            self.sent.lock().unwrap().push(notification);
        }
    }

    #[test]
    fn test_create_claim() {
        let mut store = MockStore::default();
        let owner = store.add_user("Alice");
        let claimer = store.add_user("Bob");
        let post = store.add_post(owner, "Found wallet");

        let registry = ClaimRegistry::default_config();
        let claim = registry
            .create_claim(&mut store, claimer, post, "It has my photo inside")
            .unwrap();

        assert_eq!(claim.status, ClaimStatus::Pending);
        assert_eq!(claim.claimer_id, claimer);
        assert_eq!(store.claims.len(), 1);
    }

    #[test]
    fn test_owner_cannot_claim_own_post() {
        let mut store = MockStore::default();
        let owner = store.add_user("Alice");
        let post = store.add_post(owner, "Found wallet");

        let registry = ClaimRegistry::default_config();
        let result = registry.create_claim(&mut store, owner, post, "mine");

        assert!(matches!(result, Err(ClaimError::InvalidClaimant)));
        assert!(store.claims.is_empty(), "Nothing may be persisted");
    }

    #[test]
    fn test_empty_message_rejected() {
        let mut store = MockStore::default();
        let owner = store.add_user("Alice");
        let claimer = store.add_user("Bob");
        let post = store.add_post(owner, "Found wallet");

        let registry = ClaimRegistry::default_config();
        for message in ["", "   ", "\n\t"] {
            let result = registry.create_claim(&mut store, claimer, post, message);
            assert!(matches!(result, Err(ClaimError::Validation(_))));
        }
    }

    #[test]
    fn test_oversized_message_rejected() {
        let mut store = MockStore::default();
        let owner = store.add_user("Alice");
        let claimer = store.add_user("Bob");
        let post = store.add_post(owner, "Found wallet");

        let registry = ClaimRegistry::default_config();
        let message = "x".repeat(2001);
        let result = registry.create_claim(&mut store, claimer, post, &message);

        assert!(matches!(result, Err(ClaimError::Validation(_))));
    }

    #[test]
    fn test_claim_on_missing_post() {
        let mut store = MockStore::default();
        let claimer = store.add_user("Bob");

        let registry = ClaimRegistry::default_config();
        let result = registry.create_claim(&mut store, claimer, PostId::new(), "mine");

        assert!(matches!(result, Err(ClaimError::PostNotFound)));
    }

    #[test]
    fn test_notification_scheduled_with_profile_data() {
        let mut store = MockStore::default();
        let owner = store.add_user("Alice");
        let claimer = store.add_user("Bob");
        let post = store.add_post(owner, "Found wallet");

        let notifier = RecordingNotifier::default();
        let registry =
            ClaimRegistry::default_config().with_notifier(Box::new(notifier.clone()));

        registry
            .create_claim(&mut store, claimer, post, "It has my photo inside")
            .unwrap();

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].owner_email, "alice@example.com");
        assert_eq!(sent[0].claimer_name, "Bob");
        assert_eq!(sent[0].post_title, "Found wallet");
        assert_eq!(sent[0].message, "It has my photo inside");
    }

    #[test]
    fn test_missing_profile_does_not_fail_claim() {
        let mut store = MockStore::default();
        let owner = store.add_user("Alice");
        let post = store.add_post(owner, "Found wallet");

        // Claimant has no profile record
        let claimer = UserId::new();

        let notifier = RecordingNotifier::default();
        let registry =
            ClaimRegistry::default_config().with_notifier(Box::new(notifier.clone()));

        let claim = registry
            .create_claim(&mut store, claimer, post, "It has my photo inside")
            .unwrap();

        assert_eq!(claim.status, ClaimStatus::Pending);
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_owner_transitions_claim() {
        let mut store = MockStore::default();
        let owner = store.add_user("Alice");
        let claimer = store.add_user("Bob");
        let post = store.add_post(owner, "Found wallet");

        let registry = ClaimRegistry::default_config();
        let claim = registry
            .create_claim(&mut store, claimer, post, "mine")
            .unwrap();

        let updated = registry
            .transition_claim(&mut store, owner, claim.id, ClaimStatus::Accepted)
            .unwrap();
        assert_eq!(updated.status, ClaimStatus::Accepted);
    }

    #[test]
    fn test_non_owner_cannot_transition() {
        let mut store = MockStore::default();
        let owner = store.add_user("Alice");
        let claimer = store.add_user("Bob");
        let post = store.add_post(owner, "Found wallet");

        let registry = ClaimRegistry::default_config();
        let claim = registry
            .create_claim(&mut store, claimer, post, "mine")
            .unwrap();

        // Neither the claimant nor a stranger may decide the claim
        for actor in [claimer, store.add_user("Carol")] {
            let result =
                registry.transition_claim(&mut store, actor, claim.id, ClaimStatus::Accepted);
            assert!(matches!(result, Err(ClaimError::Unauthorized)));
        }
    }

    #[test]
    fn test_second_transition_fails() {
        let mut store = MockStore::default();
        let owner = store.add_user("Alice");
        let claimer = store.add_user("Bob");
        let post = store.add_post(owner, "Found wallet");

        let registry = ClaimRegistry::default_config();
        let claim = registry
            .create_claim(&mut store, claimer, post, "mine")
            .unwrap();

        registry
            .transition_claim(&mut store, owner, claim.id, ClaimStatus::Accepted)
            .unwrap();

        let result =
            registry.transition_claim(&mut store, owner, claim.id, ClaimStatus::Rejected);
        match result {
            Err(ClaimError::InvalidTransition { current }) => {
                assert_eq!(current, ClaimStatus::Accepted);
            }
            other => panic!("Expected InvalidTransition, got {:?}", other.map(|c| c.status)),
        }

        // Status is unchanged
        let stored = store.get_claim(claim.id).unwrap().unwrap();
        assert_eq!(stored.status, ClaimStatus::Accepted);
    }

    #[test]
    fn test_pending_is_not_a_transition_target() {
        let mut store = MockStore::default();
        let owner = store.add_user("Alice");
        let claimer = store.add_user("Bob");
        let post = store.add_post(owner, "Found wallet");

        let registry = ClaimRegistry::default_config();
        let claim = registry
            .create_claim(&mut store, claimer, post, "mine")
            .unwrap();

        let result =
            registry.transition_claim(&mut store, owner, claim.id, ClaimStatus::Pending);
        assert!(matches!(result, Err(ClaimError::Validation(_))));
    }

    #[test]
    fn test_listing_scoped_by_viewer() {
        let mut store = MockStore::default();
        let owner = store.add_user("Alice");
        let claimer = store.add_user("Bob");
        let stranger = store.add_user("Carol");
        let post = store.add_post(owner, "Found wallet");

        let registry = ClaimRegistry::default_config();
        let claim = registry
            .create_claim(&mut store, claimer, post, "mine")
            .unwrap();

        let owner_view = registry
            .list_claims_for_viewer(&store, owner, post)
            .unwrap();
        assert_eq!(owner_view, vec![claim.clone()]);

        let claimer_view = registry
            .list_claims_for_viewer(&store, claimer, post)
            .unwrap();
        assert_eq!(claimer_view, vec![claim]);

        let stranger_view = registry
            .list_claims_for_viewer(&store, stranger, post)
            .unwrap();
        assert!(stranger_view.is_empty());
    }

    #[test]
    fn test_claimer_does_not_see_other_claims() {
        let mut store = MockStore::default();
        let owner = store.add_user("Alice");
        let bob = store.add_user("Bob");
        let carol = store.add_user("Carol");
        let post = store.add_post(owner, "Found wallet");

        let registry = ClaimRegistry::default_config();
        registry.create_claim(&mut store, bob, post, "mine").unwrap();
        registry
            .create_claim(&mut store, carol, post, "no, mine")
            .unwrap();

        let owner_view = registry
            .list_claims_for_viewer(&store, owner, post)
            .unwrap();
        assert_eq!(owner_view.len(), 2);

        let bob_view = registry.list_claims_for_viewer(&store, bob, post).unwrap();
        assert_eq!(bob_view.len(), 1);
        assert_eq!(bob_view[0].claimer_id, bob);
    }
}
