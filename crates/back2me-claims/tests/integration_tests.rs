//! Integration tests for the claim registry over the SQLite store
//!
//! Exercises the registry end-to-end against real persistence: claim
//! creation, owner-only decisions, single-shot transitions, and
//! viewer-scoped listings.

use back2me_claims::{ClaimError, ClaimRegistry};
use back2me_domain::traits::ClaimStore;
use back2me_domain::{ClaimStatus, Post, PostId, Profile, UserId};
use back2me_store::SqliteStore;

fn seed_user(store: &mut SqliteStore, name: &str) -> UserId {
    let id = UserId::new();
    store
        .upsert_profile(&Profile {
            id,
            display_name: name.to_string(),
            avatar_ref: None,
            email: format!("{}@example.com", name.to_lowercase()),
        })
        .unwrap();
    id
}

fn seed_post(store: &mut SqliteStore, owner_id: UserId, title: &str) -> PostId {
    let id = PostId::new();
    store
        .insert_post(&Post {
            id,
            owner_id,
            title: title.to_string(),
        })
        .unwrap();
    id
}

#[test]
fn test_claim_lifecycle_over_sqlite() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let owner = seed_user(&mut store, "Alice");
    let claimer = seed_user(&mut store, "Bob");
    let post = seed_post(&mut store, owner, "Found wallet");

    let registry = ClaimRegistry::default_config();

    let claim = registry
        .create_claim(&mut store, claimer, post, "It has my photo inside")
        .unwrap();
    assert_eq!(claim.status, ClaimStatus::Pending);

    let accepted = registry
        .transition_claim(&mut store, owner, claim.id, ClaimStatus::Accepted)
        .unwrap();
    assert_eq!(accepted.status, ClaimStatus::Accepted);

    // A later attempt to reject must fail and leave the status alone
    let result = registry.transition_claim(&mut store, owner, claim.id, ClaimStatus::Rejected);
    assert!(matches!(
        result,
        Err(ClaimError::InvalidTransition {
            current: ClaimStatus::Accepted
        })
    ));

    let stored = store.get_claim(claim.id).unwrap().unwrap();
    assert_eq!(stored.status, ClaimStatus::Accepted);
}

#[test]
fn test_listing_scopes_over_sqlite() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let owner = seed_user(&mut store, "Alice");
    let bob = seed_user(&mut store, "Bob");
    let carol = seed_user(&mut store, "Carol");
    let post = seed_post(&mut store, owner, "Found wallet");

    let registry = ClaimRegistry::default_config();
    let bobs_claim = registry
        .create_claim(&mut store, bob, post, "Lost it on the 14 bus")
        .unwrap();

    // Owner and claimant both see the claim, a stranger sees nothing
    assert_eq!(
        registry.list_claims_for_viewer(&store, owner, post).unwrap(),
        vec![bobs_claim.clone()]
    );
    assert_eq!(
        registry.list_claims_for_viewer(&store, bob, post).unwrap(),
        vec![bobs_claim]
    );
    assert!(registry
        .list_claims_for_viewer(&store, carol, post)
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_unreachable_delivery_does_not_fail_claim() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let owner = seed_user(&mut store, "Alice");
    let claimer = seed_user(&mut store, "Bob");
    let post = seed_post(&mut store, owner, "Found wallet");

    // Delivery pointed at an unroutable address with a short timeout
    let mailer = back2me_notify::ResendMailer::new("re_test")
        .with_endpoint("http://127.0.0.1:1")
        .with_timeout(std::time::Duration::from_secs(1));
    let (handle, worker) = back2me_notify::notification_channel(mailer, 8);

    let registry = ClaimRegistry::default_config().with_notifier(Box::new(handle));
    let claim = registry
        .create_claim(&mut store, claimer, post, "It has my photo inside")
        .unwrap();
    assert_eq!(claim.status, ClaimStatus::Pending);

    // Dropping the registry closes the queue; the worker drains it,
    // swallows the failed delivery, and terminates cleanly.
    drop(registry);
    worker.run().await;

    let stored = store.get_claim(claim.id).unwrap().unwrap();
    assert_eq!(stored.status, ClaimStatus::Pending);
}

#[test]
fn test_owner_claim_rejected_over_sqlite() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let owner = seed_user(&mut store, "Alice");
    let post = seed_post(&mut store, owner, "Found wallet");

    let registry = ClaimRegistry::default_config();
    let result = registry.create_claim(&mut store, owner, post, "mine actually");

    assert!(matches!(result, Err(ClaimError::InvalidClaimant)));
    assert!(store.claims_for_post(post).unwrap().is_empty());
}
