//! Authorization guards - pure decision functions over explicit actor ids
//!
//! Every operation in this core takes the acting user's id as an explicit
//! parameter, so these decisions stay pure and testable without a simulated
//! session. They are consulted in application logic before any mutation,
//! regardless of what the storage layer also enforces.

use crate::ids::UserId;
use crate::post::Post;

/// Whether `actor_id` may see every claim filed against `post`
///
/// Only the post owner sees the full list; everyone else is scoped down to
/// their own claims.
pub fn can_view_all_claims(actor_id: UserId, post: &Post) -> bool {
    actor_id == post.owner_id
}

/// Whether `actor_id` may accept or reject a claim on `post`
pub fn can_transition_claim(actor_id: UserId, post: &Post) -> bool {
    actor_id == post.owner_id
}

/// Whether `rater_id` may leave a rating for `rated_user_id`
///
/// Self-rating is never allowed, and a pair that already has a rating may
/// not receive another.
pub fn can_rate(rater_id: UserId, rated_user_id: UserId, existing_rating: bool) -> bool {
    rater_id != rated_user_id && !existing_rating
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::PostId;

    fn post_owned_by(owner_id: UserId) -> Post {
        Post {
            id: PostId::new(),
            owner_id,
            title: "Blue backpack".to_string(),
        }
    }

    #[test]
    fn test_owner_sees_all_claims() {
        let owner = UserId::new();
        let post = post_owned_by(owner);

        assert!(can_view_all_claims(owner, &post));
        assert!(!can_view_all_claims(UserId::new(), &post));
    }

    #[test]
    fn test_only_owner_transitions() {
        let owner = UserId::new();
        let post = post_owned_by(owner);

        assert!(can_transition_claim(owner, &post));
        assert!(!can_transition_claim(UserId::new(), &post));
    }

    #[test]
    fn test_self_rating_denied() {
        let user = UserId::new();
        assert!(!can_rate(user, user, false));
        assert!(!can_rate(user, user, true));
    }

    #[test]
    fn test_repeat_rating_denied() {
        let rater = UserId::new();
        let rated = UserId::new();

        assert!(can_rate(rater, rated, false));
        assert!(!can_rate(rater, rated, true));
    }
}
