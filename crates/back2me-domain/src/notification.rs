//! Notification payload for owner alerts on new claims

/// The payload delivered to the post owner when a claim is filed
///
/// Every field originates from user input or profile records and must be
/// treated as untrusted: the delivery layer validates lengths and email
/// shape, and escapes all fields before embedding them in rendered output.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimNotification {
    /// Where the alert is delivered
    pub owner_email: String,

    /// Display name of the post owner, used in the salutation
    pub owner_name: String,

    /// Display name of the claimant
    pub claimer_name: String,

    /// Contact address of the claimant, so the owner can reply directly
    pub claimer_email: String,

    /// Title of the post the claim was filed against
    pub post_title: String,

    /// The claimant's free-text message
    pub message: String,
}
