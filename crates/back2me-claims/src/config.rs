//! Claim registry configuration

/// Configuration for claim validation
#[derive(Debug, Clone)]
pub struct ClaimConfig {
    /// Maximum accepted claim message length, in characters
    pub max_message_len: usize,
}

impl Default for ClaimConfig {
    fn default() -> Self {
        Self {
            // Matches the notification payload bound on the message field
            max_message_len: 2000,
        }
    }
}
