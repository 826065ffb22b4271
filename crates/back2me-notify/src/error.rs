//! Notification error types

use thiserror::Error;

/// Errors that can occur while preparing or delivering a notification
///
/// These never reach the operation that triggered the notification: the
/// dispatch worker logs them and moves on.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The payload failed validation and was not sent
    #[error("Invalid notification payload: {0}")]
    Validation(String),

    /// The delivery provider rejected the request or was unreachable
    #[error("Delivery failed: {0}")]
    Delivery(String),

    /// The provider answered with something other than a message id
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}
