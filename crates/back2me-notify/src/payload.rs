//! Notification payload validation and escaping
//!
//! Every field of the payload originates from user input or user-editable
//! profile records. Validation bounds what gets sent; escaping keeps the
//! rendered message inert.

use crate::NotifyError;
use back2me_domain::ClaimNotification;

/// Maximum length of an email address field
pub const MAX_EMAIL_LEN: usize = 255;

/// Maximum length of a display name field
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length of the post title field
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum length of the claim message field
pub const MAX_MESSAGE_LEN: usize = 2000;

/// Escape a string for embedding in HTML output
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !value.chars().any(char::is_whitespace)
}

fn check_email(field: &str, value: &str) -> Result<String, NotifyError> {
    let value = value.trim();
    if value.len() > MAX_EMAIL_LEN {
        return Err(NotifyError::Validation(format!(
            "{} exceeds {} characters",
            field, MAX_EMAIL_LEN
        )));
    }
    if !looks_like_email(value) {
        return Err(NotifyError::Validation(format!(
            "{} is not a valid email address",
            field
        )));
    }
    Ok(value.to_string())
}

fn check_text(field: &str, value: &str, max_len: usize) -> Result<String, NotifyError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(NotifyError::Validation(format!("{} is empty", field)));
    }
    if value.chars().count() > max_len {
        return Err(NotifyError::Validation(format!(
            "{} exceeds {} characters",
            field, max_len
        )));
    }
    Ok(value.to_string())
}

/// Validate a notification payload, returning a trimmed copy
///
/// Invalid payloads fail here and are never handed to the delivery
/// provider.
pub fn validate_notification(
    notification: &ClaimNotification,
) -> Result<ClaimNotification, NotifyError> {
    Ok(ClaimNotification {
        owner_email: check_email("owner_email", &notification.owner_email)?,
        owner_name: check_text("owner_name", &notification.owner_name, MAX_NAME_LEN)?,
        claimer_name: check_text("claimer_name", &notification.claimer_name, MAX_NAME_LEN)?,
        claimer_email: check_email("claimer_email", &notification.claimer_email)?,
        post_title: check_text("post_title", &notification.post_title, MAX_TITLE_LEN)?,
        message: check_text("message", &notification.message, MAX_MESSAGE_LEN)?,
    })
}
