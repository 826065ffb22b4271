//! Resend delivery implementation
//!
//! Sends the owner alert through the Resend email API. The HTTP request
//! carries a timeout so a stalled provider resolves to a delivery error
//! instead of hanging the dispatch worker.

use crate::payload::{escape_html, validate_notification};
use crate::NotifyError;
use back2me_domain::ClaimNotification;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Default Resend API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.resend.com";

/// Default sender identity
pub const DEFAULT_FROM: &str = "Back2Me <onboarding@resend.dev>";

/// Default timeout for delivery requests (10 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Trait for delivering a claim notification
///
/// Implemented by [`ResendMailer`]; the dispatch worker is generic over it
/// so tests can substitute a recording double.
pub trait Mailer {
    /// Deliver one notification, returning the provider's message id
    fn send(
        &self,
        notification: &ClaimNotification,
    ) -> impl Future<Output = Result<String, NotifyError>> + Send;
}

/// Resend API client for owner alert delivery
pub struct ResendMailer {
    endpoint: String,
    api_key: String,
    from: String,
    client: reqwest::Client,
    timeout: Duration,
}

/// Request body for the Resend send-email API
#[derive(Serialize)]
struct SendEmailRequest {
    from: String,
    to: Vec<String>,
    subject: String,
    html: String,
}

/// Response from the Resend send-email API
#[derive(Deserialize)]
struct SendEmailResponse {
    id: String,
}

impl ResendMailer {
    /// Create a new mailer with the given API key
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use back2me_notify::ResendMailer;
    ///
    /// let mailer = ResendMailer::new("re_123");
    /// ```
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            from: DEFAULT_FROM.to_string(),
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Override the API endpoint (primarily for tests)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the sender identity
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = from.into();
        self
    }

    /// Override the delivery request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Render the notification body
    ///
    /// All user-supplied fields are escaped before interpolation.
    fn render_html(notification: &ClaimNotification) -> String {
        format!(
            concat!(
                r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">"#,
                "<h1>Nouvelle r\u{e9}clamation re\u{e7}ue</h1>",
                "<p>Bonjour {owner},</p>",
                "<p>Vous avez re\u{e7}u une nouvelle r\u{e9}clamation pour votre annonce <strong>\"{title}\"</strong>.</p>",
                "<p><strong>Nom:</strong> {claimer}<br>",
                "<strong>Email:</strong> {claimer_email}</p>",
                r#"<p style="white-space: pre-wrap;">{message}</p>"#,
                "<p>Vous pouvez r\u{e9}pondre directement \u{e0} cette personne \u{e0} l'adresse: <strong>{claimer_email}</strong></p>",
                "<p>Cordialement,<br>L'\u{e9}quipe Back2Me</p>",
                "</div>",
            ),
            owner = escape_html(&notification.owner_name),
            title = escape_html(&notification.post_title),
            claimer = escape_html(&notification.claimer_name),
            claimer_email = escape_html(&notification.claimer_email),
            message = escape_html(&notification.message),
        )
    }
}

impl Mailer for ResendMailer {
    /// Deliver the notification via Resend
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The payload fails validation (nothing is sent)
    /// - The provider is unreachable or times out
    /// - The provider rejects the request
    /// - The response carries no message id
    async fn send(&self, notification: &ClaimNotification) -> Result<String, NotifyError> {
        let notification = validate_notification(notification)?;

        let url = format!("{}/emails", self.endpoint);
        let request_body = SendEmailRequest {
            from: self.from.clone(),
            to: vec![notification.owner_email.clone()],
            subject: format!(
                "Nouvelle r\u{e9}clamation pour \"{}\"",
                notification.post_title
            ),
            html: Self::render_html(&notification),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| NotifyError::Delivery(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(NotifyError::Delivery(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let parsed: SendEmailResponse = response
            .json()
            .await
            .map_err(|e| NotifyError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        Ok(parsed.id)
    }
}
