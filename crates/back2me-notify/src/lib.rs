//! Back2Me Notification Dispatcher
//!
//! Formats and best-effort delivers the out-of-band owner alert that a new
//! claim triggers.
//!
//! # Architecture
//!
//! - Payload validation and HTML escaping before anything is rendered
//! - `ResendMailer`: async HTTP delivery through the Resend email API,
//!   with a per-request timeout
//! - A channel-based dispatch boundary: the producing side never blocks
//!   and never observes a delivery outcome; the worker side logs and
//!   swallows every failure, because the claim that triggered the alert
//!   has already committed
//!
//! # Examples
//!
//! ```no_run
//! use back2me_notify::{notification_channel, ResendMailer};
//!
//! let mailer = ResendMailer::new("re_123");
//! let (handle, worker) = notification_channel(mailer, 64);
//!
//! // tokio::spawn(worker.run());
//! // handle implements the ClaimNotifier seam for the claim registry
//! ```

#![warn(missing_docs)]

mod dispatcher;
mod error;
mod mailer;
mod payload;

pub use dispatcher::{notification_channel, NotificationWorker, NotifierHandle};
pub use error::NotifyError;
pub use mailer::{Mailer, ResendMailer};
pub use payload::{escape_html, validate_notification};
