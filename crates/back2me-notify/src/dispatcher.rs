//! Channel-based dispatch boundary for owner alerts
//!
//! The claim workflow must never wait on, or fail because of, email
//! delivery. Producers hand payloads to a [`NotifierHandle`], which
//! enqueues without blocking; a [`NotificationWorker`] drains the queue on
//! its own task and contains every failure.

use crate::mailer::Mailer;
use back2me_domain::traits::ClaimNotifier;
use back2me_domain::ClaimNotification;
use tokio::sync::mpsc;

/// Producing side of the dispatch channel
///
/// Cheap to clone. Implements the [`ClaimNotifier`] seam: enqueueing never
/// blocks, and a full or closed queue drops the alert with an error log
/// instead of surfacing to the caller.
#[derive(Clone)]
pub struct NotifierHandle {
    tx: mpsc::Sender<ClaimNotification>,
}

impl ClaimNotifier for NotifierHandle {
    fn notify_owner_of_claim(&self, notification: ClaimNotification) {
        if let Err(e) = self.tx.try_send(notification) {
            tracing::error!("Dropping owner alert, queue unavailable: {}", e);
        }
    }
}

/// Consuming side of the dispatch channel
///
/// Runs on its own tokio task and delivers queued alerts one at a time.
pub struct NotificationWorker<M> {
    mailer: M,
    rx: mpsc::Receiver<ClaimNotification>,
}

impl<M: Mailer> NotificationWorker<M> {
    /// Drain the queue until every producing handle is dropped
    ///
    /// Each payload is delivered best-effort: the outcome is logged and
    /// never propagated. The loop survives any delivery failure.
    pub async fn run(mut self) {
        tracing::info!("Notification worker started");

        while let Some(notification) = self.rx.recv().await {
            match self.mailer.send(&notification).await {
                Ok(message_id) => {
                    tracing::info!(
                        owner = %notification.owner_email,
                        %message_id,
                        "Claim notification delivered"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        owner = %notification.owner_email,
                        "Claim notification failed: {}",
                        e
                    );
                }
            }
        }

        tracing::info!("Notification worker stopped");
    }
}

/// Create a dispatch channel with the given queue capacity
///
/// Returns the producing handle and the worker; spawn the worker's
/// [`run`](NotificationWorker::run) future on the runtime.
pub fn notification_channel<M: Mailer>(
    mailer: M,
    capacity: usize,
) -> (NotifierHandle, NotificationWorker<M>) {
    let (tx, rx) = mpsc::channel(capacity);
    (NotifierHandle { tx }, NotificationWorker { mailer, rx })
}
