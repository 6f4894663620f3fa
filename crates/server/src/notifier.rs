// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Queue-backed notification delivery.
//!
//! The engine hands events over synchronously while holding the database
//! lock, so the notifier only enqueues. A background task drains the queue.

use shiftbot_api::{NotificationEvent, Notifier, NotifyError};
use tokio::sync::mpsc::{self, Receiver, Sender, error::TrySendError};
use tracing::{debug, info};

/// Number of undelivered events held before new ones are refused.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// A notifier that pushes events onto a bounded channel.
#[derive(Debug, Clone)]
pub struct QueueNotifier {
    sender: Sender<NotificationEvent>,
}

impl QueueNotifier {
    /// Creates a notifier and the receiving end of its queue.
    #[must_use]
    pub fn new(capacity: usize) -> (Self, Receiver<NotificationEvent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }
}

impl Notifier for QueueNotifier {
    fn notify(&self, event: &NotificationEvent) -> Result<(), NotifyError> {
        self.sender
            .try_send(event.clone())
            .map_err(|e| match e {
                TrySendError::Full(_) => {
                    NotifyError::Unavailable(String::from("notification queue is full"))
                }
                TrySendError::Closed(_) => {
                    NotifyError::Unavailable(String::from("notification queue is closed"))
                }
            })
    }
}

/// Drains the queue until every sender is gone.
///
/// Delivery to the chat platform is outside this service; events are
/// written to the log.
pub async fn deliver(mut receiver: Receiver<NotificationEvent>) {
    while let Some(event) = receiver.recv().await {
        info!(
            kind = ?event.kind,
            request_kind = %event.request_kind,
            request_id = %event.request_id,
            recipient = %event.recipient,
            message = %event.message,
            "Delivering notification"
        );
    }
    debug!("Notification queue closed");
}
