//! On-demand notifications delivered through an in-process queue.
//!
//! Handlers enqueue rendered messages on a bounded channel; a background
//! worker drains it and hands each message to the configured transport.

pub mod mail;

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};
use uuid::Uuid;

use crate::config::MailSettings;
use crate::error::{AppError, AppResult};

pub use mail::{MailMessage, MailTransport, build_transport};

/// A recipient address that is not tied to any account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnDemandRoute {
    pub mail: String,
}

impl OnDemandRoute {
    pub fn mail(address: impl Into<String>) -> Self {
        Self {
            mail: address.into(),
        }
    }
}

/// Something that can be rendered as a mail.
pub trait Notification {
    fn subject(&self) -> String;

    fn body(&self) -> String;

    /// Address replies should go to, if not the sender.
    fn reply_to(&self) -> Option<String> {
        None
    }
}

/// Receipt for a message accepted by the queue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dispatched {
    pub id: Uuid,
    pub recipient: String,
    pub subject: String,
}

/// Handle used by request handlers to enqueue notifications.
#[derive(Clone)]
pub struct Notifier {
    sender: mpsc::Sender<MailMessage>,
    route: OnDemandRoute,
    from: String,
}

impl Notifier {
    /// Create a notifier and the receiving end of its queue.
    pub fn new(settings: &MailSettings) -> (Self, mpsc::Receiver<MailMessage>) {
        let (sender, receiver) = mpsc::channel(settings.queue_capacity.max(1));
        let notifier = Self {
            sender,
            route: OnDemandRoute::mail(settings.contact_recipient.clone()),
            from: settings.from.clone(),
        };
        (notifier, receiver)
    }

    /// Configured recipient of contact notifications.
    pub fn route(&self) -> &OnDemandRoute {
        &self.route
    }

    /// Render a notification for the given route and place it on the queue.
    ///
    /// Returns once the message is queued; delivery happens later.
    pub async fn dispatch<N: Notification>(
        &self,
        route: &OnDemandRoute,
        notification: &N,
    ) -> AppResult<Dispatched> {
        let message = MailMessage {
            id: Uuid::new_v4(),
            from: self.from.clone(),
            to: route.mail.clone(),
            reply_to: notification.reply_to(),
            subject: notification.subject(),
            body: notification.body(),
            created_at: Utc::now(),
        };

        let receipt = Dispatched {
            id: message.id,
            recipient: message.to.clone(),
            subject: message.subject.clone(),
        };

        self.sender
            .send(message)
            .await
            .map_err(|_| AppError::Delivery("notification queue is closed".to_string()))?;

        Ok(receipt)
    }
}

/// Delivery outcome counts of a worker that has stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryStats {
    pub delivered: u64,
    pub failed: u64,
}

/// Start the background task that delivers queued messages.
///
/// A failed delivery is logged and counted, and the worker moves on to the
/// next message. Runs until every `Notifier` handle has been dropped.
pub fn start_delivery_worker(
    mut receiver: mpsc::Receiver<MailMessage>,
    transport: Arc<dyn MailTransport>,
) -> JoinHandle<DeliveryStats> {
    tokio::spawn(async move {
        info!("Starting notification delivery (transport: {})", transport.name());
        let mut stats = DeliveryStats::default();

        while let Some(message) = receiver.recv().await {
            match transport.send(&message).await {
                Ok(()) => {
                    stats.delivered += 1;
                    info!(
                        notification_id = %message.id,
                        recipient = %message.to,
                        subject = %message.subject,
                        "Notification delivered"
                    );
                }
                Err(e) => {
                    stats.failed += 1;
                    error!(
                        notification_id = %message.id,
                        recipient = %message.to,
                        subject = %message.subject,
                        transport = transport.name(),
                        error = %e,
                        "Notification delivery failed"
                    );
                }
            }
        }

        info!(
            delivered = stats.delivered,
            failed = stats.failed,
            "Notification queue closed, delivery worker stopped"
        );
        stats
    })
}
