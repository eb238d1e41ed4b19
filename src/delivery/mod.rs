//! Hand-off of formatted emails to the mail transport.
//!
//! Inline delivery sends within the webhook request. Queued delivery pushes the
//! message onto a bounded channel drained by [`DeliveryWorker`]; the request
//! returns as soon as the message is enqueued.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::config::{DeliveryConfig, DeliveryMode};
use crate::notifications::{EmailMessage, MailSender};

/// What happened to a message handed to [`Delivery::deliver`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryReceipt {
    /// Sent inline; holds the SMTP server's reply
    Sent(String),
    /// Accepted by the delivery worker
    Queued,
}

pub enum Delivery {
    Inline(Arc<dyn MailSender>),
    Queued(DeliveryQueue),
}

impl Delivery {
    /// Build the delivery configured in `config`, spawning the worker for queued mode.
    pub fn from_config(config: &DeliveryConfig, mailer: Arc<dyn MailSender>) -> Self {
        match config.mode {
            DeliveryMode::Inline => Delivery::Inline(mailer),
            DeliveryMode::Queued => {
                let (queue, worker) = DeliveryQueue::new(mailer, config.queue_capacity);
                tokio::spawn(worker.run());
                Delivery::Queued(queue)
            }
        }
    }

    pub async fn deliver(&self, email: EmailMessage) -> Result<DeliveryReceipt> {
        match self {
            Delivery::Inline(mailer) => {
                let reply = mailer.send(&email).await?;
                Ok(DeliveryReceipt::Sent(reply))
            }
            Delivery::Queued(queue) => {
                queue.enqueue(email).await?;
                Ok(DeliveryReceipt::Queued)
            }
        }
    }
}

/// Sending half of the delivery channel
#[derive(Clone)]
pub struct DeliveryQueue {
    tx: mpsc::Sender<EmailMessage>,
}

impl DeliveryQueue {
    pub fn new(mailer: Arc<dyn MailSender>, capacity: usize) -> (Self, DeliveryWorker) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, DeliveryWorker { mailer, rx })
    }

    pub async fn enqueue(&self, email: EmailMessage) -> Result<()> {
        self.tx
            .send(email)
            .await
            .map_err(|_| anyhow::anyhow!("Delivery worker is not running"))
    }
}

/// Receives queued emails and sends each one on its own task
pub struct DeliveryWorker {
    mailer: Arc<dyn MailSender>,
    rx: mpsc::Receiver<EmailMessage>,
}

impl DeliveryWorker {
    pub async fn run(mut self) {
        tracing::info!("Delivery worker started");

        while let Some(email) = self.rx.recv().await {
            let mailer = self.mailer.clone();

            tokio::spawn(async move {
                match mailer.send(&email).await {
                    Ok(reply) => {
                        tracing::debug!(
                            subject = %email.subject,
                            reply = %reply,
                            "Queued email delivered"
                        );
                    }
                    Err(e) => {
                        tracing::error!(
                            subject = %email.subject,
                            to = %email.to,
                            error = ?e,
                            "Failed to deliver queued email"
                        );
                    }
                }
            });
        }

        tracing::info!("Delivery worker stopped");
    }
}
