//! Commit notification emails and the transports that send them.

pub mod commit_email;
mod email;

pub use email::SmtpMailer;

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    Message,
};

/// A formatted notification, ready to hand to a [`MailSender`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from_name: String,
    pub from_address: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl EmailMessage {
    /// Build the plain-text MIME message
    pub fn to_message(&self) -> Result<Message> {
        let from = Mailbox::new(
            Some(self.from_name.clone()),
            self.from_address
                .parse()
                .with_context(|| format!("Invalid sender address: {}", self.from_address))?,
        );
        let to: Mailbox = self
            .to
            .parse()
            .with_context(|| format!("Invalid recipient address: {}", self.to))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(self.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(self.body.clone())
            .context("Failed to build email message")
    }
}

/// Sends a single email, returning the server's reply text
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, email: &EmailMessage) -> Result<String>;
}
