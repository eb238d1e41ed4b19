//! SMTP delivery through lettre.
//!
//! A transport is built for every send and dropped afterwards, so each email
//! gets its own connection: connect, EHLO, optional AUTH, send, quit.

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::{
    transport::smtp::authentication::Credentials, AsyncSmtpTransport, AsyncTransport,
    Tokio1Executor,
};

use super::{EmailMessage, MailSender};
use crate::config::SmtpConfig;

/// Sends commit emails through the configured SMTP relay
pub struct SmtpMailer {
    config: SmtpConfig,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let builder = if self.config.tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.hostname)
                .with_context(|| format!("Invalid SMTP relay: {}", self.config.hostname))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.config.hostname)
        }
        .port(self.config.port);

        let builder = match self.config.credentials() {
            Some((username, password)) => {
                builder.credentials(Credentials::new(username.to_string(), password.to_string()))
            }
            None => builder,
        };

        Ok(builder.build())
    }
}

#[async_trait]
impl MailSender for SmtpMailer {
    async fn send(&self, email: &EmailMessage) -> Result<String> {
        let message = email.to_message()?;
        let transport = self.transport()?;

        let response = transport.send(message).await.with_context(|| {
            format!(
                "Failed to send email via {}:{}",
                self.config.hostname, self.config.port
            )
        })?;

        let reply = response.message().collect::<Vec<_>>().join("\n");

        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            code = %response.code(),
            "Email sent successfully"
        );

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mailer_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SmtpMailer>();
    }

    #[test]
    fn test_plain_transport_builds_without_credentials() {
        let mailer = SmtpMailer::new(SmtpConfig::default());
        assert!(mailer.transport().is_ok());
    }

    #[test]
    fn test_transport_builds_with_credentials() {
        let config = SmtpConfig {
            username: Some("bot".to_string()),
            password: Some("hunter2".to_string()),
            ..SmtpConfig::default()
        };
        assert!(SmtpMailer::new(config).transport().is_ok());
    }

    #[tokio::test]
    async fn test_send_fails_for_invalid_message() {
        let mailer = SmtpMailer::new(SmtpConfig::default());
        let email = EmailMessage {
            from_name: "Jane Doe".to_string(),
            from_address: "sender@example.com".to_string(),
            to: "not an address".to_string(),
            subject: "Fix bug".to_string(),
            body: String::new(),
        };
        let err = mailer.send(&email).await.unwrap_err();
        assert!(err.to_string().contains("Invalid recipient address"));
    }
}
