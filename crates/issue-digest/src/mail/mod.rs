//! Mail composition and delivery.
//!
//! A digest is delivered through exactly one [`MailTransport`]:
//!
//! - [`SendmailTransport`] pipes the message into a local `sendmail -t`
//! - [`SmtpTransport`] submits it to an SMTP server over TLS

pub mod sendmail;
pub mod smtp;

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::Message;

use crate::config::TransportConfig;
use crate::error::MailError;

pub use sendmail::SendmailTransport;
pub use smtp::SmtpTransport;

/// Trait for mail transports (local sendmail, SMTP).
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Get the name of this transport.
    fn name(&self) -> &'static str;

    /// Hand a composed message to the delivery agent.
    async fn deliver(&self, message: Message) -> Result<(), MailError>;
}

/// Build the transport selected by `config`.
#[must_use]
pub fn transport_for(config: &TransportConfig) -> Box<dyn MailTransport> {
    match config {
        TransportConfig::Sendmail { program } => Box::new(SendmailTransport::new(program)),
        TransportConfig::Smtp(smtp) => Box::new(SmtpTransport::new(smtp.clone())),
    }
}

/// Addressing for the digest mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailEnvelope {
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
}

impl MailEnvelope {
    /// Create an envelope.
    pub fn new(from: impl Into<String>, to: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            subject: subject.into(),
        }
    }

    /// Wrap `body` in a plaintext UTF-8 message.
    pub fn compose(&self, body: &str) -> Result<Message, MailError> {
        let from = parse_mailbox(&self.from)?;
        let to = parse_mailbox(&self.to)?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(self.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;

        Ok(message)
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse().map_err(|source| MailError::Address {
        address: address.to_string(),
        source,
    })
}
