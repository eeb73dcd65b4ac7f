//! Delivery over authenticated SMTP.

use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

use super::MailTransport;
use crate::config::{SmtpConfig, SmtpSecurity};
use crate::error::MailError;

/// Submits messages to an SMTP server with TLS and login.
#[derive(Debug, Clone)]
pub struct SmtpTransport {
    config: SmtpConfig,
}

impl SmtpTransport {
    /// Create a new SMTP transport with the given configuration.
    #[must_use]
    pub const fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    fn mailer(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailError> {
        let creds = Credentials::new(self.config.username.clone(), self.config.password.clone());

        let builder = match self.config.security {
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.host)?,
            SmtpSecurity::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)?
            }
        };

        Ok(builder.port(self.config.port).credentials(creds).build())
    }
}

#[async_trait]
impl MailTransport for SmtpTransport {
    fn name(&self) -> &'static str {
        "smtp"
    }

    async fn deliver(&self, message: Message) -> Result<(), MailError> {
        debug!(
            host = %self.config.host,
            port = self.config.port,
            security = ?self.config.security,
            "Connecting to SMTP server"
        );

        let mailer = self.mailer()?;
        mailer.send(message).await?;

        info!(host = %self.config.host, "Message accepted by SMTP server");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::MailEnvelope;

    /// A local port with nothing listening on it.
    fn closed_port() -> u16 {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        port
    }

    #[tokio::test]
    async fn test_refused_connection_is_smtp_error() {
        let transport = SmtpTransport::new(SmtpConfig {
            host: "127.0.0.1".to_string(),
            port: closed_port(),
            username: "tasks".to_string(),
            password: "secret".to_string(),
            security: SmtpSecurity::StartTls,
        });
        let message = MailEnvelope::new(
            "tasks@openlab-augsburg.de",
            "alle@lists.openlab-augsburg.de",
            "Digest",
        )
        .compose("Happy Hacking!\n")
        .unwrap();

        let err = transport.deliver(message).await.unwrap_err();
        assert!(matches!(err, MailError::Smtp(_)));
    }
}
