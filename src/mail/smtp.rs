//! SMTP delivery via lettre.
//!
//! lettre's `SmtpTransport` is blocking, so every network call runs on
//! `tokio::task::spawn_blocking`.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use secrecy::ExposeSecret;

use crate::config::SmtpConfig;
use crate::error::MailError;
use crate::mail::{Mailer, OutgoingEmail};

/// Port on which the server expects TLS from the first byte.
pub const IMPLICIT_TLS_PORT: u16 = 465;

/// Mailer backed by an authenticated SMTP relay.
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: Mailbox,
    host: String,
}

impl SmtpMailer {
    /// Build the transport. Port 465 uses implicit TLS, any other port STARTTLS.
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let from: Mailbox = config
            .username
            .parse()
            .map_err(|e: lettre::address::AddressError| MailError::InvalidAddress {
                address: config.username.clone(),
                reason: e.to_string(),
            })?;

        let builder = if config.port == IMPLICIT_TLS_PORT {
            SmtpTransport::relay(&config.host)
        } else {
            SmtpTransport::starttls_relay(&config.host)
        }
        .map_err(|e| MailError::Transport(format!("SMTP relay error: {e}")))?;

        let creds = Credentials::new(
            config.username.clone(),
            config.password.expose_secret().to_string(),
        );
        let transport = builder.port(config.port).credentials(creds).build();

        Ok(Self {
            transport,
            from,
            host: config.host.clone(),
        })
    }

    fn build_message(&self, email: &OutgoingEmail) -> Result<Message, MailError> {
        let to: Mailbox = email.to.parse().map_err(|e: lettre::address::AddressError| {
            MailError::InvalidAddress {
                address: email.to.clone(),
                reason: e.to_string(),
            }
        })?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_HTML)
            .body(email.html_body.clone())
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    fn name(&self) -> &str {
        "smtp"
    }

    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        let message = self.build_message(&email)?;
        let transport = self.transport.clone();

        tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| MailError::Transport(format!("send task failed: {e}")))?
            .map_err(|e| MailError::Transport(format!("SMTP send failed: {e}")))?;

        tracing::info!(to = %email.to, subject = %email.subject, "Email sent");
        Ok(())
    }

    async fn test_connection(&self) -> Result<(), MailError> {
        let transport = self.transport.clone();
        let reachable = tokio::task::spawn_blocking(move || transport.test_connection())
            .await
            .map_err(|e| MailError::Transport(format!("connection test task failed: {e}")))?
            .map_err(|e| MailError::Transport(format!("SMTP connection test failed: {e}")))?;

        if reachable {
            Ok(())
        } else {
            Err(MailError::Transport(format!(
                "SMTP server {} did not accept the connection",
                self.host
            )))
        }
    }
}

/// Mailer used when no SMTP server is configured. Every send fails with
/// [`MailError::NotConfigured`].
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn send(&self, _email: OutgoingEmail) -> Result<(), MailError> {
        Err(MailError::NotConfigured)
    }

    async fn test_connection(&self) -> Result<(), MailError> {
        Err(MailError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn config(port: u16, username: &str) -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".into(),
            port,
            username: username.into(),
            password: SecretString::from("hunter2"),
        }
    }

    fn email(to: &str) -> OutgoingEmail {
        OutgoingEmail {
            to: to.into(),
            subject: "Hello".into(),
            html_body: "<p>Hi</p>".into(),
        }
    }

    #[test]
    fn builds_for_implicit_tls_and_starttls() {
        assert!(SmtpMailer::new(&config(465, "news@example.com")).is_ok());
        assert!(SmtpMailer::new(&config(587, "news@example.com")).is_ok());
    }

    #[test]
    fn rejects_invalid_from_address() {
        let err = SmtpMailer::new(&config(465, "not an address")).err().unwrap();
        assert!(matches!(err, MailError::InvalidAddress { .. }));
    }

    #[test]
    fn message_uses_smtp_user_as_sender() {
        let mailer = SmtpMailer::new(&config(465, "news@example.com")).unwrap();
        let message = mailer.build_message(&email("rider@example.com")).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("From: news@example.com"));
        assert!(raw.contains("To: rider@example.com"));
        assert!(raw.contains("Content-Type: text/html"));
    }

    #[test]
    fn invalid_recipient_is_rejected_before_sending() {
        let mailer = SmtpMailer::new(&config(465, "news@example.com")).unwrap();
        let err = mailer.build_message(&email("nobody")).unwrap_err();
        assert!(matches!(err, MailError::InvalidAddress { address, .. } if address == "nobody"));
    }

    #[tokio::test]
    async fn disabled_mailer_reports_not_configured() {
        let mailer = DisabledMailer;
        let err = mailer.send(email("rider@example.com")).await.unwrap_err();
        assert!(matches!(err, MailError::NotConfigured));
        assert!(mailer.test_connection().await.is_err());
    }
}
