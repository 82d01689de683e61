//! Outbound transactional email.
//!
//! Handlers build an [`OutgoingEmail`] with one of the constructors in
//! [`messages`] and hand it to a [`Mailer`]. Delivery failures are returned
//! to the caller, which logs them; they never fail a request.

pub mod messages;
pub mod smtp;

use async_trait::async_trait;

use crate::error::MailError;

pub use smtp::{DisabledMailer, SmtpMailer};

/// A rendered HTML email ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Sends outgoing email.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Deliver one message.
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError>;

    /// Check that the transport can reach and authenticate with its server.
    async fn test_connection(&self) -> Result<(), MailError>;
}
