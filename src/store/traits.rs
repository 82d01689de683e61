//! `Database` trait — the async persistence interface used by the web layer.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::DatabaseError;

/// A newsletter subscriber. Emails are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subscriber {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// A published newsletter issue. `body` is HTML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Newsletter {
    pub id: i64,
    pub subject: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

/// An accepted contact-form message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Backend-agnostic database trait covering subscribers, newsletters and
/// contact messages.
#[async_trait]
pub trait Database: Send + Sync {
    /// Bring the schema up to date by running pending migrations.
    async fn init_schema(&self) -> Result<(), DatabaseError>;

    // ── Subscribers ─────────────────────────────────────────────────

    /// Add a subscriber. Fails with `DatabaseError::Constraint` if the email exists.
    async fn add_subscriber(&self, email: &str) -> Result<Subscriber, DatabaseError>;

    /// Look up a subscriber by email.
    async fn get_subscriber(&self, email: &str) -> Result<Option<Subscriber>, DatabaseError>;

    /// Remove a subscriber. Returns `false` if no such email was subscribed.
    async fn remove_subscriber(&self, email: &str) -> Result<bool, DatabaseError>;

    // ── Newsletters ─────────────────────────────────────────────────

    /// Store a newsletter issue. Returns its id.
    async fn insert_newsletter(
        &self,
        subject: &str,
        body: &str,
        sent_at: DateTime<Utc>,
    ) -> Result<i64, DatabaseError>;

    /// All newsletters, most recently sent first.
    async fn list_newsletters(&self) -> Result<Vec<Newsletter>, DatabaseError>;

    /// Get a newsletter by id.
    async fn get_newsletter(&self, id: i64) -> Result<Option<Newsletter>, DatabaseError>;

    // ── Contact messages ────────────────────────────────────────────

    /// Store an accepted contact message. Returns its id.
    async fn insert_contact_message(
        &self,
        name: &str,
        email: &str,
        subject: &str,
        message: &str,
    ) -> Result<i64, DatabaseError>;

    /// Most recent contact messages, newest first, up to `limit`.
    async fn list_contact_messages(
        &self,
        limit: usize,
    ) -> Result<Vec<ContactMessage>, DatabaseError>;
}
