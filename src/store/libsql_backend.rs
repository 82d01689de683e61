//! libSQL backend — async `Database` trait implementation.
//!
//! Supports local file and in-memory databases.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::{debug, info};

use crate::error::DatabaseError;
use crate::store::migrations;
use crate::store::traits::{ContactMessage, Database, Newsletter, Subscriber};

/// libSQL database backend.
///
/// Stores a single connection that is reused for all operations.
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use.
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        backend.init_schema().await?;
        info!(path = %path.display(), "Database opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Pool(format!("Failed to create in-memory database: {e}"))
            })?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        backend.init_schema().await?;
        Ok(backend)
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }
}

// ── Helper functions ────────────────────────────────────────────────

/// Parse an RFC 3339 or SQLite datetime string into DateTime<Utc>.
fn parse_datetime(s: &str) -> DateTime<Utc> {
    // RFC 3339 is what we write
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }
    // SQLite datetime() defaults, with and without fractional seconds
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return ndt.and_utc();
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return ndt.and_utc();
    }
    DateTime::<Utc>::MIN_UTC
}

const SUBSCRIBER_COLUMNS: &str = "id, email, created_at";
const NEWSLETTER_COLUMNS: &str = "id, subject, body, sent_at";
const CONTACT_COLUMNS: &str = "id, name, email, subject, message, created_at";

fn row_to_subscriber(row: &libsql::Row) -> Result<Subscriber, libsql::Error> {
    let created_str: String = row.get(2)?;
    Ok(Subscriber {
        id: row.get(0)?,
        email: row.get(1)?,
        created_at: parse_datetime(&created_str),
    })
}

fn row_to_newsletter(row: &libsql::Row) -> Result<Newsletter, libsql::Error> {
    let sent_str: String = row.get(3)?;
    Ok(Newsletter {
        id: row.get(0)?,
        subject: row.get(1)?,
        body: row.get(2)?,
        sent_at: parse_datetime(&sent_str),
    })
}

fn row_to_contact(row: &libsql::Row) -> Result<ContactMessage, libsql::Error> {
    let created_str: String = row.get(5)?;
    Ok(ContactMessage {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        subject: row.get(3)?,
        message: row.get(4)?,
        created_at: parse_datetime(&created_str),
    })
}

/// Read the `id` from the first row of an `INSERT ... RETURNING id`.
async fn returned_id(mut rows: libsql::Rows, op: &str) -> Result<i64, DatabaseError> {
    match rows.next().await {
        Ok(Some(row)) => row
            .get::<i64>(0)
            .map_err(|e| DatabaseError::Query(format!("{op} row parse: {e}"))),
        Ok(None) => Err(DatabaseError::Query(format!("{op}: no id returned"))),
        Err(e) => Err(DatabaseError::Query(format!("{op}: {e}"))),
    }
}

#[async_trait]
impl Database for LibSqlBackend {
    async fn init_schema(&self) -> Result<(), DatabaseError> {
        migrations::run_migrations(self.conn()).await
    }

    // ── Subscribers ─────────────────────────────────────────────────

    async fn add_subscriber(&self, email: &str) -> Result<Subscriber, DatabaseError> {
        let conn = self.conn();
        let mut rows = conn
            .query(
                &format!(
                    "INSERT INTO subscribers (email, created_at) VALUES (?1, ?2) \
                     ON CONFLICT(email) DO NOTHING RETURNING {SUBSCRIBER_COLUMNS}"
                ),
                params![email, Utc::now().to_rfc3339()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("add_subscriber: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let subscriber = row_to_subscriber(&row)
                    .map_err(|e| DatabaseError::Query(format!("add_subscriber row parse: {e}")))?;
                debug!(id = subscriber.id, "Subscriber added");
                Ok(subscriber)
            }
            // DO NOTHING yields no row when the email is already present
            Ok(None) => Err(DatabaseError::Constraint(format!(
                "subscriber {email} already exists"
            ))),
            Err(e) => Err(DatabaseError::Query(format!("add_subscriber: {e}"))),
        }
    }

    async fn get_subscriber(&self, email: &str) -> Result<Option<Subscriber>, DatabaseError> {
        let conn = self.conn();
        let mut rows = conn
            .query(
                &format!("SELECT {SUBSCRIBER_COLUMNS} FROM subscribers WHERE email = ?1"),
                params![email],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_subscriber: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let subscriber = row_to_subscriber(&row)
                    .map_err(|e| DatabaseError::Query(format!("get_subscriber row parse: {e}")))?;
                Ok(Some(subscriber))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get_subscriber: {e}"))),
        }
    }

    async fn remove_subscriber(&self, email: &str) -> Result<bool, DatabaseError> {
        let conn = self.conn();
        let count = conn
            .execute("DELETE FROM subscribers WHERE email = ?1", params![email])
            .await
            .map_err(|e| DatabaseError::Query(format!("remove_subscriber: {e}")))?;
        Ok(count > 0)
    }

    // ── Newsletters ─────────────────────────────────────────────────

    async fn insert_newsletter(
        &self,
        subject: &str,
        body: &str,
        sent_at: DateTime<Utc>,
    ) -> Result<i64, DatabaseError> {
        let conn = self.conn();
        let rows = conn
            .query(
                "INSERT INTO newsletters (subject, body, sent_at) VALUES (?1, ?2, ?3) RETURNING id",
                params![subject, body, sent_at.to_rfc3339()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("insert_newsletter: {e}")))?;
        returned_id(rows, "insert_newsletter").await
    }

    async fn list_newsletters(&self) -> Result<Vec<Newsletter>, DatabaseError> {
        let conn = self.conn();
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {NEWSLETTER_COLUMNS} FROM newsletters \
                     ORDER BY julianday(sent_at) DESC, id DESC"
                ),
                (),
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("list_newsletters: {e}")))?;

        let mut newsletters = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            match row_to_newsletter(&row) {
                Ok(n) => newsletters.push(n),
                Err(e) => {
                    tracing::warn!("Skipping newsletter row: {e}");
                }
            }
        }
        Ok(newsletters)
    }

    async fn get_newsletter(&self, id: i64) -> Result<Option<Newsletter>, DatabaseError> {
        let conn = self.conn();
        let mut rows = conn
            .query(
                &format!("SELECT {NEWSLETTER_COLUMNS} FROM newsletters WHERE id = ?1"),
                params![id],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_newsletter: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let newsletter = row_to_newsletter(&row)
                    .map_err(|e| DatabaseError::Query(format!("get_newsletter row parse: {e}")))?;
                Ok(Some(newsletter))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get_newsletter: {e}"))),
        }
    }

    // ── Contact messages ────────────────────────────────────────────

    async fn insert_contact_message(
        &self,
        name: &str,
        email: &str,
        subject: &str,
        message: &str,
    ) -> Result<i64, DatabaseError> {
        let conn = self.conn();
        let rows = conn
            .query(
                "INSERT INTO contact_messages (name, email, subject, message, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5) RETURNING id",
                params![name, email, subject, message, Utc::now().to_rfc3339()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("insert_contact_message: {e}")))?;
        returned_id(rows, "insert_contact_message").await
    }

    async fn list_contact_messages(
        &self,
        limit: usize,
    ) -> Result<Vec<ContactMessage>, DatabaseError> {
        let conn = self.conn();
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {CONTACT_COLUMNS} FROM contact_messages \
                     ORDER BY julianday(created_at) DESC, id DESC LIMIT ?1"
                ),
                params![limit as i64],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("list_contact_messages: {e}")))?;

        let mut messages = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            match row_to_contact(&row) {
                Ok(m) => messages.push(m),
                Err(e) => {
                    tracing::warn!("Skipping contact message row: {e}");
                }
            }
        }
        Ok(messages)
    }
}
