//! Persistence layer: libSQL storage for subscribers, newsletters and
//! contact messages.

pub mod libsql_backend;
pub mod migrations;
pub mod traits;

pub use libsql_backend::LibSqlBackend;
pub use traits::{ContactMessage, Database, Newsletter, Subscriber};
