//! Configuration types, built from environment variables.
//!
//! An optional `.env` file fills in keys the process environment leaves
//! unset; real environment variables always win.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use secrecy::SecretString;

use crate::error::ConfigError;

/// Service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// libSQL database file.
    pub db_path: PathBuf,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
    /// Base URL used in outbound links. Derived from the request `Host` when unset.
    pub public_base_url: Option<String>,
    /// Recipient of contact-form notifications.
    pub admin_email: Option<String>,
    /// Outbound mail settings. `None` disables email delivery.
    pub smtp: Option<SmtpConfig>,
}

/// SMTP settings. The SMTP user doubles as the From address.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
}

impl AppConfig {
    /// Build config from the process environment, layered over `env_file` if it exists.
    pub fn load(env_file: Option<&Path>) -> Result<Self, ConfigError> {
        let file_vars = match env_file {
            Some(path) if path.exists() => read_env_file(path)?,
            _ => HashMap::new(),
        };

        Self::from_lookup(|key| {
            std::env::var(key)
                .ok()
                .or_else(|| file_vars.get(key).cloned())
        })
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = non_empty("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_port("PORT", non_empty("PORT"), 5000)?;

        let db_path = non_empty("LANDING_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data/landing.db"));
        let static_dir = non_empty("LANDING_STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./static"));

        let public_base_url =
            non_empty("PUBLIC_BASE_URL").map(|u| u.trim_end_matches('/').to_string());
        let admin_email = non_empty("ADMIN_EMAIL");

        let smtp = match non_empty("SMTP_SERVER") {
            Some(smtp_host) => {
                let port = parse_port("SMTP_PORT", non_empty("SMTP_PORT"), 465)?;
                let username = non_empty("SMTP_USER")
                    .ok_or_else(|| ConfigError::MissingEnvVar("SMTP_USER".into()))?;
                let password = lookup("SMTP_PASSWORD").unwrap_or_default();
                Some(SmtpConfig {
                    host: smtp_host,
                    port,
                    username,
                    password: SecretString::from(password),
                })
            }
            None => None,
        };

        Ok(Self {
            host,
            port,
            db_path,
            static_dir,
            public_base_url,
            admin_email,
            smtp,
        })
    }

    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_port(key: &str, value: Option<String>, default: u16) -> Result<u16, ConfigError> {
    match value {
        Some(v) => v.trim().parse().map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("'{v}' is not a valid port: {e}"),
        }),
        None => Ok(default),
    }
}

/// Read a `.env` file without touching the process environment.
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let vars = dotenvy::from_path_iter(path)?
        .collect::<Result<HashMap<_, _>, dotenvy::Error>>()?;
    Ok(vars)
}
