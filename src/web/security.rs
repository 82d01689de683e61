//! Request guard: blocks common scanners and exploit probes, logs the rest.

use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{ConnectInfo, Request};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{info, warn};

/// Substrings that get a request refused when found in its path, query or
/// User-Agent (all compared lowercase).
pub const BLOCKED_PATTERNS: [&str; 12] = [
    "python-requests",
    "curl",
    "wget",
    "sqlmap",
    "nikto",
    ".php",
    ".env",
    ".git",
    "wp-admin",
    "xmlrpc",
    "backup",
    "config",
];

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blocked {
    /// Path or query matched.
    Uri(&'static str),
    /// User-Agent matched.
    UserAgent(&'static str),
}

/// Check a request's path+query and User-Agent against [`BLOCKED_PATTERNS`].
pub fn check_request(path_and_query: &str, user_agent: &str) -> Option<Blocked> {
    let uri = path_and_query.to_lowercase();
    let agent = user_agent.to_lowercase();

    BLOCKED_PATTERNS.iter().find_map(|&pattern| {
        if uri.contains(pattern) {
            Some(Blocked::Uri(pattern))
        } else if agent.contains(pattern) {
            Some(Blocked::UserAgent(pattern))
        } else {
            None
        }
    })
}

fn remote_addr(req: &Request) -> String {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// axum middleware wrapping every route.
pub async fn guard(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| path.clone());
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let remote = remote_addr(&req);

    if let Some(blocked) = check_request(&path_and_query, &user_agent) {
        match blocked {
            Blocked::Uri(pattern) => {
                warn!(method = %method, path = %path, remote = %remote, pattern, "Blocked attack")
            }
            Blocked::UserAgent(pattern) => {
                warn!(user_agent = %user_agent, remote = %remote, pattern, "Blocked bot")
            }
        }
        return (StatusCode::FORBIDDEN, "Access Denied").into_response();
    }

    let started = Instant::now();
    let response = next.run(req).await;
    info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        duration_ms = started.elapsed().as_millis() as u64,
        remote = %remote,
        "Request"
    );
    response
}
