//! HTTP surface: axum router, request guard and handlers.

pub mod contact;
pub mod newsletters;
pub mod pages;
pub mod security;
pub mod subscribe;
pub mod templates;

use std::path::Path;
use std::sync::Arc;

use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router, middleware};
use tera::Context;
use tower_http::services::ServeDir;
use tracing::error;

use crate::mail::Mailer;
use crate::store::Database;

pub use templates::Pages;

/// Shared state for every route.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Database>,
    pub mailer: Arc<dyn Mailer>,
    pub pages: Arc<Pages>,
    /// Base for links in outbound email. Derived from the request when unset.
    pub public_base_url: Option<String>,
    /// Recipient of contact-form notifications.
    pub admin_email: Option<String>,
}

/// Build the full application router. Static files are served from `static_dir`.
pub fn router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/about", get(pages::about))
        .route("/contact", get(pages::contact).post(contact::submit_contact))
        .route(
            "/subscribe",
            get(subscribe::subscribe_page).post(subscribe::subscribe),
        )
        .route("/unsubscribe", get(subscribe::unsubscribe))
        .route("/newsletters", get(newsletters::list))
        .route("/newsletter/{id}", get(newsletters::detail))
        .route("/health", get(health))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found)
        // Layers only wrap routes added above, so the fallback must come first.
        .layer(middleware::from_fn(security::guard))
        .with_state(state)
}

/// GET /health
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "landing",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}

/// JSON `{"error": message}` with the given status.
pub(crate) fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({ "error": message.into() }))).into_response()
}

/// Render a page, or a bare 500 if the template fails.
pub(crate) fn render_page(
    state: &AppState,
    status: StatusCode,
    name: &str,
    context: &Context,
) -> Response {
    match state.pages.render(name, context) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!(template = name, error = %e, "Failed to render page");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

/// Base URL for links pointing back at this site.
///
/// Prefers the configured public URL, otherwise rebuilds one from the
/// `Host` and `X-Forwarded-Proto` headers.
pub(crate) fn base_url(state: &AppState, headers: &HeaderMap) -> String {
    if let Some(url) = &state.public_base_url {
        return url.clone();
    }

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    format!("{scheme}://{host}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::DisabledMailer;
    use crate::store::LibSqlBackend;
    use axum::http::HeaderValue;

    async fn state(public_base_url: Option<&str>) -> AppState {
        AppState {
            db: Arc::new(LibSqlBackend::new_memory().await.unwrap()),
            mailer: Arc::new(DisabledMailer),
            pages: Arc::new(Pages::new().unwrap()),
            public_base_url: public_base_url.map(String::from),
            admin_email: None,
        }
    }

    #[tokio::test]
    async fn base_url_prefers_configured_value() {
        let state = state(Some("https://rideaware.org")).await;
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("internal:5000"));
        assert_eq!(base_url(&state, &headers), "https://rideaware.org");
    }

    #[tokio::test]
    async fn base_url_from_headers() {
        let state = state(None).await;
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("rideaware.org"));
        assert_eq!(base_url(&state, &headers), "http://rideaware.org");

        headers.insert("x-forwarded-proto", HeaderValue::from_static("https"));
        assert_eq!(base_url(&state, &headers), "https://rideaware.org");
    }
}
