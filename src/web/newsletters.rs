//! Newsletter archive pages.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tera::Context;
use tracing::error;

use super::{AppState, render_page};

/// GET /newsletters, newest first.
pub async fn list(State(state): State<AppState>) -> Response {
    let newsletters = match state.db.list_newsletters().await {
        Ok(n) => n,
        Err(e) => {
            error!(error = %e, "Failed to list newsletters");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
        }
    };

    let mut context = Context::new();
    context.insert("newsletters", &newsletters);
    render_page(&state, StatusCode::OK, "newsletters.html", &context)
}

/// GET /newsletter/{id}
pub async fn detail(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Ok(id) = id.parse::<i64>() else {
        return (StatusCode::BAD_REQUEST, "Invalid newsletter ID").into_response();
    };

    match state.db.get_newsletter(id).await {
        Ok(Some(newsletter)) => {
            let mut context = Context::new();
            context.insert("newsletter", &newsletter);
            render_page(&state, StatusCode::OK, "newsletter.html", &context)
        }
        Ok(None) => (StatusCode::NOT_FOUND, "Newsletter not found").into_response(),
        Err(e) => {
            error!(id, error = %e, "Failed to load newsletter");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}
