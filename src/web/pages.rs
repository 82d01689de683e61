//! Static content pages.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use tera::Context;

use super::{AppState, render_page};
use crate::filter::VALID_SUBJECTS;

/// GET /
pub async fn index(State(state): State<AppState>) -> Response {
    render_page(&state, StatusCode::OK, "index.html", &Context::new())
}

/// GET /about
pub async fn about(State(state): State<AppState>) -> Response {
    render_page(&state, StatusCode::OK, "about.html", &Context::new())
}

/// GET /contact
pub async fn contact(State(state): State<AppState>) -> Response {
    let mut context = Context::new();
    context.insert("subjects", &VALID_SUBJECTS);
    render_page(&state, StatusCode::OK, "contact.html", &context)
}
