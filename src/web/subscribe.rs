//! Newsletter subscription and unsubscription.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tera::Context;
use tracing::{error, info, warn};

use super::{AppState, base_url, json_error, render_page};
use crate::error::DatabaseError;
use crate::mail::messages;

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct UnsubscribeParams {
    pub email: Option<String>,
}

/// GET /subscribe. Only POST is served here.
pub async fn subscribe_page() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}

/// POST /subscribe with JSON `{"email": ".."}`.
pub async fn subscribe(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<SubscribeRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, "Invalid subscribe request");
            return json_error(StatusCode::BAD_REQUEST, "Invalid request");
        }
    };

    let email = request.email.trim();
    if email.is_empty() {
        return json_error(StatusCode::BAD_REQUEST, "Email is required");
    }

    match state.db.add_subscriber(email).await {
        Ok(subscriber) => info!(id = subscriber.id, email = %email, "New subscriber"),
        Err(DatabaseError::Constraint(_)) => {
            return json_error(StatusCode::BAD_REQUEST, "Email already exists");
        }
        Err(e) => {
            error!(email = %email, error = %e, "Failed to add subscriber");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
        }
    }

    let link = messages::unsubscribe_link(&base_url(&state, &headers), email);
    match state
        .mailer
        .send(messages::subscription_confirmation(email, &link))
        .await
    {
        Ok(()) => info!(email = %email, "Confirmation email sent"),
        Err(e) => error!(email = %email, error = %e, "Failed to send confirmation email"),
    }

    (
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "Email has been added" })),
    )
        .into_response()
}

/// GET /unsubscribe?email=..
pub async fn unsubscribe(
    State(state): State<AppState>,
    Query(params): Query<UnsubscribeParams>,
) -> Response {
    let email = params.email.as_deref().map(str::trim).unwrap_or_default();

    let (status, message) = if email.is_empty() {
        (StatusCode::BAD_REQUEST, "No email specified".to_string())
    } else {
        match state.db.remove_subscriber(email).await {
            Ok(true) => {
                info!(email = %email, "Unsubscribed");
                (
                    StatusCode::OK,
                    format!("The email {email} has been unsubscribed."),
                )
            }
            Ok(false) => (
                StatusCode::BAD_REQUEST,
                format!("Email {email} was not found or already unsubscribed"),
            ),
            Err(e) => {
                error!(email = %email, error = %e, "Failed to unsubscribe");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong. Please try again later.".to_string(),
                )
            }
        }
    };

    let mut context = Context::new();
    context.insert("message", &message);
    render_page(&state, status, "unsubscribe.html", &context)
}
