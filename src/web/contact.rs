//! POST /contact: validate a contact-form submission and act on it.

use axum::Json;
use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::{error, info, warn};

use super::{AppState, json_error};
use crate::error::DatabaseError;
use crate::filter::{ContactSubmission, Rejection, validate_submission};
use crate::mail::messages;

pub const THANK_YOU: &str = "Thank you for your message. We'll get back to you soon!";

/// Raw form fields. Missing fields arrive empty and fail validation.
#[derive(Debug, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    /// Checkbox; browsers send `on` when ticked.
    #[serde(default)]
    pub subscribe: Option<String>,
}

impl ContactForm {
    fn wants_subscription(&self) -> bool {
        self.subscribe.as_deref() == Some("on")
    }
}

/// POST /contact
///
/// Rejections are reported as 400 `{"error": ..}`. Once a submission is
/// accepted the reply is always 201; subscription, email and storage
/// failures are only logged.
pub async fn submit_contact(
    State(state): State<AppState>,
    form: Result<Form<ContactForm>, FormRejection>,
) -> Response {
    let Form(form) = match form {
        Ok(form) => form,
        Err(e) => {
            warn!(error = %e, "Unparseable contact form");
            return json_error(StatusCode::BAD_REQUEST, "Failed to parse form data");
        }
    };

    let subscribe = form.wants_subscription();
    let submission = ContactSubmission::new(form.name, form.email, form.subject, form.message);

    if let Err(rejection) = validate_submission(&submission) {
        log_rejection(&submission, rejection);
        return json_error(StatusCode::BAD_REQUEST, rejection.user_message());
    }

    if subscribe {
        match state.db.add_subscriber(&submission.email).await {
            Ok(_) => info!(email = %submission.email, "New subscriber added from contact form"),
            Err(DatabaseError::Constraint(_)) => {
                info!(email = %submission.email, "Subscriber already exists")
            }
            Err(e) => warn!(email = %submission.email, error = %e, "Failed to add subscriber"),
        }
    }

    match state
        .mailer
        .send(messages::contact_confirmation(&submission))
        .await
    {
        Ok(()) => info!(email = %submission.email, "Contact confirmation sent"),
        Err(e) => error!(email = %submission.email, error = %e, "Failed to send contact confirmation"),
    }

    if let Some(admin) = &state.admin_email {
        match state
            .mailer
            .send(messages::contact_notification(admin, &submission))
            .await
        {
            Ok(()) => info!(admin = %admin, "Contact notification sent to admin"),
            Err(e) => error!(error = %e, "Failed to send contact notification to admin"),
        }
    }

    if let Err(e) = state
        .db
        .insert_contact_message(
            &submission.name,
            &submission.email,
            &submission.subject,
            &submission.message,
        )
        .await
    {
        warn!(error = %e, "Failed to save contact message");
    }

    info!(name = %submission.name, email = %submission.email, "Contact form submitted");
    (
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": THANK_YOU })),
    )
        .into_response()
}

fn log_rejection(submission: &ContactSubmission, rejection: Rejection) {
    match rejection {
        Rejection::InvalidName => warn!(name = %submission.name, "Rejected submission: invalid name"),
        Rejection::InvalidEmail => {
            warn!(email = %submission.email, "Rejected submission: invalid email")
        }
        Rejection::InvalidSubject => {
            warn!(subject = %submission.subject, "Rejected submission: invalid subject")
        }
        Rejection::NotEnglish | Rejection::Spam(_) => warn!(
            name = %submission.name,
            email = %submission.email,
            reason = %rejection,
            "Rejected submission"
        ),
        _ => {}
    }
}
