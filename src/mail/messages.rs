//! Bodies of the transactional emails. User-supplied values are HTML-escaped.

use tera::escape_html;

use crate::filter::ContactSubmission;
use crate::mail::OutgoingEmail;

/// Build the unsubscribe URL for `email` under `base_url` (no trailing slash).
pub fn unsubscribe_link(base_url: &str, email: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(email.as_bytes()).collect();
    format!("{base_url}/unsubscribe?email={encoded}")
}

/// Sent after a successful newsletter subscription.
pub fn subscription_confirmation(to: &str, unsubscribe_url: &str) -> OutgoingEmail {
    let html_body = format!(
        r#"<html>
<body>
  <h1>Welcome to RideAware!</h1>
  <p>Thank you for subscribing to our newsletter.</p>
  <p><a href="{link}">Unsubscribe</a></p>
</body>
</html>"#,
        link = escape_html(unsubscribe_url),
    );

    OutgoingEmail {
        to: to.to_string(),
        subject: "Thanks for subscribing!".to_string(),
        html_body,
    }
}

/// Sent to the person who filled in the contact form.
pub fn contact_confirmation(submission: &ContactSubmission) -> OutgoingEmail {
    let html_body = format!(
        r#"<html>
<body>
  <h2>Thank you for reaching out, {name}!</h2>
  <p>We've received your message and will get back to you as soon as possible.</p>
  <p>In the meantime, feel free to check out more about RideAware on our website.</p>
  <p>Best regards,<br>The RideAware Team</p>
</body>
</html>"#,
        name = escape_html(&submission.name),
    );

    OutgoingEmail {
        to: submission.email.clone(),
        subject: "We received your message - RideAware".to_string(),
        html_body,
    }
}

/// Sent to the site admin for every accepted contact message.
pub fn contact_notification(admin_email: &str, submission: &ContactSubmission) -> OutgoingEmail {
    let message = escape_html(&submission.message).replace('\n', "<br>");
    let html_body = format!(
        r#"<html>
<body>
  <h3>New Contact Message</h3>
  <p><strong>From:</strong> {name} ({email})</p>
  <p><strong>Subject:</strong> {subject}</p>
  <h4>Message:</h4>
  <p>{message}</p>
</body>
</html>"#,
        name = escape_html(&submission.name),
        email = escape_html(&submission.email),
        subject = escape_html(&submission.subject),
    );

    OutgoingEmail {
        to: admin_email.to_string(),
        subject: format!("New contact message from {}", submission.name),
        html_body,
    }
}
