//! Precedence of checks for a whole contact-form submission.

use std::fmt;

use super::fields::{is_valid_email, is_valid_name, is_valid_subject};
use super::language::is_english_text;
use super::spam::{SpamRule, first_matching_rule};

/// Bounds on the message body, in characters.
pub const MIN_MESSAGE_LEN: usize = 10;
pub const MAX_MESSAGE_LEN: usize = 5000;

/// One contact-form attempt. Fields are trimmed on construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactSubmission {
    pub fn new(
        name: impl AsRef<str>,
        email: impl AsRef<str>,
        subject: impl AsRef<str>,
        message: impl AsRef<str>,
    ) -> Self {
        Self {
            name: name.as_ref().trim().to_string(),
            email: email.as_ref().trim().to_string(),
            subject: subject.as_ref().trim().to_string(),
            message: message.as_ref().trim().to_string(),
        }
    }
}

/// Why a submission was refused. Variants follow check precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    MissingFields,
    InvalidName,
    InvalidEmail,
    InvalidSubject,
    MessageTooShort,
    MessageTooLong,
    NotEnglish,
    Spam(SpamRule),
}

impl Rejection {
    /// Message shown to the person who filled in the form.
    pub fn user_message(&self) -> &'static str {
        match self {
            Rejection::MissingFields => "All fields are required",
            Rejection::InvalidName => "Please provide a valid name",
            Rejection::InvalidEmail => "Please provide a valid email address",
            Rejection::InvalidSubject => "Please select a valid subject",
            Rejection::MessageTooShort => "Message must be at least 10 characters",
            Rejection::MessageTooLong => "Message must be less than 5000 characters",
            Rejection::NotEnglish => "Please submit your message in English",
            Rejection::Spam(_) => {
                "Your message was flagged as spam. Please try again with a different message."
            }
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Spam(rule) => write!(f, "spam ({rule})"),
            other => f.write_str(other.user_message()),
        }
    }
}

/// Run every check in precedence order and return the first failure:
/// required fields, name, email, subject, length bounds, English, spam.
pub fn validate_submission(submission: &ContactSubmission) -> Result<(), Rejection> {
    let ContactSubmission {
        name,
        email,
        subject,
        message,
    } = submission;

    if name.is_empty() || email.is_empty() || subject.is_empty() || message.is_empty() {
        return Err(Rejection::MissingFields);
    }
    if !is_valid_name(name) {
        return Err(Rejection::InvalidName);
    }
    if !is_valid_email(email) {
        return Err(Rejection::InvalidEmail);
    }
    if !is_valid_subject(subject) {
        return Err(Rejection::InvalidSubject);
    }

    let len = message.chars().count();
    if len < MIN_MESSAGE_LEN {
        return Err(Rejection::MessageTooShort);
    }
    if len > MAX_MESSAGE_LEN {
        return Err(Rejection::MessageTooLong);
    }

    if !is_english_text(message) {
        return Err(Rejection::NotEnglish);
    }
    if let Some(rule) = first_matching_rule(message) {
        return Err(Rejection::Spam(rule));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGIT: &str = "I really enjoyed reading your latest newsletter issue and wanted to say thank you for the insight.";

    fn submission(name: &str, email: &str, subject: &str, message: &str) -> ContactSubmission {
        ContactSubmission::new(name, email, subject, message)
    }

    #[test]
    fn accepts_legitimate_submission() {
        let s = submission("Anna Smith", "anna@example.com", "feedback", LEGIT);
        assert_eq!(validate_submission(&s), Ok(()));
    }

    #[test]
    fn fields_are_trimmed() {
        let s = submission("  Anna  ", " anna@example.com\n", "\tgeneral ", "  hi  ");
        assert_eq!(s.name, "Anna");
        assert_eq!(s.email, "anna@example.com");
        assert_eq!(s.subject, "general");
        assert_eq!(s.message, "hi");
    }

    #[test]
    fn whitespace_only_field_is_missing() {
        let s = submission("Anna", "anna@example.com", "general", "    ");
        assert_eq!(validate_submission(&s), Err(Rejection::MissingFields));
    }

    #[test]
    fn precedence_name_before_email_before_subject() {
        let s = submission("J", "bad", "nope", "buy now");
        assert_eq!(validate_submission(&s), Err(Rejection::InvalidName));

        let s = submission("Anna", "bad", "nope", "buy now");
        assert_eq!(validate_submission(&s), Err(Rejection::InvalidEmail));

        let s = submission("Anna", "anna@example.com", "nope", "buy now");
        assert_eq!(validate_submission(&s), Err(Rejection::InvalidSubject));
    }

    #[test]
    fn length_bounds_before_language_and_spam() {
        let s = submission("Anna", "anna@example.com", "general", "buy now");
        assert_eq!(validate_submission(&s), Err(Rejection::MessageTooShort));

        let long = format!("{} ", LEGIT).repeat(60);
        let s = submission("Anna", "anna@example.com", "general", &long);
        assert!(s.message.chars().count() > MAX_MESSAGE_LEN);
        assert_eq!(validate_submission(&s), Err(Rejection::MessageTooLong));
    }

    #[test]
    fn language_before_spam() {
        let s = submission(
            "Anna",
            "anna@example.com",
            "general",
            "xkcdqwrtzp vbnmkjhgf lkjhgfdsa qwrtyp",
        );
        assert_eq!(validate_submission(&s), Err(Rejection::NotEnglish));
    }

    #[test]
    fn spam_reports_rule() {
        let s = submission(
            "Anna",
            "anna@example.com",
            "support",
            "Please visit http://a.com and http://b.com today",
        );
        assert_eq!(
            validate_submission(&s),
            Err(Rejection::Spam(SpamRule::MultipleLinks))
        );
    }

    #[test]
    fn short_but_valid_length_message_is_spam() {
        // Passes the 10-character floor but trips the 15-character spam rule.
        let s = submission("Anna", "anna@example.com", "other", "I want help");
        assert_eq!(validate_submission(&s), Err(Rejection::Spam(SpamRule::TooShort)));
    }

    #[test]
    fn user_messages() {
        assert_eq!(
            Rejection::Spam(SpamRule::Gibberish).user_message(),
            "Your message was flagged as spam. Please try again with a different message."
        );
        assert_eq!(Rejection::NotEnglish.to_string(), "Please submit your message in English");
        assert_eq!(Rejection::Spam(SpamRule::TooShort).to_string(), "spam (too_short)");
    }
}
