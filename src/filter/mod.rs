//! Contact-form submission filter.
//!
//! Pure, stateless checks over plain text. All rule sets are immutable
//! statics built on first use and shared read-only, so every function here
//! is safe to call from any number of concurrent requests.
//!
//! The contact handler runs the checks through [`validate_submission`],
//! which applies them in a fixed precedence and reports the first failure.

pub mod fields;
pub mod language;
pub mod spam;
pub mod submission;

pub use fields::{VALID_SUBJECTS, is_valid_email, is_valid_name, is_valid_subject};
pub use language::is_english_text;
pub use spam::{SpamRule, first_matching_rule, is_spam_message};
pub use submission::{ContactSubmission, Rejection, validate_submission};
