//! Structural checks for the name, email and subject fields.

/// Subjects the contact form offers. Matching is exact and case-sensitive.
pub const VALID_SUBJECTS: [&str; 5] = ["general", "support", "partnership", "feedback", "other"];

/// A plausible human name: 2–100 characters, at most a third digits, no URLs.
pub fn is_valid_name(name: &str) -> bool {
    let len = name.chars().count();
    if !(2..=100).contains(&len) {
        return false;
    }

    let digits = name.chars().filter(|c| c.is_ascii_digit()).count();
    if digits > 0 && digits * 3 > len {
        return false;
    }

    !(name.contains("http") || name.contains("://"))
}

/// Structural sanity check, not RFC 5322 validation.
pub fn is_valid_email(email: &str) -> bool {
    if !email.contains('@') || !email.contains('.') {
        return false;
    }

    let parts: Vec<&str> = email.split('@').collect();
    let [local, domain] = parts.as_slice() else {
        return false;
    };

    if !(1..=64).contains(&local.chars().count()) {
        return false;
    }
    if !(3..=255).contains(&domain.chars().count()) {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels
            .iter()
            .all(|label| (1..=63).contains(&label.chars().count()))
}

pub fn is_valid_subject(subject: &str) -> bool {
    VALID_SUBJECTS.contains(&subject)
}
