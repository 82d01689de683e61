//! Rule-based spam detection for contact-form messages.
//!
//! Rules are evaluated in a fixed order and the first match decides.
//! There is no scoring: a message is spam as soon as any rule fires.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Substrings that mark a message as spam wherever they appear, including
/// inside other words.
static SPAM_PHRASES: &[&str] = &[
    "viagra",
    "cialis",
    "casino",
    "lottery",
    "prize",
    "click here",
    "buy now",
    "limited time",
    "congratulations",
    "you have won",
    "claim your",
    "bitcoin",
    "crypto",
    "forex",
    "trading bot",
    "free money",
    "make money fast",
    "work from home",
    "nigerian",
    "inheritance",
    "transfer funds",
    "<!--",
    "javascript:",
    "onclick=",
    "<script",
    "sveiki",
    "ciao",
    "hola",
    "привет",
    "harga",
    "karna",
    "anda",
    "dari",
    "toughalia",
    "comfythings",
    "robertgok",
];

static COMMON_BIGRAMS: LazyLock<HashSet<[char; 2]>> = LazyLock::new(|| {
    [
        "th", "he", "in", "er", "an", "ed", "nd", "to", "en", "ti", "es", "or", "te", "ar", "ou",
        "it", "ha", "is", "co", "me", "we", "be", "se", "as", "de", "so", "re", "st", "up", "at",
        "ai", "al", "il", "le", "li",
    ]
    .iter()
    .map(|pair| {
        let mut chars = pair.chars();
        [chars.next().unwrap_or_default(), chars.next().unwrap_or_default()]
    })
    .collect()
});

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://").expect("link pattern is valid"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}").expect("email pattern is valid")
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?[0-9]{7,}").expect("phone pattern is valid"));

/// One spam rule. Variants are listed in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpamRule {
    /// A known spam phrase appears anywhere in the message.
    SpamPhrase,
    /// Two or more `http://` / `https://` links.
    MultipleLinks,
    /// An email address embedded in the body.
    EmbeddedEmail,
    /// Seven or more consecutive digits.
    PhoneNumber,
    /// More than two `!`.
    ExclamationMarks,
    /// `!!!`, `???` or `...`.
    RepeatedPunctuation,
    /// Mostly uppercase letters.
    ExcessiveCaps,
    /// One word used more than three times.
    RepeatedWords,
    /// Fewer than 15 characters.
    TooShort,
    /// Too many letter pairs that are rare in English.
    Gibberish,
}

impl SpamRule {
    /// All rules, in evaluation order.
    pub const ORDER: [SpamRule; 10] = [
        SpamRule::SpamPhrase,
        SpamRule::MultipleLinks,
        SpamRule::EmbeddedEmail,
        SpamRule::PhoneNumber,
        SpamRule::ExclamationMarks,
        SpamRule::RepeatedPunctuation,
        SpamRule::ExcessiveCaps,
        SpamRule::RepeatedWords,
        SpamRule::TooShort,
        SpamRule::Gibberish,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpamRule::SpamPhrase => "spam_phrase",
            SpamRule::MultipleLinks => "multiple_links",
            SpamRule::EmbeddedEmail => "embedded_email",
            SpamRule::PhoneNumber => "phone_number",
            SpamRule::ExclamationMarks => "exclamation_marks",
            SpamRule::RepeatedPunctuation => "repeated_punctuation",
            SpamRule::ExcessiveCaps => "excessive_caps",
            SpamRule::RepeatedWords => "repeated_words",
            SpamRule::TooShort => "too_short",
            SpamRule::Gibberish => "gibberish",
        }
    }

    fn matches(&self, msg: &Message<'_>) -> bool {
        match self {
            SpamRule::SpamPhrase => SPAM_PHRASES.iter().any(|p| msg.lower.contains(p)),
            SpamRule::MultipleLinks => LINK_RE.find_iter(&msg.lower).count() > 1,
            SpamRule::EmbeddedEmail => EMAIL_RE.is_match(&msg.lower),
            SpamRule::PhoneNumber => PHONE_RE.is_match(&msg.lower),
            SpamRule::ExclamationMarks => msg.lower.matches('!').count() > 2,
            SpamRule::RepeatedPunctuation => ["!!!", "???", "..."]
                .iter()
                .any(|seq| msg.lower.contains(seq)),
            SpamRule::ExcessiveCaps => msg.lower_len > 20 && caps_ratio(msg.original) > 0.6,
            SpamRule::RepeatedWords => has_repeated_words(&msg.lower),
            SpamRule::TooShort => msg.original.chars().count() < 15,
            SpamRule::Gibberish => {
                msg.lower_len > 30 && uncommon_pair_count(&msg.lower) > msg.lower_len / 3
            }
        }
    }
}

impl fmt::Display for SpamRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message prepared once for all rules.
struct Message<'a> {
    original: &'a str,
    lower: String,
    lower_len: usize,
}

impl<'a> Message<'a> {
    fn new(original: &'a str) -> Self {
        let lower = original.to_lowercase();
        let lower_len = lower.chars().count();
        Self {
            original,
            lower,
            lower_len,
        }
    }
}

/// The first rule that flags `message`, or `None` if it looks legitimate.
pub fn first_matching_rule(message: &str) -> Option<SpamRule> {
    let msg = Message::new(message);
    SpamRule::ORDER.into_iter().find(|rule| rule.matches(&msg))
}

pub fn is_spam_message(message: &str) -> bool {
    first_matching_rule(message).is_some()
}

/// Share of uppercase among letters, computed on the original casing.
fn caps_ratio(text: &str) -> f64 {
    let mut letters = 0usize;
    let mut upper = 0usize;
    for c in text.chars().filter(|c| c.is_alphabetic()) {
        letters += 1;
        if c.is_uppercase() {
            upper += 1;
        }
    }
    if letters == 0 {
        return 0.0;
    }
    upper as f64 / letters as f64
}

/// More than five words, one of which occurs more than three times.
/// Splits on whitespace only, so `word` and `word,` are different words.
fn has_repeated_words(lower: &str) -> bool {
    let words: Vec<&str> = lower.split_whitespace().collect();
    if words.len() <= 5 {
        return false;
    }
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for word in words {
        *counts.entry(word).or_default() += 1;
    }
    counts.values().any(|&n| n > 3)
}

/// Adjacent `a`–`z` pairs of two different letters outside the common set.
/// Pairs touching any other character are skipped.
fn uncommon_pair_count(lower: &str) -> usize {
    let chars: Vec<char> = lower.chars().collect();
    chars
        .windows(2)
        .filter(|w| {
            let (a, b) = (w[0], w[1]);
            a.is_ascii_lowercase()
                && b.is_ascii_lowercase()
                && a != b
                && !COMMON_BIGRAMS.contains(&[a, b])
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGIT: &str = "I really enjoyed reading your latest newsletter issue and wanted to say thank you for the insight.";

    #[test]
    fn legitimate_message_passes() {
        assert!(!is_spam_message(LEGIT));
        assert_eq!(first_matching_rule(LEGIT), None);
        assert!(!is_spam_message("I want to ask about your work"));
    }

    #[test]
    fn several_rules_report_the_first() {
        let msg = "buy now!!! http://a.com http://b.com";
        assert!(is_spam_message(msg));
        assert_eq!(first_matching_rule(msg), Some(SpamRule::SpamPhrase));
    }

    #[test]
    fn spam_phrase_is_substring_match() {
        assert_eq!(
            first_matching_rule("Please CLICK HERE to read my proposal"),
            Some(SpamRule::SpamPhrase)
        );
        // "scholarship" contains "hola".
        assert_eq!(
            first_matching_rule("I have a question about the scholarship program"),
            Some(SpamRule::SpamPhrase)
        );
        assert_eq!(
            first_matching_rule("Привет, how are you doing today friend"),
            Some(SpamRule::SpamPhrase)
        );
    }

    #[test]
    fn multiple_links() {
        assert_eq!(
            first_matching_rule("Please visit http://a.com and http://b.com today"),
            Some(SpamRule::MultipleLinks)
        );
        assert_eq!(
            first_matching_rule("See HTTPS://a.com and Http://b.com for the details here"),
            Some(SpamRule::MultipleLinks)
        );
        assert_ne!(
            first_matching_rule("Our page at https://rideaware.org is a good read"),
            Some(SpamRule::MultipleLinks)
        );
    }

    #[test]
    fn embedded_email() {
        assert_eq!(
            first_matching_rule("write to me at bob@example.com please"),
            Some(SpamRule::EmbeddedEmail)
        );
    }

    #[test]
    fn phone_number() {
        assert_eq!(
            first_matching_rule("call me on +15551234567 tomorrow"),
            Some(SpamRule::PhoneNumber)
        );
        assert_eq!(
            first_matching_rule("call me on 5551234 tomorrow ok"),
            Some(SpamRule::PhoneNumber)
        );
        assert_ne!(
            first_matching_rule("call me on 555 1234 tomorrow ok"),
            Some(SpamRule::PhoneNumber)
        );
    }

    #[test]
    fn exclamation_boundary() {
        assert!(!is_spam_message("Great work! Thanks!"));
        assert_eq!(
            first_matching_rule("Hi! Great work! Thanks!"),
            Some(SpamRule::ExclamationMarks)
        );
    }

    #[test]
    fn excessive_caps_boundaries() {
        // Length: 20 characters is never judged, 21 is.
        assert_ne!(
            first_matching_rule("HELLO THERE MY BUDDY"),
            Some(SpamRule::ExcessiveCaps)
        );
        assert_eq!(
            first_matching_rule("HELLO THERE MY BUDDYS"),
            Some(SpamRule::ExcessiveCaps)
        );

        // Ratio: 15 of 25 letters uppercase is exactly 0.6 and passes.
        assert_eq!(caps_ratio("HELLO THERE AGAIN my old buddy"), 0.6);
        assert_ne!(
            first_matching_rule("HELLO THERE AGAIN my old buddy"),
            Some(SpamRule::ExcessiveCaps)
        );
        // 16 of 26 is just over.
        assert_eq!(
            first_matching_rule("HELLO THERE AGAINS my old buddy"),
            Some(SpamRule::ExcessiveCaps)
        );
    }

    #[test]
    fn repeated_punctuation() {
        assert_eq!(
            first_matching_rule("Is this right??? I wonder about it"),
            Some(SpamRule::RepeatedPunctuation)
        );
        assert_eq!(
            first_matching_rule("Well... I wonder about that one"),
            Some(SpamRule::RepeatedPunctuation)
        );
        // Three `!` in a row also exceeds the count, which is checked first.
        assert_eq!(
            first_matching_rule("Wow!!! that is great"),
            Some(SpamRule::ExclamationMarks)
        );
    }

    #[test]
    fn excessive_caps() {
        assert_eq!(
            first_matching_rule("THIS IS A VERY LOUD MESSAGE FOR YOU"),
            Some(SpamRule::ExcessiveCaps)
        );
        // Short shouting is not judged on caps.
        assert_ne!(
            first_matching_rule("HELLO THERE FRIEND"),
            Some(SpamRule::ExcessiveCaps)
        );
    }

    #[test]
    fn repeated_words() {
        assert_eq!(
            first_matching_rule("spam spam spam spam is what I see here"),
            Some(SpamRule::RepeatedWords)
        );
        // Exactly three repeats is fine.
        assert_ne!(
            first_matching_rule("ride ride ride is what I do every weekend"),
            Some(SpamRule::RepeatedWords)
        );
        // Five words or fewer are never judged.
        assert_ne!(
            first_matching_rule("go go go go go"),
            Some(SpamRule::RepeatedWords)
        );
    }

    #[test]
    fn short_message_boundary() {
        assert_eq!("Hi there friend".chars().count(), 15);
        assert!(!is_spam_message("Hi there friend"));
        assert_eq!("Hi there frien".chars().count(), 14);
        assert_eq!(first_matching_rule("Hi there frien"), Some(SpamRule::TooShort));
    }

    #[test]
    fn short_message_with_earlier_rule_reports_earlier_rule() {
        assert_eq!(first_matching_rule("free money"), Some(SpamRule::SpamPhrase));
        assert_eq!(first_matching_rule("Hi! there! fri!"), Some(SpamRule::ExclamationMarks));
    }

    #[test]
    fn gibberish() {
        assert_eq!(
            first_matching_rule("xkcdqwrtzp vbnmkjhgf lkjhgfdsa qwrtyp"),
            Some(SpamRule::Gibberish)
        );
        // Doubled letters never count as uncommon.
        assert!(!is_spam_message(
            "zzzz qqqq wwww xxxx yyyy vvvv bbbb nnnn mmmm kkkk jjjj hhhh gggg"
        ));
    }

    #[test]
    fn gibberish_only_past_thirty_characters() {
        let msg = "xkcdqwrtzp vbnmkjhgf lkjhgfd";
        assert!(msg.chars().count() <= 30);
        assert_eq!(first_matching_rule(msg), None);
    }

    #[test]
    fn uncommon_pairs_skip_non_ascii_and_separators() {
        assert_eq!(uncommon_pair_count("th he"), 0);
        assert_eq!(uncommon_pair_count("xz"), 1);
        assert_eq!(uncommon_pair_count("x z"), 0);
        assert_eq!(uncommon_pair_count("xéz"), 0);
        assert_eq!(uncommon_pair_count("aa"), 0);
    }

    #[test]
    fn rule_order_is_stable() {
        assert_eq!(SpamRule::ORDER.first(), Some(&SpamRule::SpamPhrase));
        assert_eq!(SpamRule::ORDER.last(), Some(&SpamRule::Gibberish));
        assert_eq!(SpamRule::TooShort.to_string(), "too_short");
    }

    #[test]
    fn deterministic() {
        for msg in [LEGIT, "buy now", "Hi there frien", ""] {
            assert_eq!(first_matching_rule(msg), first_matching_rule(msg));
        }
    }
}
