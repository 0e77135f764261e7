use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum digits for a sequence to count as a phone number.
const MIN_PHONE_DIGITS: usize = 10;

// Formatting characters never cross a line break.
static PHONE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // +CC NNN-NNN-NNNN and friends
        r"(?:\+?\d{1,3}[ \t.-]?)?\(?\d{3}\)?[ \t.-]?\d{3}[ \t.-]?\d{4}",
        // any looser grouping of digits
        r"\+?\d[\d \t().-]{8,}\d",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("phone pattern compiles"))
    .collect()
});

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("email regex compiles")
});

/// First phone-like sequence with at least ten digits, formatting stripped.
pub fn extract_phone(text: &str) -> Option<String> {
    PHONE_PATTERNS.iter().find_map(|pattern| {
        pattern
            .find_iter(text)
            .map(|m| digits_only(m.as_str()))
            .find(|digits| digits.len() >= MIN_PHONE_DIGITS)
    })
}

/// First `local@domain.tld` in the text, verbatim.
pub fn extract_email(text: &str) -> Option<String> {
    EMAIL.find(text).map(|m| m.as_str().to_string())
}

fn digits_only(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}
