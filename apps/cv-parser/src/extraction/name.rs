//! Candidate name from the first non-empty line.
//!
//! Résumés lead with the candidate's name, often followed on the same line by
//! a title or a location ("Jane Smith, Software Engineer | Lagos"). That noise
//! is cut first, then a short rule chain picks the two name tokens.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateName {
    pub first_name: String,
    pub last_name: String,
}

impl CandidateName {
    fn new(first: &str, last: &str) -> Self {
        Self {
            first_name: first.to_string(),
            last_name: last.to_string(),
        }
    }
}

// Trailing noise, tried in this order.
static STOP_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // job titles, with any specialisation words in front of them
        r"(?i)\b(?:(?:senior|junior|lead|principal|staff|software|full[- ]?stack|front[- ]?end|back[- ]?end|web|mobile|data|devops|cloud|product|project|qa)\s+)*(?:engineer|developer|designer|analyst|scientist|manager|architect|consultant|intern|specialist|programmer)\b",
        // specialisations on their own
        r"(?i)\b(?:software|full[- ]?stack|front[- ]?end|back[- ]?end|devops|machine learning|data science|ui/ux)\b",
        // places that show up next to names on this platform
        r"(?i)\b(?:lagos|abuja|port harcourt|ibadan|nigeria|accra|ghana|nairobi|kenya|johannesburg|cape town|south africa|london|united kingdom|new york|usa|united states|canada|toronto|berlin|germany|remote)\b",
        // separator followed by another capitalised token
        r"\s*[,|–—-]\s*\p{Lu}",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("name stop pattern compiles"))
    .collect()
});

static CAPITALIZED_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\p{Lu}[\p{L}'’-]+").expect("capitalized word regex compiles"));

static LAST_COMMA_FIRST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\p{Lu}[\p{L}'’-]+)\s*,\s*(\p{Lu}[\p{L}'’-]+)")
        .expect("last-first regex compiles")
});

static TWO_CAPITALIZED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\p{Lu}[\p{L}'’-]+)\s+(\p{Lu}[\p{L}'’-]+)").expect("first-last regex compiles")
});

type NameRule = fn(&str) -> Option<CandidateName>;

/// Evaluated in order; the first rule that produces a name wins.
const NAME_RULES: &[NameRule] = &[
    last_comma_first,
    consecutive_capitalized,
    first_two_capitalized,
];

pub fn extract_name(text: &str) -> Option<CandidateName> {
    let first_line = text.lines().map(str::trim).find(|line| !line.is_empty())?;
    let line = strip_trailing_noise(first_line);
    NAME_RULES.iter().find_map(|rule| rule(line))
}

/// Cuts the line at each stop pattern in turn, but only when at least two
/// capitalised words would survive the cut.
fn strip_trailing_noise(line: &str) -> &str {
    let mut line = line;
    for pattern in STOP_PATTERNS.iter() {
        if let Some(m) = pattern.find(line) {
            let head = &line[..m.start()];
            if CAPITALIZED_WORD.find_iter(head).count() >= 2 {
                line = head.trim_end_matches(|c: char| {
                    c.is_whitespace() || matches!(c, ',' | '|' | '-' | '–' | '—')
                });
            }
        }
    }
    line
}

fn last_comma_first(line: &str) -> Option<CandidateName> {
    let caps = LAST_COMMA_FIRST.captures(line)?;
    Some(CandidateName::new(&caps[2], &caps[1]))
}

fn consecutive_capitalized(line: &str) -> Option<CandidateName> {
    let caps = TWO_CAPITALIZED.captures(line)?;
    Some(CandidateName::new(&caps[1], &caps[2]))
}

fn first_two_capitalized(line: &str) -> Option<CandidateName> {
    let mut words = CAPITALIZED_WORD.find_iter(line);
    let first = words.next()?;
    let last = words.next()?;
    Some(CandidateName::new(first.as_str(), last.as_str()))
}
