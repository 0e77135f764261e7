//! Years-of-experience band and seniority rank.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{ExperienceBand, SeniorityRank};

// Tried in order. The first one that matches decides the call.
static YEARS_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // "5 years of experience", "5+ yrs experience"
        r"(?i)(\d+)\s*\+?\s*(?:years?|yrs?)\.?\s+(?:of\s+)?experience",
        // "experience: 5 years"
        r"(?i)experience\s*[:-]?\s*(\d+)\s*\+?\s*(?:years?|yrs?)\b",
        // "5 years"
        r"(?i)(\d+)\s*\+?\s*(?:years?|yrs?)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("years pattern compiles"))
    .collect()
});

static BARE_YEARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*\+?\s*(?:years?|yrs?)\b").expect("bare years regex compiles"));

const SENIOR_KEYWORDS: &[&str] = &[
    "senior",
    "sr.",
    "lead",
    "principal",
    "architect",
    "manager",
    "director",
];

const MID_KEYWORDS: &[&str] = &["mid", "intermediate", "experienced", "professional"];

const ENTRY_KEYWORDS: &[&str] = &[
    "entry",
    "junior",
    "jr.",
    "graduate",
    "intern",
    "trainee",
    "associate",
];

/// Seniority tiers in priority order. A higher tier always wins.
static SENIORITY_TIERS: Lazy<Vec<(SeniorityRank, Regex)>> = Lazy::new(|| {
    vec![
        (SeniorityRank::Senior, keyword_pattern(SENIOR_KEYWORDS)),
        (SeniorityRank::Mid, keyword_pattern(MID_KEYWORDS)),
        (SeniorityRank::Entry, keyword_pattern(ENTRY_KEYWORDS)),
    ]
});

/// Keywords may end in punctuation ("sr."), so boundaries are "not a word
/// character" rather than `\b`.
fn keyword_pattern(keywords: &[&str]) -> Regex {
    let alternation = keywords
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?:^|[^\w])(?:{alternation})(?:[^\w]|$)"))
        .expect("seniority keyword pattern compiles")
}

/// Band for the first "N years of experience"-style phrase.
///
/// Only the first pattern that matches is consulted; when its number is not a
/// positive integer the result is `None` even if a later pattern would have
/// produced one.
pub fn extract_experience_band(text: &str) -> Option<ExperienceBand> {
    let caps = YEARS_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(text))?;
    let years = caps[1].parse::<u32>().ok().filter(|y| *y > 0)?;
    Some(ExperienceBand::from_years(years))
}

/// Keyword tiers first, then the first bare "N years" in the text.
pub fn extract_seniority(text: &str) -> Option<SeniorityRank> {
    let lowered = text.to_lowercase();

    if let Some((rank, _)) = SENIORITY_TIERS
        .iter()
        .find(|(_, pattern)| pattern.is_match(&lowered))
    {
        return Some(*rank);
    }

    let caps = BARE_YEARS.captures(&lowered)?;
    let years = caps[1].parse::<u32>().ok()?;
    Some(match years {
        y if y >= 7 => SeniorityRank::Senior,
        y if y >= 4 => SeniorityRank::Mid,
        _ => SeniorityRank::Entry,
    })
}
