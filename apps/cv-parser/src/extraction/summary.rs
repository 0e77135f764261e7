//! Professional summary.
//!
//! Three strategies, tried in order:
//! 1. a summary heading with the text inline after a colon,
//! 2. a summary heading with the text on the following lines,
//! 3. no heading: the first prose-sized line near the top.
//!
//! A heading found by 1 or 2 is final; the prose fallback only runs when no
//! heading exists in the first lines at all.

/// Longer synonyms first so "professional summary" is not read as
/// "professional" followed by content.
const SUMMARY_HEADINGS: &[&str] = &[
    "professional summary",
    "career summary",
    "about me",
    "summary",
    "overview",
    "profile",
    "objective",
    "about",
];

const SECTION_HEADINGS: &[&str] = &[
    "experience",
    "education",
    "skills",
    "projects",
    "contact",
    "work",
    "certifications",
];

const HEADING_SEARCH_LINES: usize = 15;
const FALLBACK_SEARCH_LINES: usize = 10;
const MAX_SUMMARY_LINES: usize = 10;
const MAX_INLINE_CONTINUATION_LINES: usize = 3;
/// Content after a heading keyword shorter than this still reads as a heading.
const HEADING_TAIL_CHARS: usize = 20;
const SHORT_CAPS_CHARS: usize = 30;
const MIN_SUMMARY_CHARS: usize = 20;
const MAX_SUMMARY_CHARS: usize = 1000;
const MIN_FALLBACK_CHARS: usize = 50;
const MAX_FALLBACK_CHARS: usize = 500;

#[derive(Debug, PartialEq, Eq)]
enum Heading<'a> {
    /// Heading alone on its line; the summary follows.
    Bare,
    /// "Summary: <content>" with substantial content after the colon.
    Inline(&'a str),
}

pub fn extract_summary(text: &str) -> Option<String> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let heading = lines
        .iter()
        .take(HEADING_SEARCH_LINES)
        .enumerate()
        .find_map(|(idx, line)| summary_heading(line).map(|h| (idx, h)));

    match heading {
        Some((idx, Heading::Inline(content))) => {
            let mut parts = vec![content];
            parts.extend(
                lines[idx + 1..]
                    .iter()
                    .take(MAX_INLINE_CONTINUATION_LINES)
                    .take_while(|line| !looks_like_heading(line)),
            );
            accept(&parts.join(" "))
        }
        Some((idx, Heading::Bare)) => {
            let body = lines[idx + 1..]
                .iter()
                .take(MAX_SUMMARY_LINES)
                .take_while(|line| !is_section_heading(line) && !is_short_caps(line))
                .copied()
                .collect::<Vec<_>>()
                .join(" ");
            accept(&body)
        }
        None => lines
            .iter()
            .take(FALLBACK_SEARCH_LINES)
            .find(|line| {
                let len = line.chars().count();
                !is_all_caps(line) && (MIN_FALLBACK_CHARS..=MAX_FALLBACK_CHARS).contains(&len)
            })
            .and_then(|line| accept(line)),
    }
}

fn summary_heading(line: &str) -> Option<Heading<'_>> {
    for synonym in SUMMARY_HEADINGS {
        let Some(prefix) = line.get(..synonym.len()) else {
            continue;
        };
        if !prefix.eq_ignore_ascii_case(synonym) {
            continue;
        }

        let rest = &line[synonym.len()..];
        // "Profiles", "Abouts": the keyword must end on a word boundary
        if rest.chars().next().is_some_and(char::is_alphanumeric) {
            continue;
        }

        let rest = rest.trim_start();
        if let Some(after_colon) = rest.strip_prefix(':') {
            let content = after_colon.trim();
            if content.chars().count() > HEADING_TAIL_CHARS {
                return Some(Heading::Inline(content));
            }
            return Some(Heading::Bare);
        }
        if rest.chars().count() < HEADING_TAIL_CHARS {
            return Some(Heading::Bare);
        }
    }
    None
}

fn is_section_heading(line: &str) -> bool {
    let line = line.trim_end_matches(':').trim();
    SECTION_HEADINGS.iter().any(|h| line.eq_ignore_ascii_case(h))
}

fn is_all_caps(line: &str) -> bool {
    line.chars().any(char::is_alphabetic) && !line.chars().any(char::is_lowercase)
}

fn is_short_caps(line: &str) -> bool {
    line.chars().count() < SHORT_CAPS_CHARS && is_all_caps(line)
}

fn looks_like_heading(line: &str) -> bool {
    is_section_heading(line) || is_short_caps(line) || summary_heading(line).is_some()
}

/// Whitespace-normalises and enforces the final length bounds.
fn accept(candidate: &str) -> Option<String> {
    let normalized = candidate.split_whitespace().collect::<Vec<_>>().join(" ");
    let len = normalized.chars().count();
    (MIN_SUMMARY_CHARS..=MAX_SUMMARY_CHARS)
        .contains(&len)
        .then_some(normalized)
}
