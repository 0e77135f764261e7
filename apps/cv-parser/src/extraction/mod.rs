// Field Extraction Pipeline
// Independent, stateless heuristics over the extracted text. None of them can fail:
// a field that is not confidently inferred is simply absent.

pub mod contact;
pub mod experience;
pub mod name;
pub mod summary;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::vocabulary::Vocabulary;

pub use contact::{extract_email, extract_phone};
pub use experience::{extract_experience_band, extract_seniority};
pub use name::{extract_name, CandidateName};
pub use summary::extract_summary;

/// Coarse years-of-experience bucket used by the onboarding form.
///
/// Serialized with an ASCII hyphen. En dash and minus sign spellings are
/// accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceBand {
    #[serde(rename = "3-5 years", alias = "3\u{2013}5 years", alias = "3\u{2212}5 years")]
    ThreeToFive,
    #[serde(rename = "5-7 years", alias = "5\u{2013}7 years", alias = "5\u{2212}7 years")]
    FiveToSeven,
    #[serde(rename = "7-10 years", alias = "7\u{2013}10 years", alias = "7\u{2212}10 years")]
    SevenToTen,
    #[serde(rename = "10+ years")]
    TenPlus,
}

impl ExperienceBand {
    /// First applicable lower bound wins. There is no band below three years.
    pub fn from_years(years: u32) -> Self {
        match years {
            y if y >= 10 => ExperienceBand::TenPlus,
            y if y >= 7 => ExperienceBand::SevenToTen,
            y if y >= 5 => ExperienceBand::FiveToSeven,
            _ => ExperienceBand::ThreeToFive,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExperienceBand::ThreeToFive => "3-5 years",
            ExperienceBand::FiveToSeven => "5-7 years",
            ExperienceBand::SevenToTen => "7-10 years",
            ExperienceBand::TenPlus => "10+ years",
        }
    }

    pub fn lower_bound_years(&self) -> u32 {
        match self {
            ExperienceBand::ThreeToFive => 3,
            ExperienceBand::FiveToSeven => 5,
            ExperienceBand::SevenToTen => 7,
            ExperienceBand::TenPlus => 10,
        }
    }
}

impl fmt::Display for ExperienceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeniorityRank {
    #[serde(rename = "entry level")]
    Entry,
    #[serde(rename = "mid level")]
    Mid,
    #[serde(rename = "senior level")]
    Senior,
}

impl SeniorityRank {
    pub fn label(&self) -> &'static str {
        match self {
            SeniorityRank::Entry => "entry level",
            SeniorityRank::Mid => "mid level",
            SeniorityRank::Senior => "senior level",
        }
    }
}

impl fmt::Display for SeniorityRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of one parse. Every field is independently optional; absent means
/// "not confidently inferred", never an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParsedCandidateFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years_of_experience_band: Option<ExperienceBand>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seniority_rank: Option<SeniorityRank>,
}

impl ParsedCandidateFields {
    /// Number of fields that carry a value.
    pub fn filled_count(&self) -> usize {
        [
            self.first_name.is_some(),
            self.last_name.is_some(),
            self.phone_number.is_some(),
            self.email.is_some(),
            !self.skills.is_empty(),
            self.summary.is_some(),
            self.years_of_experience_band.is_some(),
            !self.roles.is_empty(),
            self.seniority_rank.is_some(),
        ]
        .iter()
        .filter(|filled| **filled)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.filled_count() == 0
    }

    /// Caller-side first-upload-wins merge: a field of `existing` is only
    /// filled from `self` when it is currently empty (blank strings count as
    /// empty). Nothing already in `existing` is overwritten.
    pub fn merge_into(self, existing: ParsedCandidateFields) -> ParsedCandidateFields {
        ParsedCandidateFields {
            first_name: fill_text(existing.first_name, self.first_name),
            last_name: fill_text(existing.last_name, self.last_name),
            phone_number: fill_text(existing.phone_number, self.phone_number),
            email: fill_text(existing.email, self.email),
            skills: fill_list(existing.skills, self.skills),
            summary: fill_text(existing.summary, self.summary),
            years_of_experience_band: existing
                .years_of_experience_band
                .or(self.years_of_experience_band),
            roles: fill_list(existing.roles, self.roles),
            seniority_rank: existing.seniority_rank.or(self.seniority_rank),
        }
    }
}

fn fill_text(current: Option<String>, parsed: Option<String>) -> Option<String> {
    match current {
        Some(value) if !value.trim().is_empty() => Some(value),
        _ => parsed,
    }
}

fn fill_list(current: Vec<String>, parsed: Vec<String>) -> Vec<String> {
    if current.is_empty() {
        parsed
    } else {
        current
    }
}

/// Runs every extractor once over `text` and assembles the record.
pub fn extract_fields(text: &str, vocabulary: &Vocabulary) -> ParsedCandidateFields {
    let (first_name, last_name) = match extract_name(text) {
        Some(name) => (Some(name.first_name), Some(name.last_name)),
        None => (None, None),
    };

    let fields = ParsedCandidateFields {
        first_name,
        last_name,
        phone_number: extract_phone(text),
        email: extract_email(text),
        skills: vocabulary.match_skills(text),
        summary: extract_summary(text),
        years_of_experience_band: extract_experience_band(text),
        roles: vocabulary.match_roles(text),
        seniority_rank: extract_seniority(text),
    };

    debug!(
        "Field extraction filled {}/9 fields ({} skills, {} roles)",
        fields.filled_count(),
        fields.skills.len(),
        fields.roles.len()
    );
    fields
}
