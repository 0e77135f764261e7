use std::collections::HashSet;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::errors::MatchError;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Cosine similarity of two equal-length embeddings. A zero vector scores 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, MatchError> {
    if a.is_empty() || b.is_empty() {
        return Err(MatchError::EmptyEmbedding);
    }
    if a.len() != b.len() {
        return Err(MatchError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let (dot, norm_a, norm_b) = a.iter().zip(b).fold(
        (0.0_f64, 0.0_f64, 0.0_f64),
        |(dot, na, nb), (x, y)| {
            let (x, y) = (f64::from(*x), f64::from(*y));
            (dot + x * y, na + x * x, nb + y * y)
        },
    );

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (norm_a.sqrt() * norm_b.sqrt()))
}

/// Jaccard overlap of trimmed, lowercased skill sets.
/// No candidate skills: 0.0. Job lists no skills: 0.5.
pub fn skills_similarity(candidate: &[String], job: &[String]) -> f64 {
    if candidate.is_empty() {
        return 0.0;
    }
    if job.is_empty() {
        return 0.5;
    }

    let candidate = normalised_set(candidate);
    let job = normalised_set(job);
    if candidate.is_empty() || job.is_empty() {
        return 0.0;
    }

    let intersection = candidate.intersection(&job).count();
    let union = candidate.union(&job).count();
    intersection as f64 / union as f64
}

fn normalised_set(skills: &[String]) -> HashSet<String> {
    skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Exact match 1.0, one containing the other 0.7, otherwise 0.0.
/// A job with no stated requirement is neutral (0.5).
pub fn education_similarity(candidate: Option<&str>, job: Option<&str>) -> f64 {
    let job = match job.map(str::trim).filter(|j| !j.is_empty()) {
        Some(j) => j.to_lowercase(),
        None => return 0.5,
    };
    let candidate = match candidate.map(str::trim).filter(|c| !c.is_empty()) {
        Some(c) => c.to_lowercase(),
        None => return 0.0,
    };

    if candidate == job {
        1.0
    } else if candidate.contains(&job) || job.contains(&candidate) {
        0.7
    } else {
        0.0
    }
}

/// Linear falloff around the job's required years; a miss by the full
/// requirement or more scores 0.0. A job with no requirement scores 0.6.
pub fn experience_similarity(candidate_years: Option<f64>, job_years: Option<f64>) -> f64 {
    let Some(job_years) = job_years else {
        return 0.6;
    };
    let Some(candidate_years) = candidate_years else {
        return 0.0;
    };

    let diff = (candidate_years - job_years).abs();
    if diff >= job_years {
        return 0.0;
    }
    (1.0 - diff / job_years.max(1.0)).max(0.0)
}

/// Exponential decay of a posting's age with the given half-life.
///
/// Missing timestamp: 0.5. Unparseable timestamp: 0.4. Future or current: 1.0.
pub fn freshness_score(updated_at: Option<&str>, now: DateTime<Utc>, half_life_days: f64) -> f64 {
    let Some(raw) = updated_at.map(str::trim).filter(|s| !s.is_empty()) else {
        return 0.5;
    };
    let Some(timestamp) = parse_timestamp(raw) else {
        return 0.4;
    };

    let age_days = (now - timestamp).num_seconds() as f64 / SECONDS_PER_DAY;
    if age_days <= 0.0 {
        return 1.0;
    }
    if half_life_days <= 0.0 {
        return 0.5;
    }
    0.5_f64.powf(age_days / half_life_days).clamp(0.0, 1.0)
}

/// RFC 3339 with offset or `Z`, or a naive ISO timestamp/date taken as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
