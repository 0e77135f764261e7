// Candidate Matching
// Ranks job postings for one candidate or a batch of candidates: embedding similarity blended with skills,
// education, experience and posting freshness. Embeddings are inputs; nothing here
// calls a model or keeps results between calls.

pub mod scoring;

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::MatchError;
use crate::extraction::ParsedCandidateFields;

use scoring::{
    cosine_similarity, education_similarity, experience_similarity, freshness_score,
    skills_similarity,
};

pub const DEFAULT_MIN_SCORE: f64 = 0.3;
pub const DEFAULT_MAX_RESULTS: usize = 50;
pub const DEFAULT_FRESHNESS_HALF_LIFE_DAYS: f64 = 30.0;

// ────────────────────────────────────────────────────────────────────────────
// Inputs
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CandidateProfile {
    pub embedding: Vec<f32>,
    pub skills: Vec<String>,
    pub education: Option<String>,
    pub experience_years: Option<f64>,
}

impl CandidateProfile {
    pub fn from_parsed(fields: &ParsedCandidateFields, embedding: Vec<f32>) -> Self {
        Self {
            embedding,
            ..Default::default()
        }
        .with_parsed_fields(fields)
    }

    /// Fills skills and experience from a parsed CV where the profile has
    /// none. A band contributes its lower bound in years.
    pub fn with_parsed_fields(mut self, fields: &ParsedCandidateFields) -> Self {
        if self.skills.is_empty() {
            self.skills = fields.skills.clone();
        }
        if self.experience_years.is_none() {
            self.experience_years = fields
                .years_of_experience_band
                .map(|band| f64::from(band.lower_bound_years()));
        }
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobPosting {
    pub id: String,
    pub embedding: Vec<f32>,
    pub skills: Vec<String>,
    pub education: Option<String>,
    pub experience_years: Option<f64>,
    /// ISO 8601 timestamp of the last edit.
    pub updated_at: Option<String>,
}

/// Relative factor weights. Normalised before use, so only ratios matter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchWeights {
    pub embedding: f64,
    pub skills: f64,
    pub education: f64,
    pub experience: f64,
    pub freshness: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            embedding: 0.6,
            skills: 0.2,
            education: 0.1,
            experience: 0.05,
            freshness: 0.05,
        }
    }
}

impl MatchWeights {
    /// Negative weights count as zero. If nothing positive is left the score
    /// is the embedding similarity alone.
    pub fn normalised(&self) -> MatchWeights {
        let clamped = MatchWeights {
            embedding: self.embedding.max(0.0),
            skills: self.skills.max(0.0),
            education: self.education.max(0.0),
            experience: self.experience.max(0.0),
            freshness: self.freshness.max(0.0),
        };
        let total = clamped.embedding
            + clamped.skills
            + clamped.education
            + clamped.experience
            + clamped.freshness;

        if total == 0.0 {
            return MatchWeights {
                embedding: 1.0,
                skills: 0.0,
                education: 0.0,
                experience: 0.0,
                freshness: 0.0,
            };
        }

        MatchWeights {
            embedding: clamped.embedding / total,
            skills: clamped.skills / total,
            education: clamped.education / total,
            experience: clamped.experience / total,
            freshness: clamped.freshness / total,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchOptions {
    pub min_score: f64,
    pub limit: usize,
    pub weights: MatchWeights,
    pub freshness_half_life_days: f64,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            limit: DEFAULT_MAX_RESULTS,
            weights: MatchWeights::default(),
            freshness_half_life_days: DEFAULT_FRESHNESS_HALF_LIFE_DAYS,
        }
    }
}

/// One candidate against a batch of postings, as read by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    pub candidate: CandidateProfile,
    pub jobs: Vec<JobPosting>,
    #[serde(default)]
    pub options: Option<MatchOptions>,
}

/// One entry of a batch request: an optional caller id plus the profile fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchCandidate {
    #[serde(default)]
    pub id: String,
    #[serde(flatten)]
    pub profile: CandidateProfile,
}

/// Many candidates against one shared list of postings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchMatchRequest {
    pub candidates: Vec<BatchCandidate>,
    pub jobs: Vec<JobPosting>,
    #[serde(default)]
    pub options: Option<MatchOptions>,
}

impl BatchMatchRequest {
    pub fn id_profile_pairs(&self) -> Vec<(String, CandidateProfile)> {
        self.candidates
            .iter()
            .map(|c| (c.id.clone(), c.profile.clone()))
            .collect()
    }
}

/// Either request shape; told apart by `candidate` vs `candidates`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatchInput {
    Single(MatchRequest),
    Batch(BatchMatchRequest),
}

// ────────────────────────────────────────────────────────────────────────────
// Outputs
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchFactors {
    pub embedding: f64,
    pub skills: f64,
    pub education: f64,
    pub experience: f64,
    pub freshness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub id: String,
    pub score: f64, // 0.0 – 1.0, four decimals
    pub factors: MatchFactors,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateMatches {
    pub candidate_id: String,
    pub matches: Vec<MatchResult>,
}

// ────────────────────────────────────────────────────────────────────────────
// Matcher trait
// ────────────────────────────────────────────────────────────────────────────

/// Ranks postings for a candidate. Implement this to swap in another
/// ranking backend; callers hold an `Arc<dyn CandidateMatcher>`.
#[async_trait]
pub trait CandidateMatcher: Send + Sync {
    async fn rank(
        &self,
        candidate: &CandidateProfile,
        jobs: &[JobPosting],
        options: &MatchOptions,
    ) -> Result<Vec<MatchResult>, MatchError>;

    /// Ranks the shared postings for every candidate, in input order. The
    /// first failing candidate fails the batch.
    async fn rank_batch(
        &self,
        candidates: &[(String, CandidateProfile)],
        jobs: &[JobPosting],
        options: &MatchOptions,
    ) -> Result<Vec<CandidateMatches>, MatchError> {
        let mut results = Vec::with_capacity(candidates.len());
        for (candidate_id, candidate) in candidates {
            let matches = self.rank(candidate, jobs, options).await?;
            results.push(CandidateMatches {
                candidate_id: candidate_id.clone(),
                matches,
            });
        }
        Ok(results)
    }
}

/// Default matcher: weighted sum of the five factors.
///
/// Algorithm:
/// 1. Drop postings without an id or embedding; keep the first of duplicate ids
/// 2. Score each factor; the embedding factor is clamped to 0.0 – 1.0
/// 3. Weighted sum with normalised weights; drop below `min_score`
/// 4. Sort descending (ties keep input order), keep the first `limit`
#[derive(Debug, Clone, Default)]
pub struct WeightedMatcher {
    now: Option<DateTime<Utc>>,
}

impl WeightedMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matcher with a fixed clock for freshness scoring.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now: Some(now) }
    }
}

#[async_trait]
impl CandidateMatcher for WeightedMatcher {
    async fn rank(
        &self,
        candidate: &CandidateProfile,
        jobs: &[JobPosting],
        options: &MatchOptions,
    ) -> Result<Vec<MatchResult>, MatchError> {
        rank_jobs(candidate, jobs, options, self.now.unwrap_or_else(Utc::now))
    }

    // One clock reading for the whole batch.
    async fn rank_batch(
        &self,
        candidates: &[(String, CandidateProfile)],
        jobs: &[JobPosting],
        options: &MatchOptions,
    ) -> Result<Vec<CandidateMatches>, MatchError> {
        rank_batch(candidates, jobs, options, self.now.unwrap_or_else(Utc::now))
    }
}

pub fn rank_jobs(
    candidate: &CandidateProfile,
    jobs: &[JobPosting],
    options: &MatchOptions,
    now: DateTime<Utc>,
) -> Result<Vec<MatchResult>, MatchError> {
    if candidate.embedding.is_empty() {
        return Err(MatchError::EmptyEmbedding);
    }

    let jobs = deduplicate(jobs);
    if jobs.is_empty() {
        return Ok(vec![]);
    }

    let min_score = options.min_score.clamp(0.0, 1.0);
    let limit = options.limit.max(1);
    let weights = options.weights.normalised();

    let mut results = Vec::with_capacity(jobs.len());
    for job in jobs {
        let factors = MatchFactors {
            embedding: cosine_similarity(&candidate.embedding, &job.embedding)?.clamp(0.0, 1.0),
            skills: skills_similarity(&candidate.skills, &job.skills),
            education: education_similarity(
                candidate.education.as_deref(),
                job.education.as_deref(),
            ),
            experience: experience_similarity(candidate.experience_years, job.experience_years),
            freshness: freshness_score(
                job.updated_at.as_deref(),
                now,
                options.freshness_half_life_days,
            ),
        };

        let score = factors.embedding * weights.embedding
            + factors.skills * weights.skills
            + factors.education * weights.education
            + factors.experience * weights.experience
            + factors.freshness * weights.freshness;

        if score < min_score {
            continue;
        }

        results.push(MatchResult {
            id: job.id.clone(),
            score: round4(score),
            factors: MatchFactors {
                embedding: round4(factors.embedding),
                skills: round4(factors.skills),
                education: round4(factors.education),
                experience: round4(factors.experience),
                freshness: round4(factors.freshness),
            },
        });
    }

    let matched = results.len();
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results.truncate(limit);

    debug!(
        "{matched} posting(s) scored at or above {min_score:.2}, returning {}",
        results.len()
    );
    Ok(results)
}

pub fn rank_batch(
    candidates: &[(String, CandidateProfile)],
    jobs: &[JobPosting],
    options: &MatchOptions,
    now: DateTime<Utc>,
) -> Result<Vec<CandidateMatches>, MatchError> {
    let results = candidates
        .iter()
        .map(|(candidate_id, candidate)| {
            Ok(CandidateMatches {
                candidate_id: candidate_id.clone(),
                matches: rank_jobs(candidate, jobs, options, now)?,
            })
        })
        .collect::<Result<Vec<_>, MatchError>>()?;

    debug!(
        "Ranked {} posting(s) for {} candidate(s)",
        jobs.len(),
        results.len()
    );
    Ok(results)
}

fn deduplicate(jobs: &[JobPosting]) -> Vec<&JobPosting> {
    let mut seen = HashSet::new();
    jobs.iter()
        .filter(|job| !job.id.is_empty() && !job.embedding.is_empty())
        .filter(|job| seen.insert(job.id.as_str()))
        .collect()
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::ExperienceBand;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn candidate() -> CandidateProfile {
        CandidateProfile {
            embedding: vec![1.0, 0.0],
            skills: vec!["Rust".to_string()],
            education: None,
            experience_years: Some(5.0),
        }
    }

    fn job(id: &str, embedding: [f32; 2], skills: &[&str], years: Option<f64>) -> JobPosting {
        JobPosting {
            id: id.to_string(),
            embedding: embedding.to_vec(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            education: None,
            experience_years: years,
            updated_at: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn sample_jobs() -> Vec<JobPosting> {
        vec![
            job("weak", [0.0, 1.0], &[], None),
            job("partial", [1.0, 1.0], &["rust", "go"], Some(5.0)),
            job("exact", [1.0, 0.0], &["rust"], Some(5.0)),
        ]
    }

    #[test]
    fn test_default_weights_ranking() {
        let results = rank_jobs(&candidate(), &sample_jobs(), &MatchOptions::default(), now()).unwrap();
        let ids: Vec<_> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["exact", "partial"]);

        // 0.6*1 + 0.2*1 + 0.1*0.5 + 0.05*1 + 0.05*0.5
        assert!((results[0].score - 0.925).abs() < 1e-9, "Score was {}", results[0].score);
        // 0.6*0.7071 + 0.2*0.5 + 0.1*0.5 + 0.05*1 + 0.05*0.5
        assert!((results[1].score - 0.6493).abs() < 1e-9, "Score was {}", results[1].score);
        assert_eq!(results[1].factors.embedding, 0.7071);
    }

    #[test]
    fn test_min_score_filters_weak_matches() {
        let options = MatchOptions {
            min_score: 0.0,
            ..Default::default()
        };
        let results = rank_jobs(&candidate(), &sample_jobs(), &options, now()).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[2].id, "weak");

        let options = MatchOptions {
            min_score: 5.0, // clamped to 1.0
            ..Default::default()
        };
        assert!(rank_jobs(&candidate(), &sample_jobs(), &options, now())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_limit_at_least_one() {
        let options = MatchOptions {
            limit: 0,
            ..Default::default()
        };
        let results = rank_jobs(&candidate(), &sample_jobs(), &options, now()).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "exact");
    }

    #[test]
    fn test_zero_weights_fall_back_to_embedding() {
        let options = MatchOptions {
            weights: MatchWeights {
                embedding: 0.0,
                skills: -1.0,
                education: 0.0,
                experience: 0.0,
                freshness: 0.0,
            },
            ..Default::default()
        };
        let results = rank_jobs(&candidate(), &sample_jobs(), &options, now()).unwrap();
        assert_eq!(results[0].score, 1.0);
        assert_eq!(results[1].score, 0.7071);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_negative_weights_clamped() {
        let weights = MatchWeights {
            embedding: 1.0,
            skills: -5.0,
            education: 1.0,
            experience: 0.0,
            freshness: 0.0,
        }
        .normalised();
        assert_eq!(weights.skills, 0.0);
        assert_eq!(weights.embedding, 0.5);
        assert_eq!(weights.education, 0.5);
    }

    #[test]
    fn test_duplicates_and_missing_ids_skipped() {
        let jobs = vec![
            job("a", [1.0, 0.0], &["rust"], Some(5.0)),
            job("a", [0.0, 1.0], &[], None),
            job("", [1.0, 0.0], &["rust"], Some(5.0)),
        ];
        let options = MatchOptions {
            min_score: 0.0,
            ..Default::default()
        };
        let results = rank_jobs(&candidate(), &jobs, &options, now()).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].factors.embedding, 1.0);
    }

    #[test]
    fn test_empty_candidate_embedding_is_error() {
        let candidate = CandidateProfile::default();
        assert!(matches!(
            rank_jobs(&candidate, &sample_jobs(), &MatchOptions::default(), now()),
            Err(MatchError::EmptyEmbedding)
        ));
    }

    #[test]
    fn test_dimension_mismatch_is_error() {
        let jobs = vec![JobPosting {
            id: "3d".to_string(),
            embedding: vec![1.0, 0.0, 0.0],
            ..Default::default()
        }];
        assert!(matches!(
            rank_jobs(&candidate(), &jobs, &MatchOptions::default(), now()),
            Err(MatchError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_no_jobs_is_empty() {
        assert!(rank_jobs(&candidate(), &[], &MatchOptions::default(), now())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_from_parsed_uses_band_lower_bound() {
        let fields = ParsedCandidateFields {
            skills: vec!["React".to_string()],
            years_of_experience_band: Some(ExperienceBand::SevenToTen),
            ..Default::default()
        };
        let profile = CandidateProfile::from_parsed(&fields, vec![0.1, 0.2]);
        assert_eq!(profile.skills, vec!["React"]);
        assert_eq!(profile.experience_years, Some(7.0));

        let explicit = CandidateProfile {
            experience_years: Some(2.0),
            ..Default::default()
        }
        .with_parsed_fields(&fields);
        assert_eq!(explicit.experience_years, Some(2.0));
    }

    #[test]
    fn test_request_partial_weights_keep_defaults() {
        let request: MatchRequest = serde_json::from_str(
            r#"{
                "candidate": {"embedding": [1.0, 0.0], "experienceYears": 3},
                "jobs": [{"id": "j1", "embedding": [1.0, 0.0], "updatedAt": "2024-05-01T00:00:00Z"}],
                "options": {"minScore": 0.5, "weights": {"skills": 0.0}}
            }"#,
        )
        .unwrap();
        let options = request.options.unwrap();
        assert_eq!(options.min_score, 0.5);
        assert_eq!(options.limit, DEFAULT_MAX_RESULTS);
        assert_eq!(options.weights.skills, 0.0);
        assert_eq!(options.weights.embedding, 0.6);
        assert_eq!(request.jobs[0].updated_at.as_deref(), Some("2024-05-01T00:00:00Z"));
    }

    #[test]
    fn test_rank_batch_keeps_candidate_order() {
        let go_dev = CandidateProfile {
            embedding: vec![0.0, 1.0],
            skills: vec!["Go".to_string()],
            ..Default::default()
        };
        let candidates = vec![
            ("rustacean".to_string(), candidate()),
            ("gopher".to_string(), go_dev),
        ];
        let results =
            rank_batch(&candidates, &sample_jobs(), &MatchOptions::default(), now()).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].candidate_id, "rustacean");
        assert_eq!(
            results[0].matches,
            rank_jobs(&candidate(), &sample_jobs(), &MatchOptions::default(), now()).unwrap()
        );
        assert_eq!(results[1].candidate_id, "gopher");
        assert_eq!(results[1].matches[0].id, "weak");
    }

    #[test]
    fn test_rank_batch_fails_on_any_invalid_candidate() {
        let candidates = vec![
            ("ok".to_string(), candidate()),
            ("blank".to_string(), CandidateProfile::default()),
        ];
        assert!(matches!(
            rank_batch(&candidates, &sample_jobs(), &MatchOptions::default(), now()),
            Err(MatchError::EmptyEmbedding)
        ));
        assert!(rank_batch(&[], &sample_jobs(), &MatchOptions::default(), now())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_match_input_distinguishes_batch_requests() {
        let single: MatchInput = serde_json::from_str(
            r#"{"candidate": {"embedding": [1.0, 0.0]}, "jobs": []}"#,
        )
        .unwrap();
        assert!(matches!(single, MatchInput::Single(_)));

        let batch: MatchInput = serde_json::from_str(
            r#"{
                "candidates": [
                    {"id": "g1", "embedding": [1.0, 0.0], "skills": ["Rust"]},
                    {"embedding": [0.0, 1.0]}
                ],
                "jobs": [{"id": "j1", "embedding": [1.0, 0.0]}],
                "options": {"minScore": 0.0}
            }"#,
        )
        .unwrap();
        let MatchInput::Batch(batch) = batch else {
            panic!("expected a batch request");
        };
        let pairs = batch.id_profile_pairs();
        assert_eq!(pairs[0].0, "g1");
        assert_eq!(pairs[0].1.skills, vec!["Rust"]);
        assert_eq!(pairs[1].0, "");
        assert_eq!(pairs[1].1.embedding, vec![0.0, 1.0]);
    }

    #[tokio::test]
    async fn test_batch_through_trait_object() {
        let matcher: Arc<dyn CandidateMatcher> = Arc::new(WeightedMatcher::at(now()));
        let candidates = vec![("c1".to_string(), candidate())];
        let results = matcher
            .rank_batch(&candidates, &sample_jobs(), &MatchOptions::default())
            .await
            .unwrap();

        let expected = serde_json::json!("c1");
        assert_eq!(serde_json::to_value(&results[0]).unwrap()["candidateId"], expected);
        assert_eq!(results[0].matches[0].id, "exact");
    }

    #[tokio::test]
    async fn test_weighted_matcher_behind_trait_object() {
        let matcher: Arc<dyn CandidateMatcher> = Arc::new(WeightedMatcher::at(now()));
        let results = matcher
            .rank(&candidate(), &sample_jobs(), &MatchOptions::default())
            .await
            .unwrap();
        assert_eq!(results[0].id, "exact");
    }
}
