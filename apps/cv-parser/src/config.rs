use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::matching::{MatchOptions, MatchWeights};

/// Configuration loaded from environment variables (and `.env` when present).
/// Every setting has a default; malformed values are startup errors.
#[derive(Debug, Clone)]
pub struct Config {
    /// TOML file replacing the built-in skill and role tables.
    pub vocabulary_path: Option<PathBuf>,
    pub rust_log: String,
    pub match_options: MatchOptions,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = MatchOptions::default();
        let weights = MatchWeights::default();

        Ok(Config {
            vocabulary_path: lookup("CV_VOCABULARY_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            match_options: MatchOptions {
                min_score: parse_or(&lookup, "MATCH_MIN_SCORE", defaults.min_score)?,
                limit: parse_or(&lookup, "MATCH_MAX_RESULTS", defaults.limit)?,
                freshness_half_life_days: parse_or(
                    &lookup,
                    "MATCH_FRESHNESS_HALF_LIFE_DAYS",
                    defaults.freshness_half_life_days,
                )?,
                weights: MatchWeights {
                    embedding: parse_or(&lookup, "MATCH_WEIGHT_EMBEDDING", weights.embedding)?,
                    skills: parse_or(&lookup, "MATCH_WEIGHT_SKILLS", weights.skills)?,
                    education: parse_or(&lookup, "MATCH_WEIGHT_EDUCATION", weights.education)?,
                    experience: parse_or(&lookup, "MATCH_WEIGHT_EXPERIENCE", weights.experience)?,
                    freshness: parse_or(&lookup, "MATCH_WEIGHT_FRESHNESS", weights.freshness)?,
                },
            },
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
