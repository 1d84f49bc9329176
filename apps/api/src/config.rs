use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::policy::ScoringPolicy;
use crate::extraction::vocabulary::SkillVocabulary;
use crate::recommendation::ranker::RankingPolicy;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    /// JSON vocabulary file; the bundled vocabulary is used when unset.
    pub skill_vocabulary_path: Option<String>,
    /// JSON file overriding scoring and ranking constants.
    pub matching_policy_path: Option<String>,
    pub ranking_timeout_ms: u64,
    /// Posting count at which ranking switches to the parallel path.
    pub parallel_ranking_threshold: usize,
    pub max_postings_per_ranking: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            skill_vocabulary_path: optional_env("SKILL_VOCABULARY_PATH"),
            matching_policy_path: optional_env("MATCHING_POLICY_PATH"),
            ranking_timeout_ms: parse_env("RANKING_TIMEOUT_MS", 2000)?,
            parallel_ranking_threshold: parse_env("PARALLEL_RANKING_THRESHOLD", 2048)?,
            max_postings_per_ranking: parse_env("MAX_POSTINGS_PER_RANKING", 5000)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

/// Scoring and ranking constants, overridable from one JSON file.
///
/// Every field has a default, so a file may override a single constant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingPolicy {
    pub scoring: ScoringPolicy,
    pub ranking: RankingPolicy,
}

impl MatchingPolicy {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Matching policy is not valid JSON")
    }
}

/// Loads the policy file. A missing or unreadable file falls back to the defaults;
/// a file that exists but does not parse is a startup error.
pub fn load_policy(path: Option<&str>) -> Result<MatchingPolicy> {
    let Some(path) = path else {
        return Ok(MatchingPolicy::default());
    };

    match std::fs::read_to_string(path) {
        Ok(json) => {
            let policy = MatchingPolicy::from_json(&json)
                .with_context(|| format!("Failed to load matching policy from '{path}'"))?;
            info!("Matching policy loaded from {path}");
            Ok(policy)
        }
        Err(e) => {
            warn!("Cannot read matching policy '{path}' ({e}); using defaults");
            Ok(MatchingPolicy::default())
        }
    }
}

/// Loads the configured vocabulary, or the bundled one when no path is set.
pub fn load_vocabulary(path: Option<&str>) -> Result<SkillVocabulary> {
    let vocabulary = match path {
        Some(path) => SkillVocabulary::from_path(Path::new(path))
            .with_context(|| format!("Failed to load skill vocabulary from '{path}'"))?,
        None => SkillVocabulary::bundled().context("Bundled skill vocabulary is invalid")?,
    };
    info!(
        "Skill vocabulary v{} loaded ({} skills)",
        vocabulary.version,
        vocabulary.skills.terms().len()
    );
    Ok(vocabulary)
}
