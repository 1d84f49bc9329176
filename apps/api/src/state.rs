use std::sync::Arc;

use sqlx::PgPool;

use crate::analysis::scorer::CompatibilityScorer;
use crate::config::Config;
use crate::extraction::vocabulary::SkillVocabulary;
use crate::recommendation::ranker::RankingPolicy;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Also used directly by the parse-only endpoints.
    pub vocabulary: Arc<SkillVocabulary>,
    /// Pluggable compatibility scorer. Default: KeywordCompatibilityScorer.
    pub scorer: Arc<dyn CompatibilityScorer>,
    pub ranking_policy: Arc<RankingPolicy>,
}
