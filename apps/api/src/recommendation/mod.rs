//! Embedding Similarity Ranker: orders job postings for a candidate by cosine similarity
//! of their embeddings plus location and requirements boosts.

pub mod handlers;
pub mod ranker;
pub mod similarity;
pub mod store;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRecommendation {
    pub job_posting_id: Uuid,
    /// Cosine similarity plus boosts; can exceed 1.0.
    pub similarity_score: f64,
}

/// A posting left out of the ranking because its embedding could not be compared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedPosting {
    pub job_posting_id: Uuid,
    pub expected_dimension: usize,
    /// 0 when the posting has no embedding.
    pub found_dimension: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingReport {
    pub recommendations: Vec<RankedRecommendation>,
    pub skipped: Vec<SkippedPosting>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankingError {
    /// Retryable: the profile's embedding has not been computed yet.
    #[error("Candidate profile {candidate_id} has no embedding yet")]
    ProfileNotReady { candidate_id: Uuid },

    #[error("Ranking cancelled after scoring {scored} postings")]
    Cancelled { scored: usize },
}
