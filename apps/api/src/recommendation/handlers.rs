use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::CandidateProfile;
use crate::models::posting::JobPosting;
use crate::recommendation::ranker::{rank_cancellable, rank_jobs_parallel};
use crate::recommendation::{store, RankingError, RankingReport};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub candidate: CandidateProfile,
    pub postings: Vec<JobPosting>,
    pub top_n: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct TopNQuery {
    pub top_n: Option<usize>,
}

/// POST /api/v1/recommendations
pub async fn handle_rank(
    State(state): State<AppState>,
    Json(req): Json<RankRequest>,
) -> Result<Json<RankingReport>, AppError> {
    let max = state.config.max_postings_per_ranking;
    if req.postings.len() > max {
        return Err(AppError::Validation(format!(
            "At most {max} postings can be ranked per request, got {}",
            req.postings.len()
        )));
    }

    let top_n = req.top_n.unwrap_or(state.ranking_policy.default_top_n);
    let report = run_ranking(&state, req.candidate, req.postings, top_n).await?;
    Ok(Json(report))
}

/// GET /api/v1/candidates/:id/recommendations
pub async fn handle_candidate_recommendations(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
    Query(params): Query<TopNQuery>,
) -> Result<Json<RankingReport>, AppError> {
    let candidate = store::fetch_candidate(&state.db, candidate_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate profile {candidate_id} not found")))?;

    // No point loading postings for a profile that cannot be ranked yet.
    if candidate.embedding().is_empty() {
        return Err(RankingError::ProfileNotReady { candidate_id }.into());
    }

    let limit = i64::try_from(state.config.max_postings_per_ranking).unwrap_or(i64::MAX);
    let postings = store::fetch_postings(&state.db, limit).await?;

    let top_n = params.top_n.unwrap_or(state.ranking_policy.default_top_n);
    let report = run_ranking(&state, candidate, postings, top_n).await?;
    Ok(Json(report))
}

/// Runs the ranker on the blocking pool, bounded by the configured timeout.
///
/// On timeout the cancel flag is raised so the worker stops at the next posting.
async fn run_ranking(
    state: &AppState,
    candidate: CandidateProfile,
    postings: Vec<JobPosting>,
    top_n: usize,
) -> Result<RankingReport, AppError> {
    let cancel = Arc::new(AtomicBool::new(false));
    let worker_cancel = Arc::clone(&cancel);
    let policy = Arc::clone(&state.ranking_policy);
    let parallel = postings.len() >= state.config.parallel_ranking_threshold;

    let worker = tokio::task::spawn_blocking(move || {
        if parallel {
            rank_jobs_parallel(&candidate, &postings, top_n, &policy, &worker_cancel)
        } else {
            rank_cancellable(&candidate, &postings, top_n, &policy, &worker_cancel)
        }
    });

    let timeout_ms = state.config.ranking_timeout_ms;
    match tokio::time::timeout(Duration::from_millis(timeout_ms), worker).await {
        Ok(joined) => {
            let result = joined
                .map_err(|e| AppError::Internal(anyhow::anyhow!("Ranking worker failed: {e}")))?;
            Ok(result?)
        }
        Err(_) => {
            cancel.store(true, Ordering::Relaxed);
            warn!(timeout_ms, "Ranking timed out; cancelling worker");
            Err(AppError::RankingTimeout(timeout_ms))
        }
    }
}
