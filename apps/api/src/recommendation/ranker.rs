//! Ranking of job postings against one candidate profile.
//!
//! score = cosine(candidate, posting)
//!       + location_boost      when both locations are set and equal (case-insensitive)
//!       + requirements_boost  when the posting's requirements mention the candidate's
//!                             skills or education text (case-insensitive substring)
//!
//! Scores are not clamped. Ties keep input order.

use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::candidate::CandidateProfile;
use crate::models::posting::JobPosting;
use crate::recommendation::similarity::cosine_similarity;
use crate::recommendation::{RankedRecommendation, RankingError, RankingReport, SkippedPosting};

/// Tunable constants of the ranker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingPolicy {
    pub location_boost: f64,
    pub requirements_boost: f64,
    pub default_top_n: usize,
    /// Postings per rayon task on the parallel path.
    pub parallel_chunk_size: usize,
}

impl Default for RankingPolicy {
    fn default() -> Self {
        Self {
            location_boost: 0.2,
            requirements_boost: 0.3,
            default_top_n: 10,
            parallel_chunk_size: 512,
        }
    }
}

/// Ranks `postings` for `candidate` and returns the best `top_n`.
///
/// Postings whose embedding is missing or has a different dimension are skipped and
/// logged; use [`rank_with_report`] to see them.
#[allow(dead_code)]
pub fn rank_jobs_for_candidate(
    candidate: &CandidateProfile,
    postings: &[JobPosting],
    top_n: usize,
    policy: &RankingPolicy,
) -> Result<Vec<RankedRecommendation>, RankingError> {
    rank_with_report(candidate, postings, top_n, policy).map(|report| report.recommendations)
}

#[allow(dead_code)]
pub fn rank_with_report(
    candidate: &CandidateProfile,
    postings: &[JobPosting],
    top_n: usize,
    policy: &RankingPolicy,
) -> Result<RankingReport, RankingError> {
    rank_cancellable(candidate, postings, top_n, policy, &AtomicBool::new(false))
}

/// Sequential ranking that checks `cancel` before every posting.
pub fn rank_cancellable(
    candidate: &CandidateProfile,
    postings: &[JobPosting],
    top_n: usize,
    policy: &RankingPolicy,
    cancel: &AtomicBool,
) -> Result<RankingReport, RankingError> {
    let profile = ReadyProfile::new(candidate)?;
    let scored = AtomicUsize::new(0);

    let partial = rank_chunk(&profile, postings, top_n, policy, cancel, &scored)?;

    debug!(
        candidate_id = %candidate.id,
        postings = postings.len(),
        returned = partial.recommendations.len(),
        skipped = partial.skipped.len(),
        "Ranked postings"
    );
    Ok(partial)
}

/// Same result as [`rank_cancellable`], with postings split across rayon workers.
///
/// Each chunk is reduced to its own top `top_n`; the partial lists are concatenated in
/// chunk order and re-sorted stably, so ties still resolve by input order.
pub fn rank_jobs_parallel(
    candidate: &CandidateProfile,
    postings: &[JobPosting],
    top_n: usize,
    policy: &RankingPolicy,
    cancel: &AtomicBool,
) -> Result<RankingReport, RankingError> {
    let profile = ReadyProfile::new(candidate)?;
    let scored = AtomicUsize::new(0);
    let chunk_size = policy.parallel_chunk_size.max(1);

    let partials = postings
        .par_chunks(chunk_size)
        .map(|chunk| rank_chunk(&profile, chunk, top_n, policy, cancel, &scored))
        .collect::<Result<Vec<_>, _>>()?;

    let mut merged = RankingReport::default();
    for partial in partials {
        merged.recommendations.extend(partial.recommendations);
        merged.skipped.extend(partial.skipped);
    }
    sort_and_truncate(&mut merged.recommendations, top_n);

    debug!(
        candidate_id = %candidate.id,
        postings = postings.len(),
        chunks = postings.len().div_ceil(chunk_size),
        returned = merged.recommendations.len(),
        skipped = merged.skipped.len(),
        "Ranked postings in parallel"
    );
    Ok(merged)
}

// ────────────────────────────────────────────────────────────────────────────
// Internals
// ────────────────────────────────────────────────────────────────────────────

/// Candidate with a usable embedding and its boost terms normalized once.
struct ReadyProfile<'a> {
    embedding: &'a [f32],
    location: Option<String>,
    skills_text: Option<String>,
    education_text: Option<String>,
}

impl<'a> ReadyProfile<'a> {
    fn new(candidate: &'a CandidateProfile) -> Result<Self, RankingError> {
        let embedding = candidate.embedding();
        if embedding.is_empty() {
            return Err(RankingError::ProfileNotReady {
                candidate_id: candidate.id,
            });
        }
        Ok(Self {
            embedding,
            location: normalized(candidate.location.as_deref()),
            skills_text: normalized(candidate.skills_text.as_deref()),
            education_text: normalized(candidate.education_text.as_deref()),
        })
    }

    fn score(&self, posting: &JobPosting, policy: &RankingPolicy) -> Result<f64, SkippedPosting> {
        let embedding = posting.embedding();
        if embedding.len() != self.embedding.len() {
            return Err(SkippedPosting {
                job_posting_id: posting.id,
                expected_dimension: self.embedding.len(),
                found_dimension: embedding.len(),
            });
        }

        let mut score = cosine_similarity(self.embedding, embedding);

        if let (Some(ours), Some(theirs)) =
            (&self.location, normalized(posting.location.as_deref()))
        {
            if *ours == theirs {
                score += policy.location_boost;
            }
        }

        if let Some(requirements) = posting.requirements_text.as_deref() {
            let requirements = requirements.to_lowercase();
            let mentioned = [&self.skills_text, &self.education_text]
                .into_iter()
                .flatten()
                .any(|text| requirements.contains(text.as_str()));
            if mentioned {
                score += policy.requirements_boost;
            }
        }

        Ok(score)
    }
}

/// Trimmed lowercase text, or None when blank.
fn normalized(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

fn rank_chunk(
    profile: &ReadyProfile<'_>,
    postings: &[JobPosting],
    top_n: usize,
    policy: &RankingPolicy,
    cancel: &AtomicBool,
    scored: &AtomicUsize,
) -> Result<RankingReport, RankingError> {
    let mut report = RankingReport {
        recommendations: Vec::with_capacity(postings.len()),
        skipped: Vec::new(),
    };

    for posting in postings {
        if cancel.load(Ordering::Relaxed) {
            return Err(RankingError::Cancelled {
                scored: scored.load(Ordering::Relaxed),
            });
        }

        match profile.score(posting, policy) {
            Ok(similarity_score) => report.recommendations.push(RankedRecommendation {
                job_posting_id: posting.id,
                similarity_score,
            }),
            Err(skipped) => {
                warn!(
                    job_posting_id = %skipped.job_posting_id,
                    expected = skipped.expected_dimension,
                    found = skipped.found_dimension,
                    "Skipping posting: embedding dimension mismatch"
                );
                report.skipped.push(skipped);
            }
        }
        scored.fetch_add(1, Ordering::Relaxed);
    }

    sort_and_truncate(&mut report.recommendations, top_n);
    Ok(report)
}

/// Descending by score. `sort_by` is stable, so equal scores keep their input order.
fn sort_and_truncate(recommendations: &mut Vec<RankedRecommendation>, top_n: usize) {
    recommendations.sort_by(|a, b| {
        b.similarity_score
            .partial_cmp(&a.similarity_score)
            .unwrap_or(CmpOrdering::Equal)
    });
    recommendations.truncate(top_n);
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
