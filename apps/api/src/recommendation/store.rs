//! Read-only access to candidate profiles and job postings.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::candidate::CandidateProfile;
use crate::models::posting::JobPosting;

pub async fn fetch_candidate(
    db: &PgPool,
    candidate_id: Uuid,
) -> Result<Option<CandidateProfile>, sqlx::Error> {
    sqlx::query_as::<_, CandidateProfile>(
        r#"
        SELECT id, embedding, location, skills_text, education_text
        FROM candidate_profiles
        WHERE id = $1
        "#,
    )
    .bind(candidate_id)
    .fetch_optional(db)
    .await
}

/// Newest postings first; `id` breaks ties so the input order of a ranking is stable.
pub async fn fetch_postings(db: &PgPool, limit: i64) -> Result<Vec<JobPosting>, sqlx::Error> {
    sqlx::query_as::<_, JobPosting>(
        r#"
        SELECT id, embedding, location, requirements_text, posted_at
        FROM job_postings
        ORDER BY posted_at DESC NULLS LAST, id
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(db)
    .await
}
