use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Row of `job_postings`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct JobPosting {
    pub id: Uuid,
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub requirements_text: Option<String>,
    #[serde(default)]
    pub posted_at: Option<DateTime<Utc>>,
}

impl JobPosting {
    pub fn embedding(&self) -> &[f32] {
        self.embedding.as_deref().unwrap_or(&[])
    }
}
