use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Row of `candidate_profiles`. The embedding is produced upstream; it may be missing
/// while the profile is still being processed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct CandidateProfile {
    pub id: Uuid,
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub skills_text: Option<String>,
    #[serde(default)]
    pub education_text: Option<String>,
}

impl CandidateProfile {
    /// Empty slice when no embedding has been computed yet.
    pub fn embedding(&self) -> &[f32] {
        self.embedding.as_deref().unwrap_or(&[])
    }
}
