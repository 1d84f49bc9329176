use serde::{Deserialize, Serialize};

use crate::extraction::job_description::ExperienceLevel;

/// Weights of each sub-score in the overall compatibility score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub keyword: f64,
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            keyword: 0.4,
            skills: 0.3,
            experience: 0.2,
            education: 0.1,
        }
    }
}

/// Number of experience entries that counts as a full match for each level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpectedExperience {
    pub entry: u32,
    pub mid: u32,
    pub senior: u32,
}

impl Default for ExpectedExperience {
    fn default() -> Self {
        Self {
            entry: 1,
            mid: 3,
            senior: 5,
        }
    }
}

impl ExpectedExperience {
    /// Never zero, so it is always a safe denominator.
    pub fn for_level(&self, level: ExperienceLevel) -> u32 {
        let expected = match level {
            ExperienceLevel::Entry => self.entry,
            ExperienceLevel::Mid => self.mid,
            ExperienceLevel::Senior => self.senior,
        };
        expected.max(1)
    }
}

/// Tunable constants of the compatibility scorer and its suggestion rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub weights: ScoringWeights,
    pub expected_experience: ExpectedExperience,
    /// Education entries that count as a full education match.
    pub expected_education_entries: u32,
    /// Experience entries beyond `expected × ratio` trigger the overqualified suggestion.
    pub overqualified_ratio: f64,
    /// Missing keywords quoted in the "add these keywords" suggestion.
    pub max_keyword_suggestions: usize,
    pub strong_fit_threshold: u32,
    pub moderate_fit_threshold: u32,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            expected_experience: ExpectedExperience::default(),
            expected_education_entries: 3,
            overqualified_ratio: 2.0,
            max_keyword_suggestions: 5,
            strong_fit_threshold: 80,
            moderate_fit_threshold: 60,
        }
    }
}
