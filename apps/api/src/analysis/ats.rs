//! ATS compatibility score: weighted breakdown of keyword, skills, experience and education fit.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::analysis::keywords::KeywordAnalysis;
use crate::analysis::policy::ScoringPolicy;
use crate::extraction::job_description::ParsedJobDescription;
use crate::extraction::resume::ParsedResume;

/// Every field is an integer in 0 – 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityScore {
    pub overall: u32,
    pub keyword_match: u32,
    pub skills_match: u32,
    pub experience_match: u32,
    pub education_match: u32,
}

/// Computes the compatibility breakdown. Pure and idempotent.
///
/// - skills: share of required skills the résumé lists (0 when the job requires none)
/// - experience: experience entries against the level's expected count, capped at 100
/// - education: education entries against the expected count, capped at 100
/// - keyword: the keyword analysis score
/// - overall: weighted sum of the four, rounded
pub fn calculate_ats_score(
    resume: &ParsedResume,
    job_description: &ParsedJobDescription,
    keyword_analysis: &KeywordAnalysis,
    policy: &ScoringPolicy,
) -> CompatibilityScore {
    let keyword_match = keyword_analysis.overall_keyword_score.min(100);
    let skills_match = skills_match(resume, job_description);
    let experience_match = capped_percent(
        resume.experience_entries.len(),
        policy
            .expected_experience
            .for_level(job_description.experience_level),
    );
    let education_match = capped_percent(
        resume.education_entries.len(),
        policy.expected_education_entries.max(1),
    );

    let w = &policy.weights;
    let overall = clamp_score(
        w.keyword * keyword_match as f64
            + w.skills * skills_match as f64
            + w.experience * experience_match as f64
            + w.education * education_match as f64,
    );

    CompatibilityScore {
        overall,
        keyword_match,
        skills_match,
        experience_match,
        education_match,
    }
}

fn skills_match(resume: &ParsedResume, job_description: &ParsedJobDescription) -> u32 {
    let required = &job_description.required_skills;
    if required.is_empty() {
        return 0;
    }

    let held: HashSet<String> = resume.skills.iter().map(|s| s.to_lowercase()).collect();
    let covered = required
        .iter()
        .filter(|skill| held.contains(&skill.to_lowercase()))
        .count();

    clamp_score(100.0 * covered as f64 / required.len() as f64)
}

fn capped_percent(count: usize, expected: u32) -> u32 {
    clamp_score(100.0 * count as f64 / expected as f64)
}

/// Rounds and clamps into 0 – 100. NaN (only reachable through bad weights) maps to 0.
fn clamp_score(value: f64) -> u32 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::policy::ScoringWeights;
    use crate::extraction::job_description::ExperienceLevel;
    use std::collections::BTreeSet;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn resume(skills: &[&str], experience: usize, education: usize) -> ParsedResume {
        ParsedResume {
            raw_text: String::new(),
            skills: set(skills),
            experience_entries: (0..experience).map(|i| format!("Role {i}")).collect(),
            education_entries: (0..education).map(|i| format!("School {i}")).collect(),
        }
    }

    fn jd(required: &[&str], level: ExperienceLevel) -> ParsedJobDescription {
        ParsedJobDescription {
            required_skills: set(required),
            preferred_skills: BTreeSet::new(),
            experience_level: level,
            keywords: set(required),
        }
    }

    fn keywords(score: u32) -> KeywordAnalysis {
        KeywordAnalysis {
            overall_keyword_score: score,
            ..KeywordAnalysis::default()
        }
    }

    #[test]
    fn test_two_of_three_required_skills_scores_67() {
        let r = resume(&["React", "Node.js"], 0, 0);
        let j = jd(&["React", "TypeScript", "Node.js"], ExperienceLevel::Entry);
        let score = calculate_ats_score(&r, &j, &keywords(0), &ScoringPolicy::default());
        assert_eq!(score.skills_match, 67);
    }

    #[test]
    fn test_skills_compare_case_insensitively() {
        let r = resume(&["react"], 0, 0);
        let j = jd(&["React"], ExperienceLevel::Entry);
        let score = calculate_ats_score(&r, &j, &keywords(0), &ScoringPolicy::default());
        assert_eq!(score.skills_match, 100);
    }

    #[test]
    fn test_no_required_skills_scores_zero() {
        let r = resume(&["React"], 0, 0);
        let j = jd(&[], ExperienceLevel::Entry);
        let score = calculate_ats_score(&r, &j, &keywords(100), &ScoringPolicy::default());
        assert_eq!(score.skills_match, 0);
    }

    #[test]
    fn test_experience_against_level() {
        let policy = ScoringPolicy::default();
        let r = resume(&[], 3, 0);
        let senior = calculate_ats_score(&r, &jd(&[], ExperienceLevel::Senior), &keywords(0), &policy);
        let mid = calculate_ats_score(&r, &jd(&[], ExperienceLevel::Mid), &keywords(0), &policy);
        let entry = calculate_ats_score(&r, &jd(&[], ExperienceLevel::Entry), &keywords(0), &policy);
        assert_eq!(senior.experience_match, 60);
        assert_eq!(mid.experience_match, 100);
        assert_eq!(entry.experience_match, 100, "Capped at 100");
    }

    #[test]
    fn test_education_against_three_entries() {
        let policy = ScoringPolicy::default();
        let j = jd(&[], ExperienceLevel::Entry);
        let one = calculate_ats_score(&resume(&[], 0, 1), &j, &keywords(0), &policy);
        let five = calculate_ats_score(&resume(&[], 0, 5), &j, &keywords(0), &policy);
        assert_eq!(one.education_match, 33);
        assert_eq!(five.education_match, 100);
    }

    #[test]
    fn test_overall_is_weighted_sum() {
        // keyword 50, skills 67, experience 100 (1/1), education 33
        // 0.4*50 + 0.3*67 + 0.2*100 + 0.1*33 = 20 + 20.1 + 20 + 3.3 = 63.4 → 63
        let r = resume(&["React", "Node.js"], 1, 1);
        let j = jd(&["React", "TypeScript", "Node.js"], ExperienceLevel::Entry);
        let score = calculate_ats_score(&r, &j, &keywords(50), &ScoringPolicy::default());
        assert_eq!(score.keyword_match, 50);
        assert_eq!(score.overall, 63);
    }

    #[test]
    fn test_overridden_weights_stay_clamped() {
        let policy = ScoringPolicy {
            weights: ScoringWeights {
                keyword: 5.0,
                skills: 5.0,
                experience: 5.0,
                education: 5.0,
            },
            ..ScoringPolicy::default()
        };
        let r = resume(&["React"], 5, 3);
        let j = jd(&["React"], ExperienceLevel::Senior);
        let score = calculate_ats_score(&r, &j, &keywords(100), &policy);
        assert_eq!(score.overall, 100);

        let negative = ScoringPolicy {
            weights: ScoringWeights {
                keyword: -1.0,
                ..ScoringWeights::default()
            },
            ..ScoringPolicy::default()
        };
        let empty = resume(&[], 0, 0);
        let score = calculate_ats_score(&empty, &j, &keywords(100), &negative);
        assert_eq!(score.overall, 0);
    }

    #[test]
    fn test_score_is_idempotent() {
        let policy = ScoringPolicy::default();
        let r = resume(&["React"], 2, 1);
        let j = jd(&["React", "Go"], ExperienceLevel::Mid);
        let a = calculate_ats_score(&r, &j, &keywords(40), &policy);
        let b = calculate_ats_score(&r, &j, &keywords(40), &policy);
        assert_eq!(a, b);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn level() -> impl Strategy<Value = ExperienceLevel> {
            prop_oneof![
                Just(ExperienceLevel::Entry),
                Just(ExperienceLevel::Mid),
                Just(ExperienceLevel::Senior),
            ]
        }

        proptest! {
            #[test]
            fn every_field_within_0_to_100(
                skills in prop::collection::btree_set("[a-z]{1,6}", 0..10),
                required in prop::collection::btree_set("[a-z]{1,6}", 0..10),
                experience in 0usize..40,
                education in 0usize..12,
                keyword_score in 0u32..=100,
                level in level(),
            ) {
                let r = ParsedResume {
                    raw_text: String::new(),
                    skills,
                    experience_entries: vec![String::new(); experience],
                    education_entries: vec![String::new(); education],
                };
                let j = ParsedJobDescription {
                    required_skills: required.clone(),
                    preferred_skills: BTreeSet::new(),
                    experience_level: level,
                    keywords: required,
                };
                let s = calculate_ats_score(&r, &j, &keywords(keyword_score), &ScoringPolicy::default());
                for field in [s.overall, s.keyword_match, s.skills_match, s.experience_match, s.education_match] {
                    prop_assert!(field <= 100, "{s:?}");
                }
            }
        }
    }
}
