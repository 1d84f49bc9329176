//! Compatibility scorer: pluggable, trait-based end-to-end analysis of one résumé/JD pair.
//!
//! Default: `KeywordCompatibilityScorer` (pure-Rust, deterministic, no I/O).
//! `AppState` holds an `Arc<dyn CompatibilityScorer>`, built at startup from config.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::ats::{calculate_ats_score, CompatibilityScore};
use crate::analysis::keywords::{analyze_keywords, KeywordAnalysis};
use crate::analysis::policy::ScoringPolicy;
use crate::extraction::job_description::{parse_job_description, ParsedJobDescription};
use crate::extraction::resume::{parse_resume, ParsedResume};
use crate::extraction::vocabulary::SkillVocabulary;
use crate::extraction::Extraction;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitLabel {
    Strong,
    Moderate,
    Low,
}

/// Everything one analysis call produces; handed to export and saved-analysis consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub resume: Extraction<ParsedResume>,
    pub job_description: Extraction<ParsedJobDescription>,
    pub keyword_analysis: KeywordAnalysis,
    pub compatibility: CompatibilityScore,
    pub fit: FitLabel,
    pub summary: String,
    pub scorer_backend: String, // "keyword"
    pub vocabulary_version: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap scoring backends without touching handlers.
pub trait CompatibilityScorer: Send + Sync {
    fn analyze(&self, resume_text: &str, jd_text: &str) -> AnalysisReport;
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordCompatibilityScorer (default)
// ────────────────────────────────────────────────────────────────────────────

pub struct KeywordCompatibilityScorer {
    vocabulary: Arc<SkillVocabulary>,
    policy: ScoringPolicy,
}

impl KeywordCompatibilityScorer {
    pub fn new(vocabulary: Arc<SkillVocabulary>, policy: ScoringPolicy) -> Self {
        Self { vocabulary, policy }
    }

    /// Scores an already-parsed pair.
    pub fn score_parsed(
        &self,
        resume: &ParsedResume,
        job_description: &ParsedJobDescription,
    ) -> (KeywordAnalysis, CompatibilityScore) {
        let keyword_analysis =
            analyze_keywords(resume, job_description, &self.vocabulary, &self.policy);
        let compatibility =
            calculate_ats_score(resume, job_description, &keyword_analysis, &self.policy);
        (keyword_analysis, compatibility)
    }
}

impl CompatibilityScorer for KeywordCompatibilityScorer {
    fn analyze(&self, resume_text: &str, jd_text: &str) -> AnalysisReport {
        let resume = parse_resume(resume_text, &self.vocabulary);
        let job_description = parse_job_description(jd_text, &self.vocabulary);
        let (keyword_analysis, compatibility) =
            self.score_parsed(&resume.record, &job_description.record);

        let fit = fit_label(compatibility.overall, &self.policy);
        let summary = build_summary(fit, compatibility.overall, &keyword_analysis);

        debug!(
            overall = compatibility.overall,
            keyword_match = compatibility.keyword_match,
            skills_match = compatibility.skills_match,
            resume_warnings = resume.warnings.len(),
            jd_warnings = job_description.warnings.len(),
            "Compatibility analysis complete"
        );

        AnalysisReport {
            resume,
            job_description,
            keyword_analysis,
            compatibility,
            fit,
            summary,
            scorer_backend: "keyword".to_string(),
            vocabulary_version: self.vocabulary.version.clone(),
        }
    }
}

fn fit_label(overall: u32, policy: &ScoringPolicy) -> FitLabel {
    if overall >= policy.strong_fit_threshold {
        FitLabel::Strong
    } else if overall >= policy.moderate_fit_threshold {
        FitLabel::Moderate
    } else {
        FitLabel::Low
    }
}

/// One-line human-readable verdict naming the top missing keywords.
fn build_summary(fit: FitLabel, score: u32, keyword_analysis: &KeywordAnalysis) -> String {
    let top_gaps: Vec<&str> = keyword_analysis
        .missing_keywords
        .iter()
        .take(3)
        .map(String::as_str)
        .collect();

    match fit {
        FitLabel::Strong => {
            format!("Strong fit ({score}/100). Your résumé covers the key job requirements.")
        }
        FitLabel::Moderate if top_gaps.is_empty() => format!(
            "Moderate fit ({score}/100). Strengthen experience and skills detail to improve."
        ),
        FitLabel::Moderate => format!(
            "Moderate fit ({score}/100). Consider adding: {}.",
            top_gaps.join(", ")
        ),
        FitLabel::Low if top_gaps.is_empty() => format!(
            "Low fit ({score}/100). The résumé shows little structure the job can be matched against."
        ),
        FitLabel::Low => format!(
            "Low fit ({score}/100). Significant gaps: {}.",
            top_gaps.join(", ")
        ),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::vocabulary::VocabularyFile;
    use crate::extraction::ExtractionWarning;

    const RESUME: &str = r#"
Alex Kim
SKILLS
React, Node.js, PostgreSQL

EXPERIENCE
Frontend Engineer, Shopfront
2021 - Present
- Rebuilt checkout in React, lifting conversion 12%
- Partnered with design on communication of release plans

Web Developer, Agency
2019 - 2021
- Delivered 20+ client sites

EDUCATION
B.S. Computer Science, Lakeside University
"#;

    const JD: &str = r#"
Frontend Engineer
Requirements: 3+ years React, TypeScript, Node.js.
Nice to have: GraphQL.
We value accessibility.
"#;

    fn scorer() -> KeywordCompatibilityScorer {
        let vocabulary = SkillVocabulary::from_file_data(VocabularyFile {
            version: "fixture-1".to_string(),
            skills: ["React", "Node.js", "PostgreSQL", "TypeScript", "GraphQL"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            soft_skills: vec!["communication".to_string()],
            domain_terms: vec!["accessibility".to_string()],
            degree_terms: vec!["university".to_string()],
        })
        .unwrap();
        KeywordCompatibilityScorer::new(Arc::new(vocabulary), ScoringPolicy::default())
    }

    #[test]
    fn test_end_to_end_analysis() {
        let report = scorer().analyze(RESUME, JD);

        let jd = &report.job_description.record;
        assert_eq!(jd.required_skills.len(), 3);
        assert!(jd.preferred_skills.contains("GraphQL"));

        let ka = &report.keyword_analysis;
        assert!(ka.matched_keywords.contains("React"));
        assert!(ka.missing_keywords.contains("TypeScript"));
        assert!(ka.missing_keywords.contains("GraphQL"));
        assert!(ka.missing_keywords.contains("accessibility"));
        // 2 of 5 keywords (React, Node.js) → 40
        assert_eq!(ka.overall_keyword_score, 40);

        let score = report.compatibility;
        assert_eq!(score.skills_match, 67);
        assert_eq!(score.experience_match, 67, "2 entries against mid-level 3");
        assert_eq!(score.education_match, 33);
        // 0.4*40 + 0.3*67 + 0.2*67 + 0.1*33 = 16 + 20.1 + 13.4 + 3.3 = 52.8 → 53
        assert_eq!(score.overall, 53);
        assert_eq!(report.fit, FitLabel::Low);
        assert_eq!(report.scorer_backend, "keyword");
        assert_eq!(report.vocabulary_version, "fixture-1");
    }

    #[test]
    fn test_malformed_input_degrades_to_low_scores() {
        let report = scorer().analyze("", "");
        assert!(report
            .resume
            .warnings
            .contains(&ExtractionWarning::EmptyInput));
        assert_eq!(report.compatibility.skills_match, 0);
        assert_eq!(report.compatibility.experience_match, 0);
        // No keywords → keyword score 100; overall = 0.4*100 = 40
        assert_eq!(report.compatibility.overall, 40);
        assert_eq!(report.fit, FitLabel::Low);

        let suggestions = &report.keyword_analysis.suggestions;
        assert_eq!(suggestions.len(), 2, "Got {suggestions:?}");
        assert!(suggestions[0].contains("soft skills"));
        assert!(suggestions[1].contains("education"));
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let s = scorer();
        let a = s.analyze(RESUME, JD);
        let b = s.analyze(RESUME, JD);
        assert_eq!(a.compatibility, b.compatibility);
        assert_eq!(a.keyword_analysis, b.keyword_analysis);
    }

    #[test]
    fn test_summary_strong() {
        let summary = build_summary(FitLabel::Strong, 85, &KeywordAnalysis::default());
        assert!(summary.contains("Strong fit"));
        assert!(summary.contains("85"));
    }

    #[test]
    fn test_summary_lists_top_gaps() {
        let analysis = KeywordAnalysis {
            missing_keywords: ["Kafka", "Rust", "Terraform", "gRPC"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ..KeywordAnalysis::default()
        };
        let summary = build_summary(FitLabel::Low, 30, &analysis);
        assert!(summary.contains("Kafka, Rust, Terraform"));
        assert!(!summary.contains("gRPC"), "Only the top 3 gaps are named");
    }

    #[test]
    fn test_fit_label_thresholds() {
        let policy = ScoringPolicy::default();
        assert_eq!(fit_label(80, &policy), FitLabel::Strong);
        assert_eq!(fit_label(79, &policy), FitLabel::Moderate);
        assert_eq!(fit_label(60, &policy), FitLabel::Moderate);
        assert_eq!(fit_label(59, &policy), FitLabel::Low);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;
        use std::collections::BTreeSet;

        fn structured_line() -> impl Strategy<Value = String> {
            prop_oneof![
                Just("SKILLS".to_string()),
                Just("Experience:".to_string()),
                Just("EDUCATION".to_string()),
                Just("Requirements: React, TypeScript".to_string()),
                Just("Nice to have: GraphQL; bonus: Node.js".to_string()),
                Just("Skills: React | PostgreSQL / CI/CD".to_string()),
                Just("Jan 2020 - Present".to_string()),
                Just("2015 - 2019".to_string()),
                Just("- Lifted conversion 12%".to_string()),
                Just("B.S. at Lakeside University 2011 - 2015".to_string()),
                Just("7 years of senior experience".to_string()),
                Just(String::new()),
                "\\PC{0,40}",
            ]
        }

        fn structured_text() -> impl Strategy<Value = String> {
            prop::collection::vec(structured_line(), 0..25).prop_map(|lines| lines.join("\n"))
        }

        fn assert_report_is_consistent(report: &AnalysisReport) -> Result<(), TestCaseError> {
            let ka = &report.keyword_analysis;
            let union: BTreeSet<String> = ka
                .matched_keywords
                .union(&ka.missing_keywords)
                .cloned()
                .collect();
            prop_assert_eq!(&union, &report.job_description.record.keywords);
            prop_assert!(ka.matched_keywords.is_disjoint(&ka.missing_keywords));

            let s = report.compatibility;
            for field in [
                s.overall,
                s.keyword_match,
                s.skills_match,
                s.experience_match,
                s.education_match,
            ] {
                prop_assert!(field <= 100, "{:?}", s);
            }
            Ok(())
        }

        proptest! {
            #[test]
            fn arbitrary_text_analyzes_consistently(
                resume in "\\PC{0,300}",
                jd in "\\PC{0,300}",
            ) {
                let report = scorer().analyze(&resume, &jd);
                assert_report_is_consistent(&report)?;
            }

            #[test]
            fn structured_text_analyzes_consistently(
                resume in structured_text(),
                jd in structured_text(),
            ) {
                let report = scorer().analyze(&resume, &jd);
                assert_report_is_consistent(&report)?;
            }
        }
    }
}
