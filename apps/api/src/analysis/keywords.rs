//! Keyword matcher: which job-description keywords the résumé covers.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::analysis::policy::ScoringPolicy;
use crate::analysis::suggestions::{build_suggestions, SuggestionContext};
use crate::extraction::job_description::ParsedJobDescription;
use crate::extraction::resume::ParsedResume;
use crate::extraction::vocabulary::SkillVocabulary;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordAnalysis {
    pub overall_keyword_score: u32, // 0 – 100
    pub matched_keywords: BTreeSet<String>,
    pub missing_keywords: BTreeSet<String>,
    pub suggestions: Vec<String>,
}

/// Partitions the job's keywords into matched and missing and builds suggestions.
///
/// A keyword matches when it appears, case-insensitively, as a substring of the résumé
/// text or of any extracted résumé skill. `matched ∪ missing` is always exactly the job's
/// keyword set.
pub fn analyze_keywords(
    resume: &ParsedResume,
    job_description: &ParsedJobDescription,
    vocabulary: &SkillVocabulary,
    policy: &ScoringPolicy,
) -> KeywordAnalysis {
    let text_lower = resume.raw_text.to_lowercase();
    let skills_lower: Vec<String> = resume.skills.iter().map(|s| s.to_lowercase()).collect();

    let (matched_keywords, missing_keywords): (BTreeSet<String>, BTreeSet<String>) =
        job_description
            .keywords
            .iter()
            .cloned()
            .partition(|keyword| keyword_present(keyword, &text_lower, &skills_lower));

    let overall_keyword_score =
        keyword_score(matched_keywords.len(), job_description.keywords.len());

    let suggestions = build_suggestions(&SuggestionContext {
        resume,
        job_description,
        missing_keywords: &missing_keywords,
        vocabulary,
        policy,
    });

    KeywordAnalysis {
        overall_keyword_score,
        matched_keywords,
        missing_keywords,
        suggestions,
    }
}

fn keyword_present(keyword: &str, text_lower: &str, skills_lower: &[String]) -> bool {
    let keyword = keyword.to_lowercase();
    text_lower.contains(&keyword) || skills_lower.iter().any(|s| s.contains(&keyword))
}

/// 100 when the job names no keywords: there is nothing to miss.
fn keyword_score(matched: usize, total: usize) -> u32 {
    if total == 0 {
        return 100;
    }
    ((100.0 * matched as f64) / total as f64).round() as u32
}
