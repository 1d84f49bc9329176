//! Improvement suggestions: independent rule templates evaluated against the résumé/JD gap.
//!
//! Each rule contributes at most one suggestion. Output order is the order of `RULES`.

use std::collections::BTreeSet;

use crate::analysis::policy::ScoringPolicy;
use crate::extraction::job_description::ParsedJobDescription;
use crate::extraction::resume::ParsedResume;
use crate::extraction::sections::strip_date_ranges;
use crate::extraction::vocabulary::SkillVocabulary;

pub struct SuggestionContext<'a> {
    pub resume: &'a ParsedResume,
    pub job_description: &'a ParsedJobDescription,
    pub missing_keywords: &'a BTreeSet<String>,
    pub vocabulary: &'a SkillVocabulary,
    pub policy: &'a ScoringPolicy,
}

type SuggestionRule = fn(&SuggestionContext<'_>) -> Option<String>;

const RULES: &[SuggestionRule] = &[
    quantify_achievements,
    highlight_soft_skills,
    flag_overqualified,
    insert_missing_keywords,
    add_education,
];

pub fn build_suggestions(ctx: &SuggestionContext<'_>) -> Vec<String> {
    RULES.iter().filter_map(|rule| rule(ctx)).collect()
}

/// A digit, percent sign or currency symbol outside of date ranges.
fn has_metric(entry: &str) -> bool {
    strip_date_ranges(entry)
        .chars()
        .any(|c| c.is_ascii_digit() || matches!(c, '%' | '$' | '€' | '£'))
}

fn quantify_achievements(ctx: &SuggestionContext<'_>) -> Option<String> {
    let entries = &ctx.resume.experience_entries;
    let lacking = entries.iter().filter(|e| !has_metric(e)).count();
    (lacking > 0).then(|| {
        format!(
            "Add quantifiable achievements (numbers, percentages, time or money saved) to {lacking} of your {} experience entries.",
            entries.len()
        )
    })
}

fn highlight_soft_skills(ctx: &SuggestionContext<'_>) -> Option<String> {
    let soft_skills = &ctx.vocabulary.soft_skills;
    if soft_skills.is_empty() || soft_skills.contains_any(&ctx.resume.raw_text) {
        return None;
    }
    let examples: Vec<&str> = soft_skills
        .terms()
        .iter()
        .take(3)
        .map(String::as_str)
        .collect();
    Some(format!(
        "Show soft skills with concrete examples, e.g. {}.",
        examples.join(", ")
    ))
}

fn flag_overqualified(ctx: &SuggestionContext<'_>) -> Option<String> {
    let level = ctx.job_description.experience_level;
    let expected = ctx.policy.expected_experience.for_level(level) as f64;
    let listed = ctx.resume.experience_entries.len();
    (listed as f64 > expected * ctx.policy.overqualified_ratio).then(|| {
        format!(
            "Your résumé lists {listed} roles for a {level}-level position. Trim older or less relevant roles so it does not read as overqualified."
        )
    })
}

fn insert_missing_keywords(ctx: &SuggestionContext<'_>) -> Option<String> {
    let quoted: Vec<&str> = ctx
        .missing_keywords
        .iter()
        .take(ctx.policy.max_keyword_suggestions)
        .map(String::as_str)
        .collect();
    (!quoted.is_empty()).then(|| {
        format!(
            "Add these job keywords verbatim where they truthfully apply: {}.",
            quoted.join(", ")
        )
    })
}

fn add_education(ctx: &SuggestionContext<'_>) -> Option<String> {
    ctx.resume.education_entries.is_empty().then(|| {
        "Add an education section listing degrees, certifications or relevant training."
            .to_string()
    })
}
