//! Job-description parser: required/preferred skills, experience level and keyword set.

use std::collections::BTreeSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::extraction::sections::split_sections;
use crate::extraction::vocabulary::SkillVocabulary;
use crate::extraction::{listed_skills, Extraction, ExtractionWarning};

/// Section markers. Longer phrases come first so "preferred qualifications" is not read
/// as "preferred" followed by the required marker "qualifications".
static MARKERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(preferred qualifications|preferred skills|preferred experience|nice[ -]to[ -]haves?|bonus points|a plus|preferred|bonus|minimum qualifications|basic qualifications|required qualifications|requirements|required|must[ -]haves?|qualifications)\b",
    )
    .expect("Invalid JD marker regex")
});

/// A number immediately followed by "year(s)" / "yr(s)", e.g. "5+ years", "3 yrs".
static YEARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})\s*\+?\s*(?:years?|yrs?)\b").expect("Invalid years regex")
});

static SENIOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bsenior\b").expect("Invalid senior regex"));

static MID: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bmid\b").expect("Invalid mid regex"));

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    #[default]
    Entry,
    Mid,
    Senior,
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedJobDescription {
    pub required_skills: BTreeSet<String>,
    pub preferred_skills: BTreeSet<String>,
    pub experience_level: ExperienceLevel,
    pub keywords: BTreeSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Zone {
    Required,
    Preferred,
}

/// Parses a raw job description. Never fails.
///
/// Each skill falls in the zone of the nearest marker before it; text ahead of any marker
/// is required. A skill seen in both zones is required only.
pub fn parse_job_description(
    raw_text: &str,
    vocabulary: &SkillVocabulary,
) -> Extraction<ParsedJobDescription> {
    let mut extraction = Extraction::new(ParsedJobDescription::default());

    if raw_text.trim().is_empty() {
        extraction.warn(ExtractionWarning::EmptyInput);
        return extraction;
    }

    let markers = find_markers(raw_text);
    if markers.is_empty() {
        extraction.warn(ExtractionWarning::NoMarkersFound);
    }

    let mut located: Vec<(usize, String)> = vocabulary
        .skills
        .find_hits(raw_text)
        .into_iter()
        .map(|hit| (hit.start, vocabulary.skills.terms()[hit.term].clone()))
        .collect();
    located.extend(listed_skills(&split_sections(raw_text), vocabulary));

    let mut required = BTreeSet::new();
    let mut preferred = BTreeSet::new();
    for (offset, skill) in located {
        match zone_at(&markers, offset) {
            Zone::Required => required.insert(skill),
            Zone::Preferred => preferred.insert(skill),
        };
    }
    preferred.retain(|skill| !required.contains(skill));

    if required.is_empty() && preferred.is_empty() {
        extraction.warn(ExtractionWarning::NoSkillsRecognized);
    }

    let mut keywords: BTreeSet<String> = required.union(&preferred).cloned().collect();
    keywords.extend(vocabulary.domain_terms.find_terms(raw_text));

    extraction.record = ParsedJobDescription {
        required_skills: required,
        preferred_skills: preferred,
        experience_level: classify_experience_level(raw_text),
        keywords,
    };
    extraction
}

/// Classifies seniority; the first matching rule wins.
///
/// 1. a number >= 5 next to "year(s)", or the word "senior" -> senior
/// 2. a number in 2..=4 next to "year(s)", or the word "mid" -> mid
/// 3. otherwise entry
pub fn classify_experience_level(text: &str) -> ExperienceLevel {
    let years: Vec<u32> = YEARS
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().parse().ok())
        .collect();

    if years.iter().any(|&y| y >= 5) || SENIOR.is_match(text) {
        ExperienceLevel::Senior
    } else if years.iter().any(|y| (2..=4).contains(y)) || MID.is_match(text) {
        ExperienceLevel::Mid
    } else {
        ExperienceLevel::Entry
    }
}

fn find_markers(text: &str) -> Vec<(usize, Zone)> {
    MARKERS
        .find_iter(text)
        .map(|m| {
            let phrase = m.as_str().to_lowercase();
            let zone = if phrase.starts_with("preferred")
                || phrase.starts_with("nice")
                || phrase.starts_with("bonus")
                || phrase == "a plus"
            {
                Zone::Preferred
            } else {
                Zone::Required
            };
            (m.start(), zone)
        })
        .collect()
}

fn zone_at(markers: &[(usize, Zone)], offset: usize) -> Zone {
    markers
        .iter()
        .take_while(|(start, _)| *start <= offset)
        .last()
        .map(|(_, zone)| *zone)
        .unwrap_or(Zone::Required)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::vocabulary::VocabularyFile;

    // Mirrors the shape of a real startup posting: inline markers, prose, "about" blurb.
    const STARTUP_JD: &str = r#"
        Senior Backend Engineer — Payments Infrastructure
        You will own microservices end to end and improve observability.
        Requirements: 5+ years Rust, PostgreSQL, Kafka.
        Nice to have: Kubernetes, Terraform.
        About Us: Series B fintech.
    "#;

    const ENTERPRISE_JD: &str = r#"
        Software Engineer — Platform Team
        Required: Java, Spring Boot, SQL.
        Preferred: Kubernetes, CI/CD experience.
        3 years of experience building services.
    "#;

    fn vocab() -> SkillVocabulary {
        SkillVocabulary::from_file_data(VocabularyFile {
            version: "test".to_string(),
            skills: [
                "Rust",
                "PostgreSQL",
                "Kafka",
                "Kubernetes",
                "Terraform",
                "Java",
                "Spring Boot",
                "SQL",
                "CI/CD",
                "React",
                "TypeScript",
                "Node.js",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            soft_skills: vec![],
            domain_terms: vec!["microservices".to_string(), "observability".to_string()],
            degree_terms: vec![],
        })
        .unwrap()
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_startup_jd_partitions_required_and_preferred() {
        let jd = parse_job_description(STARTUP_JD, &vocab()).into_record();
        assert_eq!(jd.required_skills, set(&["Kafka", "PostgreSQL", "Rust"]));
        assert_eq!(jd.preferred_skills, set(&["Kubernetes", "Terraform"]));
        assert_eq!(jd.experience_level, ExperienceLevel::Senior);
    }

    #[test]
    fn test_keywords_include_skills_and_domain_terms() {
        let jd = parse_job_description(STARTUP_JD, &vocab()).into_record();
        assert!(jd.keywords.contains("microservices"));
        assert!(jd.keywords.contains("observability"));
        assert!(jd.required_skills.is_subset(&jd.keywords));
        assert!(jd.preferred_skills.is_subset(&jd.keywords));
    }

    #[test]
    fn test_enterprise_jd_is_mid_level() {
        let jd = parse_job_description(ENTERPRISE_JD, &vocab()).into_record();
        assert_eq!(jd.required_skills, set(&["Java", "SQL", "Spring Boot"]));
        assert_eq!(jd.preferred_skills, set(&["CI/CD", "Kubernetes"]));
        assert_eq!(jd.experience_level, ExperienceLevel::Mid);
    }

    #[test]
    fn test_no_markers_means_everything_required() {
        let parsed = parse_job_description("We use React, TypeScript and Node.js daily.", &vocab());
        assert!(parsed.warnings.contains(&ExtractionWarning::NoMarkersFound));
        assert_eq!(
            parsed.record.required_skills,
            set(&["Node.js", "React", "TypeScript"])
        );
        assert!(parsed.record.preferred_skills.is_empty());
    }

    #[test]
    fn test_skill_in_both_zones_is_required_only() {
        let text = "Required: Rust, Kafka.\nPreferred: Rust at scale, Terraform.";
        let jd = parse_job_description(text, &vocab()).into_record();
        assert!(jd.required_skills.contains("Rust"));
        assert!(!jd.preferred_skills.contains("Rust"));
        assert!(jd.preferred_skills.contains("Terraform"));
    }

    #[test]
    fn test_preferred_qualifications_heading_stays_preferred() {
        let text = "Minimum qualifications: Java\nPreferred qualifications: Kafka";
        let jd = parse_job_description(text, &vocab()).into_record();
        assert_eq!(jd.required_skills, set(&["Java"]));
        assert_eq!(jd.preferred_skills, set(&["Kafka"]));
    }

    #[test]
    fn test_inline_marker_inside_skills_list_keeps_zones() {
        let text = "Skills: Rust, Docker; nice to have: Kafka";
        let jd = parse_job_description(text, &vocab()).into_record();
        assert_eq!(jd.required_skills, set(&["Docker", "Rust"]));
        assert_eq!(jd.preferred_skills, set(&["Kafka"]));
    }

    #[test]
    fn test_experience_level_rules_in_order() {
        assert_eq!(classify_experience_level("7 years of Go"), ExperienceLevel::Senior);
        assert_eq!(classify_experience_level("3-5 years"), ExperienceLevel::Senior);
        assert_eq!(classify_experience_level("Senior role"), ExperienceLevel::Senior);
        assert_eq!(classify_experience_level("2+ yrs preferred"), ExperienceLevel::Mid);
        assert_eq!(classify_experience_level("Mid-level engineer"), ExperienceLevel::Mid);
        assert_eq!(classify_experience_level("1 year internship"), ExperienceLevel::Entry);
        assert_eq!(classify_experience_level("Graduate role"), ExperienceLevel::Entry);
        // Senior is checked before mid even when both appear.
        assert_eq!(
            classify_experience_level("mid or senior candidates, 3 years"),
            ExperienceLevel::Senior
        );
    }

    #[test]
    fn test_empty_jd_is_entry_level_with_no_keywords() {
        let parsed = parse_job_description("", &vocab());
        assert_eq!(parsed.warnings, vec![ExtractionWarning::EmptyInput]);
        assert_eq!(parsed.record.experience_level, ExperienceLevel::Entry);
        assert!(parsed.record.keywords.is_empty());
    }

    #[test]
    fn test_experience_level_serializes_lowercase() {
        let json = serde_json::to_string(&ExperienceLevel::Senior).unwrap();
        assert_eq!(json, r#""senior""#);
        assert_eq!(ExperienceLevel::Mid.to_string(), "mid");
    }
}
