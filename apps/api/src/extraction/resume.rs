//! Résumé parser: skills, experience entries and education entries from raw text.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::extraction::sections::{
    group_entries, has_date_range, has_headings, split_sections, Section, SectionKind,
};
use crate::extraction::vocabulary::SkillVocabulary;
use crate::extraction::{listed_skills, Extraction, ExtractionWarning};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedResume {
    pub raw_text: String,
    pub skills: BTreeSet<String>,
    pub experience_entries: Vec<String>,
    pub education_entries: Vec<String>,
}

/// Parses raw résumé text. Never fails; unrecognizable text yields empty collections.
///
/// Skills come from two places: vocabulary terms anywhere in the text, and list items
/// under a skills heading. Entries come from experience/education sections, or, when the
/// text has neither heading, from individual lines carrying a date range.
pub fn parse_resume(raw_text: &str, vocabulary: &SkillVocabulary) -> Extraction<ParsedResume> {
    let mut extraction = Extraction::new(ParsedResume {
        raw_text: raw_text.to_string(),
        ..ParsedResume::default()
    });

    if raw_text.trim().is_empty() {
        extraction.warn(ExtractionWarning::EmptyInput);
        return extraction;
    }

    let sections = split_sections(raw_text);
    if !has_headings(&sections) {
        extraction.warn(ExtractionWarning::NoSectionsRecognized);
    }

    let mut skills = vocabulary.skills.find_terms(raw_text);
    skills.extend(
        listed_skills(&sections, vocabulary)
            .into_iter()
            .map(|(_, skill)| skill),
    );
    if skills.is_empty() {
        extraction.warn(ExtractionWarning::NoSkillsRecognized);
    }

    let has_entry_sections = sections
        .iter()
        .any(|s| matches!(s.kind, SectionKind::Experience | SectionKind::Education));

    let (experience_entries, education_entries) = if has_entry_sections {
        (
            section_entries(&sections, SectionKind::Experience),
            section_entries(&sections, SectionKind::Education),
        )
    } else {
        dated_line_entries(&sections, vocabulary)
    };

    extraction.record.skills = skills;
    extraction.record.experience_entries = experience_entries;
    extraction.record.education_entries = education_entries;
    extraction
}

fn section_entries(sections: &[Section<'_>], kind: SectionKind) -> Vec<String> {
    sections
        .iter()
        .filter(|s| s.kind == kind)
        .flat_map(|s| group_entries(&s.lines))
        .collect()
}

/// Fallback for unstructured text: every dated line is an entry, classified as education
/// when it names a degree or institution.
fn dated_line_entries(
    sections: &[Section<'_>],
    vocabulary: &SkillVocabulary,
) -> (Vec<String>, Vec<String>) {
    let mut experience = Vec::new();
    let mut education = Vec::new();

    for line in sections
        .iter()
        .filter(|s| s.kind != SectionKind::Skills)
        .flat_map(|s| s.lines.iter())
    {
        let text = line.text.trim();
        if !has_date_range(text) {
            continue;
        }
        if vocabulary.degree_terms.contains_any(text) {
            education.push(text.to_string());
        } else {
            experience.push(text.to_string());
        }
    }

    (experience, education)
}
