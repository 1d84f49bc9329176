//! Text Feature Extractor: turns raw résumé and job-description text into structured records.
//!
//! Every entry point here is total: malformed or sparse text produces empty collections
//! plus `ExtractionWarning`s, never an error.

pub mod job_description;
pub mod resume;
pub mod sections;
pub mod vocabulary;

use serde::{Deserialize, Serialize};

use crate::extraction::sections::{Section, SectionKind};
use crate::extraction::vocabulary::SkillVocabulary;

/// Recovered problems with the input text. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionWarning {
    /// The text was empty or whitespace only.
    EmptyInput,
    /// No section heading (skills, experience, education, ...) was found.
    NoSectionsRecognized,
    /// Neither the vocabulary nor a skills heading produced a single skill.
    NoSkillsRecognized,
    /// A job description carried no required/preferred markers; all skills count as required.
    NoMarkersFound,
}

/// Output of an extraction: always a fully-populated record, plus whatever was recovered from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extraction<T> {
    pub record: T,
    pub warnings: Vec<ExtractionWarning>,
}

impl<T> Extraction<T> {
    pub fn new(record: T) -> Self {
        Self {
            record,
            warnings: Vec::new(),
        }
    }

    pub fn warn(&mut self, warning: ExtractionWarning) {
        if !self.warnings.contains(&warning) {
            self.warnings.push(warning);
        }
    }

    #[cfg(test)]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    #[cfg(test)]
    pub fn into_record(self) -> T {
        self.record
    }
}

/// Bullet glyphs that open a list line.
const BULLET_PREFIXES: &[char] = &['-', '*', '•', '·', '–', '▪', '◦', '>'];

pub(crate) fn is_bullet(line: &str) -> bool {
    line.trim_start().starts_with(BULLET_PREFIXES)
}

pub(crate) fn strip_bullet(line: &str) -> &str {
    line.trim().trim_start_matches(BULLET_PREFIXES).trim()
}

/// Splits a skills list line into candidate skill phrases, each with its byte offset
/// within `line`.
///
/// `CI/CD` stays intact; only a slash surrounded by spaces separates items. A `Label:`
/// prefix is dropped per item, so `Rust, Docker; nice to have: Kafka` yields Kafka at
/// its own position after the label.
pub(crate) fn split_list_items(line: &str) -> Vec<(usize, String)> {
    let mut items = Vec::new();
    let mut start = 0;
    for (idx, c) in line.char_indices() {
        if matches!(c, ',' | ';' | '|' | '•' | '·') {
            push_chunk_items(line, start, idx, &mut items);
            start = idx + c.len_utf8();
        }
    }
    push_chunk_items(line, start, line.len(), &mut items);
    items
}

fn push_chunk_items(line: &str, start: usize, end: usize, items: &mut Vec<(usize, String)>) {
    let mut part_start = start;
    for part in line[start..end].split(" / ") {
        let part_offset = part_start;
        part_start += part.len() + " / ".len();

        let (body_offset, body) = match part.rfind(':') {
            Some(idx) => (part_offset + idx + 1, &part[idx + 1..]),
            None => (part_offset, part),
        };
        let item = strip_bullet(body).trim_end_matches('.').trim();
        if !is_plausible_skill(item) {
            continue;
        }
        let lead = body.find(item).unwrap_or(0);
        items.push((body_offset + lead, item.to_string()));
    }
}

/// Skills listed under skills-family headings, with the byte offset of each item.
///
/// Items naming a vocabulary term are reported in vocabulary spelling; anything else is
/// kept as written.
pub(crate) fn listed_skills(
    sections: &[Section<'_>],
    vocabulary: &SkillVocabulary,
) -> Vec<(usize, String)> {
    sections
        .iter()
        .filter(|s| s.kind == SectionKind::Skills)
        .flat_map(|s| s.lines.iter())
        .flat_map(|line| {
            split_list_items(line.text)
                .into_iter()
                .map(move |(offset, item)| {
                    let skill = vocabulary
                        .skills
                        .canonical(&item)
                        .map(str::to_string)
                        .unwrap_or(item);
                    (line.offset + offset, skill)
                })
        })
        .collect()
}

fn is_plausible_skill(item: &str) -> bool {
    !item.is_empty()
        && item.len() <= 40
        && item.split_whitespace().count() <= 4
        && item.chars().any(|c| c.is_alphabetic())
}
