//! Section and entry segmentation shared by the résumé and job-description parsers.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extraction::is_bullet;

/// Month-or-numeric prefix, year, separator, then year or an open end.
static DATE_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:(?:jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\.?\s+|\d{1,2}/)?(?:19|20)\d{2}\s*(?:-|–|—|to|until)\s*(?:(?:(?:jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\.?\s+|\d{1,2}/)?(?:19|20)\d{2}|present|current|now|today)\b",
    )
    .expect("Invalid date range regex")
});

const SKILLS_HEADINGS: &[&str] = &[
    "skills",
    "technical skills",
    "core skills",
    "key skills",
    "skills & tools",
    "skills and tools",
    "core competencies",
    "competencies",
    "technologies",
    "tech stack",
    "tools & technologies",
    "tools and technologies",
];

const EXPERIENCE_HEADINGS: &[&str] = &[
    "experience",
    "work experience",
    "professional experience",
    "relevant experience",
    "employment",
    "employment history",
    "work history",
    "career history",
];

const EDUCATION_HEADINGS: &[&str] = &[
    "education",
    "education & training",
    "education and training",
    "academic background",
    "academics",
];

const OTHER_HEADINGS: &[&str] = &[
    "summary",
    "professional summary",
    "profile",
    "objective",
    "about",
    "about me",
    "about us",
    "projects",
    "personal projects",
    "certifications",
    "awards",
    "publications",
    "interests",
    "references",
    "volunteering",
    "volunteer experience",
    "contact",
    "responsibilities",
    "benefits",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// Text before the first recognized heading.
    Unlabeled,
    Skills,
    Experience,
    Education,
    Other,
}

/// One line of input with its byte offset into the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub offset: usize,
    pub text: &'a str,
}

impl Line<'_> {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Section<'a> {
    pub kind: SectionKind,
    pub lines: Vec<Line<'a>>,
}

/// Splits `text` into sections at recognized headings.
///
/// `Skills: Rust, Go` is a heading with inline content; the remainder becomes the
/// first line of the section.
pub fn split_sections(text: &str) -> Vec<Section<'_>> {
    let mut sections = vec![Section {
        kind: SectionKind::Unlabeled,
        lines: Vec::new(),
    }];

    for line in lines_with_offsets(text) {
        match classify_heading(line) {
            Some((kind, inline)) => {
                let mut lines = Vec::new();
                if let Some(inline) = inline {
                    lines.push(inline);
                }
                sections.push(Section { kind, lines });
            }
            None => {
                if let Some(current) = sections.last_mut() {
                    current.lines.push(line);
                }
            }
        }
    }

    sections
}

/// Whether any line of `text` is a recognized heading.
pub fn has_headings(sections: &[Section<'_>]) -> bool {
    sections.iter().any(|s| s.kind != SectionKind::Unlabeled)
}

pub fn lines_with_offsets(text: &str) -> impl Iterator<Item = Line<'_>> {
    let mut offset = 0;
    text.split_inclusive('\n').map(move |raw| {
        let line = Line {
            offset,
            text: raw.trim_end_matches(['\n', '\r']),
        };
        offset += raw.len();
        line
    })
}

/// Recognizes a heading line, returning its kind and any inline content after a colon.
fn classify_heading(line: Line<'_>) -> Option<(SectionKind, Option<Line<'_>>)> {
    let trimmed = line.text.trim();
    if trimmed.is_empty() || trimmed.len() > 60 {
        return None;
    }
    let leading = line.text.len() - line.text.trim_start().len();

    let (label, inline) = match trimmed.find(':') {
        Some(idx) => {
            let rest = &trimmed[idx + 1..];
            let content = rest.trim_start();
            let inline = (!content.trim().is_empty()).then(|| Line {
                offset: line.offset + leading + idx + 1 + (rest.len() - content.len()),
                text: content,
            });
            (&trimmed[..idx], inline)
        }
        None => (trimmed, None),
    };

    let kind = heading_kind(&normalize_label(label))?;
    Some((kind, inline))
}

fn normalize_label(label: &str) -> String {
    label
        .trim_matches(|c: char| !c.is_alphanumeric() && c != '&')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn heading_kind(label: &str) -> Option<SectionKind> {
    let tables = [
        (SKILLS_HEADINGS, SectionKind::Skills),
        (EXPERIENCE_HEADINGS, SectionKind::Experience),
        (EDUCATION_HEADINGS, SectionKind::Education),
        (OTHER_HEADINGS, SectionKind::Other),
    ];
    tables
        .iter()
        .find(|(headings, _)| headings.contains(&label))
        .map(|(_, kind)| *kind)
}

pub fn has_date_range(text: &str) -> bool {
    DATE_RANGE.is_match(text)
}

pub fn strip_date_ranges(text: &str) -> Cow<'_, str> {
    DATE_RANGE.replace_all(text, "")
}

/// Groups section lines into free-text entries.
///
/// A blank line closes the current entry. A second date-range line inside one entry
/// starts a new entry, taking the title line just above it along.
pub fn group_entries(lines: &[Line<'_>]) -> Vec<String> {
    let mut entries = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_has_date = false;

    for line in lines {
        if line.is_blank() {
            flush_entry(&mut entries, &mut current);
            current_has_date = false;
            continue;
        }

        let text = line.text.trim();
        let dated = has_date_range(text);
        if dated && current_has_date {
            let carry_title = current.len() > 1
                && current
                    .last()
                    .is_some_and(|last| !is_bullet(last) && !has_date_range(last));
            let carried = if carry_title { current.pop() } else { None };
            flush_entry(&mut entries, &mut current);
            current.extend(carried);
            current_has_date = false;
        }

        current_has_date |= dated;
        current.push(text);
    }

    flush_entry(&mut entries, &mut current);
    entries
}

fn flush_entry(entries: &mut Vec<String>, current: &mut Vec<&str>) {
    if !current.is_empty() {
        entries.push(current.join("\n"));
        current.clear();
    }
}
