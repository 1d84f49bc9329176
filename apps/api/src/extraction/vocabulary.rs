//! Skill vocabulary: versioned lookup tables the extractor recognizes terms against.
//!
//! The vocabulary is configuration data. A default copy ships in `data/skill_vocabulary.json`;
//! deployments override it with `SKILL_VOCABULARY_PATH`, tests build fixtures with
//! `SkillVocabulary::from_terms`.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use aho_corasick::{AhoCorasick, MatchKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const BUNDLED_VOCABULARY: &str = include_str!("../../data/skill_vocabulary.json");

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("failed to read vocabulary file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid vocabulary JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("vocabulary '{version}' defines no skills")]
    Empty { version: String },

    #[error("failed to build term matcher: {0}")]
    Matcher(String),
}

/// On-disk shape of a vocabulary file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyFile {
    pub version: String,
    pub skills: Vec<String>,
    #[serde(default)]
    pub soft_skills: Vec<String>,
    #[serde(default)]
    pub domain_terms: Vec<String>,
    #[serde(default)]
    pub degree_terms: Vec<String>,
}

/// A single recognized occurrence of a vocabulary term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermHit {
    pub term: usize,
    pub start: usize,
}

/// Case-insensitive, term-boundary aware matcher over one list of terms.
///
/// Longer terms win over their prefixes ("React Native" over "React"), and a hit only
/// counts when the characters around it are not alphanumeric, so "Java" never
/// matches inside "JavaScript".
#[derive(Debug, Clone)]
pub struct TermMatcher {
    terms: Vec<String>,
    automaton: AhoCorasick,
}

impl TermMatcher {
    pub fn new(terms: Vec<String>) -> Result<Self, VocabularyError> {
        let automaton = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(&terms)
            .map_err(|e| VocabularyError::Matcher(e.to_string()))?;
        Ok(Self { terms, automaton })
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// All boundary-respecting hits in `text`, in text order. Offsets index into `text`.
    pub fn find_hits(&self, text: &str) -> Vec<TermHit> {
        if self.terms.is_empty() {
            return Vec::new();
        }
        self.automaton
            .find_iter(text)
            .filter(|m| on_term_boundary(text, m.start(), m.end()))
            .map(|m| TermHit {
                term: m.pattern().as_usize(),
                start: m.start(),
            })
            .collect()
    }

    /// Distinct terms found in `text`, in vocabulary spelling.
    pub fn find_terms(&self, text: &str) -> BTreeSet<String> {
        self.find_hits(text)
            .into_iter()
            .map(|hit| self.terms[hit.term].clone())
            .collect()
    }

    pub fn contains_any(&self, text: &str) -> bool {
        !self.find_hits(text).is_empty()
    }

    /// Returns the vocabulary spelling of `candidate` when it names a known term exactly.
    pub fn canonical(&self, candidate: &str) -> Option<&str> {
        let candidate = candidate.trim();
        self.terms
            .iter()
            .find(|term| term.eq_ignore_ascii_case(candidate))
            .map(String::as_str)
    }
}

fn on_term_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

/// The compiled vocabulary handed to the extractor and the suggestion rules.
#[derive(Debug, Clone)]
pub struct SkillVocabulary {
    pub version: String,
    pub skills: TermMatcher,
    pub soft_skills: TermMatcher,
    pub domain_terms: TermMatcher,
    pub degree_terms: TermMatcher,
}

impl SkillVocabulary {
    /// The vocabulary compiled into the binary.
    pub fn bundled() -> Result<Self, VocabularyError> {
        Self::from_json(BUNDLED_VOCABULARY)
    }

    pub fn from_json(json: &str) -> Result<Self, VocabularyError> {
        let file: VocabularyFile = serde_json::from_str(json)?;
        Self::from_file_data(file)
    }

    pub fn from_path(path: &Path) -> Result<Self, VocabularyError> {
        let json = std::fs::read_to_string(path).map_err(|source| VocabularyError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn from_file_data(file: VocabularyFile) -> Result<Self, VocabularyError> {
        let skills = normalize_terms(file.skills);
        if skills.is_empty() {
            return Err(VocabularyError::Empty {
                version: file.version,
            });
        }

        Ok(Self {
            version: file.version,
            skills: TermMatcher::new(skills)?,
            soft_skills: TermMatcher::new(normalize_terms(file.soft_skills))?,
            domain_terms: TermMatcher::new(normalize_terms(file.domain_terms))?,
            degree_terms: TermMatcher::new(normalize_terms(file.degree_terms))?,
        })
    }

    /// Fixture constructor: skills only, every other table empty.
    #[cfg(test)]
    pub fn from_terms(version: &str, skills: &[&str]) -> Result<Self, VocabularyError> {
        Self::from_file_data(VocabularyFile {
            version: version.to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            soft_skills: Vec::new(),
            domain_terms: Vec::new(),
            degree_terms: Vec::new(),
        })
    }
}

/// Trims, drops blanks, and removes case-insensitive duplicates keeping the first spelling.
fn normalize_terms(terms: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    terms
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.to_lowercase()))
        .collect()
}
