use crate::error::MatchError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Root-relative path of a PDF, unique within one search run.
pub type DocumentId = String;

/// Extracted text per document. Empty text means extraction failed or found nothing.
pub type Corpus = BTreeMap<DocumentId, String>;

pub type MatchResults = BTreeMap<DocumentId, MatchResult>;

pub const DEFAULT_FUZZY_THRESHOLD: u8 = 80;
pub const MAX_THRESHOLD: u8 = 100;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MatchMode {
    /// Best line by partial-ratio similarity, kept when the score reaches `threshold`.
    Fuzzy { threshold: u8 },
    /// First line containing the phrase, case-insensitive.
    Exact,
    /// Document words starting with any query word of four or more characters.
    Partial,
}

impl MatchMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fuzzy { .. } => "fuzzy",
            Self::Exact => "exact",
            Self::Partial => "partial",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Query {
    pub mode: MatchMode,
    pub phrase: String,
}

impl Query {
    pub fn new(mode: MatchMode, phrase: impl AsRef<str>) -> Result<Self, MatchError> {
        let query = Self {
            mode,
            phrase: phrase.as_ref().trim().to_string(),
        };
        query.validate()?;
        Ok(query)
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        if self.phrase.trim().is_empty() {
            return Err(MatchError::InvalidQuery("search phrase is empty".to_string()));
        }

        if let MatchMode::Fuzzy { threshold } = self.mode {
            if threshold > MAX_THRESHOLD {
                return Err(MatchError::InvalidQuery(format!(
                    "similarity threshold {threshold} is outside 0..={MAX_THRESHOLD}"
                )));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(tag = "kind", content = "score", rename_all = "snake_case")]
pub enum MatchScore {
    Fuzzy(u8),
    Exact,
    Partial,
}

impl MatchScore {
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MatchScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fuzzy(score) => write!(f, "{score}%"),
            Self::Exact => f.write_str("Exact Match"),
            Self::Partial => f.write_str("Partial Match"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchResult {
    pub document_id: DocumentId,
    pub score: MatchScore,
    pub matched_text: String,
}

impl MatchResult {
    pub fn score_label(&self) -> String {
        self.score.label()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MatchProgress<'a> {
    /// 1-based position of the document just processed.
    pub position: usize,
    pub total: usize,
    pub document_id: &'a str,
    pub matched: bool,
}

#[derive(Debug, Clone)]
pub struct CorpusOptions {
    pub max_concurrent_extractions: usize,
}

impl Default for CorpusOptions {
    fn default() -> Self {
        Self {
            max_concurrent_extractions: 4,
        }
    }
}
