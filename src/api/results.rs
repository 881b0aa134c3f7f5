//! Result types produced by the extraction engine.
//!
//! One [`ExtractionReport`] per document: the reconstructed document text
//! plus a match record per surviving candidate, in engine emission order.

use serde::{Deserialize, Serialize};

/// A single extracted match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityMatch {
    /// The matched entity as `[text, id]`
    pub entity: (String, String),

    /// Character span `[start, end)` into the reconstructed document
    pub span: (usize, usize),

    /// The matched document substring
    #[serde(rename = "match")]
    pub text: String,

    /// True similarity score, `None` when verification is disabled
    pub score: Option<f64>,

    /// Verifier verdict, `None` when verification is disabled
    pub valid: Option<bool>,
}

/// All matches found in one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// The document as reconstructed from its token sequence
    pub document: String,

    /// Matches in emission order
    pub matches: Vec<EntityMatch>,
}

impl ExtractionReport {
    /// True when nothing matched.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Number of matches.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// The distinct matched substrings, in first-seen order.
    pub fn match_texts(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for m in &self.matches {
            if !seen.contains(&m.text.as_str()) {
                seen.push(m.text.as_str());
            }
        }
        seen
    }
}
