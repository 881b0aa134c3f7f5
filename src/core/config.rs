//! Configuration types and management for the extraction engine.
//!
//! This module provides the configuration structures shared by the filter
//! engine, the tokenizer, and the CLI, together with validation that
//! enforces the similarity-family / tokenizer-mode pairing rules at
//! construction time.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::errors::{MuninnError, Result};

/// Similarity measure used for both filtering bounds and verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityKind {
    /// Jaccard similarity over token sets
    Jaccard,
    /// Cosine similarity over token sets
    Cosine,
    /// Dice similarity over token sets
    Dice,
    /// Normalized edit similarity over strings
    EditSim,
    /// Levenshtein distance over strings
    EditDist,
}

impl SimilarityKind {
    /// True for the string-level measures that operate on q-grams.
    pub fn is_character_based(self) -> bool {
        matches!(self, Self::EditSim | Self::EditDist)
    }

    /// True for the set-overlap measures that operate on word tokens.
    pub fn is_token_based(self) -> bool {
        !self.is_character_based()
    }

    /// Canonical lowercase name, as used in config files and CLI flags.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jaccard => "jaccard",
            Self::Cosine => "cosine",
            Self::Dice => "dice",
            Self::EditSim => "edit_sim",
            Self::EditDist => "edit_dist",
        }
    }
}

impl fmt::Display for SimilarityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pruning strategy applied before the counting phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PrunerKind {
    /// Enumerate every window (baseline, quadratic)
    None,
    /// Lazy-count: skip entities whose occurrence count cannot reach the bound
    Lazy,
    /// Bucket-count: split position lists at unbridgeable gaps
    Bucket,
    /// Batch-count: binary span/shift sweep (production default)
    #[default]
    Batch,
}

impl PrunerKind {
    /// Canonical lowercase name, as used in config files and CLI flags.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Lazy => "lazy",
            Self::Bucket => "bucket",
            Self::Batch => "batch",
        }
    }
}

impl fmt::Display for PrunerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tokenization granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenMode {
    /// q-grams over the character sequence
    Char,
    /// Whitespace-separated words
    Word,
}

/// Tokenizer configuration shared by dictionary construction and document
/// processing. The same tokenizer must be used for both, or the inverted
/// index probes miss.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenizerConfig {
    /// Tokenization granularity
    pub mode: TokenMode,

    /// q-gram width (char mode only)
    pub q: usize,

    /// Substituted for U+0020 before q-gram extraction; `None` keeps spaces
    pub special_char: Option<char>,

    /// Remove duplicate tokens, preserving first-seen order
    pub unique: bool,

    /// Unicode-lowercase the input first
    pub lower: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            mode: TokenMode::Char,
            q: 2,
            special_char: Some('_'),
            unique: false,
            lower: true,
        }
    }
}

/// Main configuration for the extraction engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Tokenizer settings
    pub tokenizer: TokenizerConfig,

    /// Similarity measure
    pub similarity: SimilarityKind,

    /// Similarity threshold: in (0, 1] for similarity measures, a
    /// non-negative integer number of edit operations for edit distance
    pub threshold: f64,

    /// Pruning strategy
    pub pruner: PrunerKind,

    /// Run the exact verifier on every filtered match
    pub verify: bool,

    /// Drop matches the verifier rejects (only meaningful with `verify`)
    pub valid_only: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            tokenizer: TokenizerConfig::default(),
            similarity: SimilarityKind::EditDist,
            threshold: 2.0,
            pruner: PrunerKind::Batch,
            verify: true,
            valid_only: true,
        }
    }
}

impl ExtractionConfig {
    /// Validate the configuration, rejecting incompatible similarity/mode
    /// pairings and out-of-range thresholds.
    pub fn validate(&self) -> Result<()> {
        match self.tokenizer.mode {
            TokenMode::Char => {
                if self.similarity.is_token_based() {
                    return Err(MuninnError::config_field(
                        format!(
                            "similarity '{}' requires word tokenization; use edit_dist or edit_sim with char mode",
                            self.similarity
                        ),
                        "similarity",
                    ));
                }
                if self.tokenizer.q == 0 {
                    return Err(MuninnError::config_field(
                        "q must be at least 1 in char mode",
                        "tokenizer.q",
                    ));
                }
            }
            TokenMode::Word => {
                if self.similarity.is_character_based() {
                    return Err(MuninnError::config_field(
                        format!(
                            "similarity '{}' requires char tokenization; use jaccard, cosine or dice with word mode",
                            self.similarity
                        ),
                        "similarity",
                    ));
                }
            }
        }

        match self.similarity {
            SimilarityKind::EditDist => {
                if self.threshold < 0.0 || self.threshold.fract() != 0.0 {
                    return Err(MuninnError::config_field(
                        "edit distance threshold must be a non-negative integer",
                        "threshold",
                    ));
                }
            }
            _ => validate_unit_range(self.threshold, "threshold")?,
        }

        Ok(())
    }

    /// The edit-distance threshold as an integer operation count.
    ///
    /// Only meaningful when `similarity` is `edit_dist`; callers go through
    /// `validate` first.
    pub fn tau(&self) -> usize {
        self.threshold as usize
    }

    /// Load a configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            MuninnError::io(format!("failed to read config file {}", path.display()), e)
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse a configuration from a YAML string.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to YAML.
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Validate that a threshold-like value lies in the half-open unit range
/// (0.0, 1.0].
pub fn validate_unit_range(value: f64, name: &str) -> Result<()> {
    if value <= 0.0 || value > 1.0 {
        return Err(MuninnError::config_field(
            format!("{name} must be in (0.0, 1.0], got {value}"),
            name,
        ));
    }
    Ok(())
}
