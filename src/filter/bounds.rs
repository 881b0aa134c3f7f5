//! Similarity bound formulas used by the filter.
//!
//! Every pruning decision rests on four families of bounds, all pure
//! functions of the entity token length `n`, the threshold, and (for the
//! character measures) the q-gram width:
//!
//! - the valid-substring length window `[min, max]` a match must fall in,
//! - the entity-level overlap lower bound (lazy-count bound),
//! - the per-candidate overlap threshold `T(n, |s|)`,
//! - the tighter window / neighbor-gap caps exploited by batch-count and
//!   bucket-count.
//!
//! The similarity is selected once at engine construction; bounds that can
//! go negative mark the entity as unmatchable and drop it from the index.

use serde::{Deserialize, Serialize};

use crate::core::config::{ExtractionConfig, SimilarityKind};
use crate::core::errors::Result;

/// Similarity measure with its threshold, dispatched once at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Similarity {
    /// Jaccard similarity at threshold `delta`
    Jaccard {
        /// Similarity threshold in (0, 1]
        delta: f64,
    },
    /// Cosine similarity at threshold `delta`
    Cosine {
        /// Similarity threshold in (0, 1]
        delta: f64,
    },
    /// Dice similarity at threshold `delta`
    Dice {
        /// Similarity threshold in (0, 1]
        delta: f64,
    },
    /// Edit similarity at threshold `delta` over q-grams
    EditSim {
        /// Similarity threshold in (0, 1]
        delta: f64,
        /// q-gram width
        q: usize,
    },
    /// Edit distance with at most `tau` operations, over q-grams
    EditDist {
        /// Maximum number of edit operations
        tau: usize,
        /// q-gram width
        q: usize,
    },
}

impl Similarity {
    /// Build the similarity variant from a validated configuration.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        config.validate()?;
        let q = config.tokenizer.q;
        Ok(match config.similarity {
            SimilarityKind::Jaccard => Self::Jaccard {
                delta: config.threshold,
            },
            SimilarityKind::Cosine => Self::Cosine {
                delta: config.threshold,
            },
            SimilarityKind::Dice => Self::Dice {
                delta: config.threshold,
            },
            SimilarityKind::EditSim => Self::EditSim {
                delta: config.threshold,
                q,
            },
            SimilarityKind::EditDist => Self::EditDist {
                tau: config.tau(),
                q,
            },
        })
    }

    /// The measure's kind tag.
    pub fn kind(&self) -> SimilarityKind {
        match self {
            Self::Jaccard { .. } => SimilarityKind::Jaccard,
            Self::Cosine { .. } => SimilarityKind::Cosine,
            Self::Dice { .. } => SimilarityKind::Dice,
            Self::EditSim { .. } => SimilarityKind::EditSim,
            Self::EditDist { .. } => SimilarityKind::EditDist,
        }
    }

    /// Smallest token length a matching substring can have.
    pub fn min_substring_len(&self, entity_len: usize) -> i64 {
        let n = entity_len as f64;
        match *self {
            Self::Jaccard { delta } => (n * delta).ceil() as i64,
            Self::Cosine { delta } => (n * (delta * delta)).ceil() as i64,
            Self::Dice { delta } => (n * (delta / (2.0 - delta))).ceil() as i64,
            Self::EditSim { delta, q } => {
                ((n + q as f64 - 1.0) * delta - (q as f64 - 1.0)).ceil() as i64
            }
            Self::EditDist { tau, q: _ } => entity_len as i64 - tau as i64,
        }
    }

    /// Largest token length a matching substring can have.
    pub fn max_substring_len(&self, entity_len: usize) -> i64 {
        let n = entity_len as f64;
        match *self {
            Self::Jaccard { delta } => (n / delta).floor() as i64,
            Self::Cosine { delta } => (n / (delta * delta)).floor() as i64,
            Self::Dice { delta } => (n * ((2.0 - delta) / delta)).floor() as i64,
            Self::EditSim { delta, q } => {
                ((n + q as f64 - 1.0) / delta - (q as f64 - 1.0)).floor() as i64
            }
            Self::EditDist { tau, q: _ } => (entity_len + tau) as i64,
        }
    }

    /// Minimum number of entity tokens any matching substring must share
    /// with the entity (the lazy-count bound).
    pub fn overlap_lower_bound(&self, entity_len: usize) -> i64 {
        let n = entity_len as f64;
        match *self {
            Self::Jaccard { delta } => (n * delta).ceil() as i64,
            Self::Cosine { delta } => (n * (delta * delta)).ceil() as i64,
            Self::Dice { delta } => (n * (delta / (2.0 - delta))).ceil() as i64,
            Self::EditSim { delta, q } => {
                (n - (n + q as f64 - 1.0) * ((1.0 - delta) / delta) * q as f64).ceil() as i64
            }
            Self::EditDist { tau, q } => entity_len as i64 - (tau * q) as i64,
        }
    }

    /// Per-candidate overlap threshold `T`: how many entity tokens a
    /// substring of `substring_len` tokens must contain to possibly match.
    pub fn overlap_threshold(&self, entity_len: usize, substring_len: usize) -> i64 {
        let n = entity_len as f64;
        let s = substring_len as f64;
        match *self {
            Self::Jaccard { delta } => ((n + s) * (delta / (1.0 + delta))).ceil() as i64,
            Self::Cosine { delta } => ((n * s).sqrt() * delta).ceil() as i64,
            Self::Dice { delta } => ((n + s) * (delta / 2.0)).ceil() as i64,
            Self::EditSim { delta, q } => {
                let m = n.max(s);
                (m - (m + q as f64 - 1.0) * (1.0 - delta) * q as f64).ceil() as i64
            }
            Self::EditDist { tau, q } => {
                entity_len.max(substring_len) as i64 - (tau * q) as i64
            }
        }
    }

    /// Tighter cap on the physical window span, available for the token
    /// measures only: a window holding `window_len` of the entity's
    /// positions cannot stretch past this many tokens.
    pub fn window_span_cap(&self, entity_len: usize, window_len: usize) -> Option<i64> {
        let m = entity_len.min(window_len) as f64;
        match *self {
            Self::Jaccard { delta } => Some((m / delta).floor() as i64),
            Self::Cosine { delta } => Some((m / (delta * delta)).floor() as i64),
            Self::Dice { delta } => Some((m * ((2.0 - delta) / delta)).floor() as i64),
            Self::EditSim { .. } | Self::EditDist { .. } => None,
        }
    }

    /// Tighter bucket-split threshold, available for the character
    /// measures only: adjacent matched positions whose exclusive gap
    /// exceeds this cannot share a valid window.
    pub fn neighbor_gap_bound(&self, entity_len: usize) -> Option<i64> {
        match *self {
            Self::Jaccard { .. } | Self::Cosine { .. } | Self::Dice { .. } => None,
            Self::EditSim { delta, q } => {
                let n = entity_len as f64;
                Some((((n + q as f64 - 1.0) / delta) * (1.0 - delta) * q as f64).floor() as i64)
            }
            Self::EditDist { tau, q } => Some((tau * q) as i64),
        }
    }
}

/// Precomputed per-entity bounds, in token units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityBounds {
    /// Minimum token length of a matching substring
    pub min_len: usize,

    /// Maximum token length of a matching substring
    pub max_len: usize,

    /// Minimum shared-token count for the entity to stay alive, at least 1
    pub min_overlap: usize,
}

impl EntityBounds {
    /// Compute the bounds for an entity of `entity_len` tokens, or `None`
    /// when the entity cannot match anything (no tokens, or a bound went
    /// negative).
    pub fn compute(similarity: &Similarity, entity_len: usize) -> Option<Self> {
        if entity_len == 0 {
            return None;
        }
        let min_len = similarity.min_substring_len(entity_len);
        let max_len = similarity.max_substring_len(entity_len);
        let min_overlap = similarity.overlap_lower_bound(entity_len);
        if min_len < 0 || max_len < 0 || min_overlap < 0 {
            return None;
        }
        Some(Self {
            min_len: min_len as usize,
            max_len: max_len as usize,
            // a window needs at least one shared position to be observable
            min_overlap: (min_overlap as usize).max(1),
        })
    }
}
