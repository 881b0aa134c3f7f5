//! Exact similarity scoring: the verify half of filter-and-verify.
//!
//! The filter admits every substring that *could* match; each survivor is
//! confirmed here by computing the true similarity. Token measures compare
//! token sequences, character measures compare the reconstructed strings.

use std::collections::HashSet;

use crate::core::config::SimilarityKind;
use crate::core::errors::{MuninnError, Result};

/// Outcome of verifying one candidate against its entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    /// Whether the true score clears the configured threshold
    pub valid: bool,

    /// The true similarity (or edit distance) score
    pub score: f64,
}

/// Jaccard similarity of two token sequences (set semantics).
pub fn jaccard(left: &[String], right: &[String]) -> f64 {
    let l: HashSet<&str> = left.iter().map(String::as_str).collect();
    let r: HashSet<&str> = right.iter().map(String::as_str).collect();
    let union = l.union(&r).count();
    if union == 0 {
        return 0.0;
    }
    l.intersection(&r).count() as f64 / union as f64
}

/// Cosine similarity of two token sequences: set intersection over the
/// geometric mean of the raw sequence lengths.
pub fn cosine(left: &[String], right: &[String]) -> f64 {
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }
    let l: HashSet<&str> = left.iter().map(String::as_str).collect();
    let r: HashSet<&str> = right.iter().map(String::as_str).collect();
    l.intersection(&r).count() as f64 / ((left.len() * right.len()) as f64).sqrt()
}

/// Dice similarity of two token sequences.
pub fn dice(left: &[String], right: &[String]) -> f64 {
    if left.is_empty() && right.is_empty() {
        return 0.0;
    }
    let l: HashSet<&str> = left.iter().map(String::as_str).collect();
    let r: HashSet<&str> = right.iter().map(String::as_str).collect();
    (2 * l.intersection(&r).count()) as f64 / (left.len() + right.len()) as f64
}

/// Levenshtein distance between two strings.
pub fn edit_distance_of(left: &str, right: &str) -> usize {
    edit_distance::edit_distance(left, right)
}

/// Normalized edit similarity: `1 - ED / max(|left|, |right|)`, counting
/// code points. Two empty strings are identical.
pub fn edit_similarity(left: &str, right: &str) -> f64 {
    let longest = left.chars().count().max(right.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - edit_distance_of(left, right) as f64 / longest as f64
}

/// Verify a candidate token sequence against an entity token sequence
/// under a token-based measure.
pub fn check_tokens(
    candidate: &[String],
    entity: &[String],
    kind: SimilarityKind,
    threshold: f64,
) -> Result<Verdict> {
    let score = match kind {
        SimilarityKind::Jaccard => jaccard(candidate, entity),
        SimilarityKind::Cosine => cosine(candidate, entity),
        SimilarityKind::Dice => dice(candidate, entity),
        SimilarityKind::EditSim | SimilarityKind::EditDist => {
            return Err(MuninnError::validation(format!(
                "similarity '{kind}' verifies strings, not token sequences"
            )));
        }
    };
    Ok(Verdict {
        valid: score >= threshold,
        score,
    })
}

/// Verify a candidate string against an entity string under a
/// character-based measure.
pub fn check_strings(
    candidate: &str,
    entity: &str,
    kind: SimilarityKind,
    threshold: f64,
) -> Result<Verdict> {
    match kind {
        SimilarityKind::EditDist => {
            let score = edit_distance_of(candidate, entity) as f64;
            Ok(Verdict {
                valid: score <= threshold,
                score,
            })
        }
        SimilarityKind::EditSim => {
            let score = edit_similarity(candidate, entity);
            Ok(Verdict {
                valid: score >= threshold,
                score,
            })
        }
        SimilarityKind::Jaccard | SimilarityKind::Cosine | SimilarityKind::Dice => {
            Err(MuninnError::validation(format!(
                "similarity '{kind}' verifies token sequences, not strings"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_jaccard_set_semantics() {
        let a = toks(&["a", "b", "c"]);
        let b = toks(&["a", "b"]);
        assert_relative_eq!(jaccard(&a, &b), 2.0 / 3.0);
        assert_relative_eq!(jaccard(&a, &a), 1.0);
        assert_relative_eq!(jaccard(&a, &toks(&["x"])), 0.0);
    }

    #[test]
    fn test_cosine_uses_raw_lengths() {
        let a = toks(&["a", "b"]);
        let b = toks(&["a", "b", "c", "d"]);
        // intersection 2 over sqrt(2 * 4)
        assert_relative_eq!(cosine(&a, &b), 2.0 / 8.0_f64.sqrt());
    }

    #[test]
    fn test_dice() {
        let a = toks(&["a", "b"]);
        let b = toks(&["b", "c"]);
        assert_relative_eq!(dice(&a, &b), 0.5);
    }

    #[test]
    fn test_edit_distance_values() {
        assert_eq!(edit_distance_of("dolor", "dolo"), 1);
        assert_eq!(edit_distance_of("dolor", "dolor"), 0);
        assert_eq!(edit_distance_of("kitten", "sitting"), 3);
    }

    #[test]
    fn test_edit_similarity() {
        assert_relative_eq!(edit_similarity("abcd", "abcd"), 1.0);
        assert_relative_eq!(edit_similarity("abcd", "abcx"), 0.75);
        assert_relative_eq!(edit_similarity("", ""), 1.0);
    }

    #[test]
    fn test_check_strings_edit_dist() {
        let v = check_strings("dolo", "dolor", SimilarityKind::EditDist, 1.0).unwrap();
        assert!(v.valid);
        assert_relative_eq!(v.score, 1.0);

        let v = check_strings("dol", "dolor", SimilarityKind::EditDist, 1.0).unwrap();
        assert!(!v.valid);
    }

    #[test]
    fn test_check_tokens_threshold() {
        let cand = toks(&["a", "b"]);
        let ent = toks(&["a", "b", "c"]);
        let v = check_tokens(&cand, &ent, SimilarityKind::Jaccard, 0.65).unwrap();
        assert!(v.valid);
        let v = check_tokens(&cand, &ent, SimilarityKind::Jaccard, 0.7).unwrap();
        assert!(!v.valid);
    }

    #[test]
    fn test_mismatched_family_is_rejected() {
        assert!(check_tokens(&[], &[], SimilarityKind::EditDist, 1.0).is_err());
        assert!(check_strings("a", "b", SimilarityKind::Jaccard, 0.5).is_err());
    }
}
