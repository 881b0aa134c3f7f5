//! Inverted index from tokens to the entities containing them.
//!
//! Built once per dictionary. Posting lists are ordered ascending by
//! entity index — the heap traversal in [`crate::filter::scan`] depends on
//! this ordering to emit each entity's positions as one contiguous run.
//! Duplicate tokens inside an entity produce duplicate postings on
//! purpose: the occurrence count feeds the overlap counting downstream.

use ahash::AHashMap;
use indexmap::IndexMap;

/// Token to ascending entity-index postings.
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    postings: AHashMap<String, Vec<usize>>,
}

impl InvertedIndex {
    /// Build the index from `(entity_index, tokens)` pairs. Callers must
    /// supply entities in ascending index order and skip entities that
    /// were invalidated by their bounds.
    pub fn from_entities<'a, I>(entities: I) -> Self
    where
        I: IntoIterator<Item = (usize, &'a [String])>,
    {
        let mut postings: AHashMap<String, Vec<usize>> = AHashMap::new();
        for (index, tokens) in entities {
            for token in tokens {
                postings.entry(token.clone()).or_default().push(index);
            }
        }
        Self { postings }
    }

    /// Number of distinct tokens in the index.
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    /// True when no entity contributed any token.
    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Posting list for a token, if any entity contains it.
    pub fn get(&self, token: &str) -> Option<&[usize]> {
        self.postings.get(token).map(Vec::as_slice)
    }

    /// Look up every document token and keep the positions that hit.
    ///
    /// The result maps token position to the posting list of the token at
    /// that position, with positions in ascending order.
    pub fn probe<'a>(&'a self, doc_tokens: &[String]) -> DocumentLists<'a> {
        let mut lists = IndexMap::new();
        for (position, token) in doc_tokens.iter().enumerate() {
            if let Some(entities) = self.postings.get(token) {
                lists.insert(position, entities.as_slice());
            }
        }
        DocumentLists { lists }
    }
}

/// Per-document inverted lists: matched token position → posting list.
///
/// Iteration order is insertion order, which [`InvertedIndex::probe`]
/// guarantees to be ascending by position.
#[derive(Debug, Clone)]
pub struct DocumentLists<'a> {
    pub(crate) lists: IndexMap<usize, &'a [usize]>,
}

impl<'a> DocumentLists<'a> {
    /// Number of document positions that matched some entity token.
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// True when no document token matched any entity token.
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Total number of postings across all matched positions; this is the
    /// exact number of heap emissions a full scan performs.
    pub fn total_postings(&self) -> usize {
        self.lists.values().map(|l| l.len()).sum()
    }

    #[cfg(test)]
    pub(crate) fn from_parts(lists: IndexMap<usize, &'a [usize]>) -> Self {
        Self { lists }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_postings_are_ascending_with_duplicates() {
        let e0 = toks(&["ab", "bc", "ab"]);
        let e1 = toks(&["bc", "cd"]);
        let index = InvertedIndex::from_entities([(0, e0.as_slice()), (1, e1.as_slice())]);

        assert_eq!(index.get("ab"), Some(&[0, 0][..]));
        assert_eq!(index.get("bc"), Some(&[0, 1][..]));
        assert_eq!(index.get("cd"), Some(&[1][..]));
        assert_eq!(index.get("zz"), None);
    }

    #[test]
    fn test_probe_keeps_matched_positions_in_order() {
        let e0 = toks(&["ab", "bc"]);
        let index = InvertedIndex::from_entities([(0, e0.as_slice())]);

        let doc = toks(&["xx", "ab", "yy", "bc", "ab"]);
        let lists = index.probe(&doc);
        assert_eq!(lists.len(), 3);
        assert_eq!(lists.total_postings(), 3);
        let positions: Vec<usize> = lists.lists.keys().copied().collect();
        assert_eq!(positions, vec![1, 3, 4]);
    }

    #[test]
    fn test_probe_with_no_hits_is_empty() {
        let e0 = toks(&["ab"]);
        let index = InvertedIndex::from_entities([(0, e0.as_slice())]);
        let lists = index.probe(&toks(&["xx", "yy"]));
        assert!(lists.is_empty());
    }
}
