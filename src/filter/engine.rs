//! The Faerie filter engine.
//!
//! Construction precomputes every entity's bounds, drops unmatchable
//! entities from the index, and builds the inverted index. A scan over one
//! document is a pull iterator: the heap traversal surfaces one entity's
//! position list at a time, the configured pruner proposes windows, the
//! count array tallies position coverage, and candidates that reach the
//! per-candidate overlap threshold are emitted as token-span matches.
//!
//! Matches for lower-indexed entities are emitted before higher-indexed
//! ones; within one entity, matches follow window emission order.

use std::collections::{BTreeSet, VecDeque};

use smallvec::{smallvec, SmallVec};
use tracing::{debug, info};

use crate::core::config::PrunerKind;
use crate::core::dictionary::EntityDictionary;

use super::bounds::{EntityBounds, Similarity};
use super::counts::CountTable;
use super::index::InvertedIndex;
use super::pruning;
use super::scan::PositionScan;

/// A filtered match: a token span of the document that may approximately
/// match the entity, pending verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FilterMatch {
    /// Dense index of the matched entity
    pub entity: usize,

    /// First token position of the span (inclusive)
    pub start: usize,

    /// Last token position of the span (inclusive)
    pub end: usize,
}

/// Filter engine: entity store, bounds, and inverted index, immutable
/// after construction and shareable across documents.
#[derive(Debug)]
pub struct FaerieFilter {
    dictionary: EntityDictionary,
    similarity: Similarity,
    pruner: PrunerKind,
    bounds: Vec<Option<EntityBounds>>,
    index: InvertedIndex,
}

impl FaerieFilter {
    /// Build the filter over a dictionary. Entities whose bounds go
    /// negative (or that tokenized to nothing) are dropped from the index;
    /// their dense indices stay reserved so ids remain stable.
    pub fn new(dictionary: EntityDictionary, similarity: Similarity, pruner: PrunerKind) -> Self {
        let mut bounds = Vec::with_capacity(dictionary.len());
        let mut dropped = 0usize;
        for (_, entity) in dictionary.iter() {
            let entity_bounds = EntityBounds::compute(&similarity, entity.len());
            if entity_bounds.is_none() {
                dropped += 1;
                info!(
                    entity = %entity.id,
                    "entity cannot satisfy the similarity bounds; dropping from index"
                );
            }
            bounds.push(entity_bounds);
        }

        let index = InvertedIndex::from_entities(
            dictionary
                .iter()
                .filter(|(i, _)| bounds[*i].is_some())
                .map(|(i, e)| (i, e.tokens.as_slice())),
        );

        if let (Some(min_len), Some(max_len)) = (
            bounds.iter().flatten().map(|b| b.min_len).min(),
            bounds.iter().flatten().map(|b| b.max_len).max(),
        ) {
            info!(
                entities = dictionary.len() - dropped,
                dropped, min_len, max_len, "filter ready"
            );
        }

        Self {
            dictionary,
            similarity,
            pruner,
            bounds,
            index,
        }
    }

    /// The entity store backing this filter.
    pub fn dictionary(&self) -> &EntityDictionary {
        &self.dictionary
    }

    /// The similarity variant selected at construction.
    pub fn similarity(&self) -> &Similarity {
        &self.similarity
    }

    /// Bounds of one entity, `None` when it was dropped at construction.
    pub fn entity_bounds(&self, index: usize) -> Option<&EntityBounds> {
        self.bounds.get(index).and_then(Option::as_ref)
    }

    /// Scan one document's token sequence. The returned iterator owns all
    /// per-document state, so concurrent scans may share `self`.
    pub fn scan<'a>(&'a self, doc_tokens: &'a [String]) -> MatchScan<'a> {
        let lists = self.index.probe(doc_tokens);
        if lists.is_empty() {
            debug!("no document token matches any entity token");
        }
        MatchScan {
            filter: self,
            scan: PositionScan::new(lists),
            counts: CountTable::new(),
            pending: VecDeque::new(),
            lookahead: None,
            doc_len: doc_tokens.len(),
        }
    }
}

/// Pull iterator over one document's filtered matches.
#[derive(Debug)]
pub struct MatchScan<'a> {
    filter: &'a FaerieFilter,
    scan: PositionScan<'a>,
    counts: CountTable,
    pending: VecDeque<FilterMatch>,
    lookahead: Option<(usize, usize)>,
    doc_len: usize,
}

impl<'a> Iterator for MatchScan<'a> {
    type Item = FilterMatch;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(found) = self.pending.pop_front() {
                return Some(found);
            }

            // pull the next entity's full position run off the heap
            let (entity, first) = self.lookahead.take().or_else(|| self.scan.next())?;
            let mut positions: SmallVec<[usize; 16]> = smallvec![first];
            loop {
                match self.scan.next() {
                    Some((e, p)) if e == entity => positions.push(p),
                    other => {
                        self.lookahead = other;
                        break;
                    }
                }
            }

            self.process_entity(entity, &positions);
        }
    }
}

impl<'a> MatchScan<'a> {
    /// Run pruning, counting, and candidate enumeration for one entity.
    fn process_entity(&mut self, entity: usize, positions: &[usize]) {
        // entities dropped at construction never enter the index
        let Some(bounds) = self.filter.bounds[entity] else {
            debug_assert!(false, "dropped entity surfaced by the heap");
            return;
        };
        let entity_len = match self.filter.dictionary.get(entity) {
            Some(e) => e.len(),
            None => return,
        };

        debug!(
            entity,
            entity_len,
            occurrences = positions.len(),
            min_len = bounds.min_len,
            max_len = bounds.max_len,
            min_overlap = bounds.min_overlap,
            "analyzing entity"
        );

        let windows = pruning::candidate_windows(
            self.filter.pruner,
            positions,
            &bounds,
            &self.filter.similarity,
            entity_len,
        );

        let le = bounds.min_len as i64;
        let te = bounds.max_len as i64;

        let mut count_positions: BTreeSet<usize> = BTreeSet::new();
        let mut candidates: Vec<(usize, usize)> = Vec::new();

        for &(i, j) in &windows {
            count_positions.extend(positions[i - 1..j].iter().copied());

            let pi = positions[i - 1] as i64;
            let pj = positions[j - 1] as i64;
            let prev_end = if i > 1 {
                positions[i - 2] as i64
            } else {
                i64::MIN + 1
            };
            let next_start = if j < positions.len() {
                positions[j] as i64
            } else {
                i64::MAX
            };

            // candidate substrings must start at or before pi, end at or
            // after pj, and stay strictly between the neighboring matched
            // positions and inside the document
            let lo = 0.max((pj - te + 1).max(prev_end + 1));
            let up = (pi + te - 1)
                .min(next_start - 1)
                .min(self.doc_len as i64 - 1);

            // token similarities tighten the admissible candidate length
            let len_cap = self
                .filter
                .similarity
                .window_span_cap(entity_len, j - i + 1)
                .unwrap_or(te);

            for start in lo..=pi {
                for end in pj..=up {
                    let len = end - start + 1;
                    if len >= le && len <= len_cap {
                        candidates.push((start as usize, len as usize));
                    }
                }
            }
        }

        // counts must be complete before any candidate is tested
        for &position in &count_positions {
            self.counts
                .add_position(position, bounds.min_len, bounds.max_len);
        }

        for (start, len) in candidates {
            let threshold = self.filter.similarity.overlap_threshold(entity_len, len);
            if i64::from(self.counts.get(start, len)) >= threshold {
                self.pending.push_back(FilterMatch {
                    entity,
                    start,
                    end: start + len - 1,
                });
            }
        }

        self.counts.clear();
    }
}
