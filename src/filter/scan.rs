//! Heap-driven position extraction.
//!
//! A single min-heap over entity indices is seeded with the head of every
//! per-position posting list. Because posting lists are ascending by
//! entity index, repeatedly popping the minimum yields every occurrence of
//! the globally smallest unconsumed entity before any larger one: the pop
//! sequence is non-decreasing, so each entity's full position list passes
//! through as one contiguous run and downstream state (the count array)
//! only ever has to hold one entity at a time.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ahash::AHashMap;

use super::index::DocumentLists;

/// Iterator over `(entity_index, position)` pairs in heap order.
///
/// Positions within one entity's run come out ascending; entity runs come
/// out in ascending entity-index order. Total emissions equal the number
/// of postings across all matched positions.
#[derive(Debug)]
pub struct PositionScan<'a> {
    /// matched position → posting list (ascending positions)
    lists: indexmap::IndexMap<usize, &'a [usize]>,

    /// min-heap holding the current head of each posting list
    heap: BinaryHeap<Reverse<usize>>,

    /// matched position → index of its current head element
    top: AHashMap<usize, usize>,

    /// entity index → its full ascending position list
    positions: AHashMap<usize, Vec<usize>>,

    /// entity currently being drained, with its read cursor
    current: Option<usize>,
    cursor: usize,
}

impl<'a> PositionScan<'a> {
    /// Initialize the scan from a document's inverted lists.
    pub fn new(document: DocumentLists<'a>) -> Self {
        let lists = document.lists;

        let mut heap = BinaryHeap::with_capacity(lists.len());
        let mut top = AHashMap::with_capacity(lists.len());
        let mut positions: AHashMap<usize, Vec<usize>> = AHashMap::new();

        for (&position, &list) in &lists {
            if let Some(&head) = list.first() {
                heap.push(Reverse(head));
            }
            top.insert(position, 0);
            for &entity in list {
                positions.entry(entity).or_default().push(position);
            }
        }

        Self {
            lists,
            heap,
            top,
            positions,
            current: None,
            cursor: 0,
        }
    }

    /// The precomputed ascending position list of an entity, when it
    /// occurs in this document at all.
    pub fn entity_positions(&self, entity: usize) -> Option<&[usize]> {
        self.positions.get(&entity).map(Vec::as_slice)
    }
}

impl<'a> Iterator for PositionScan<'a> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let Reverse(entity) = self.heap.pop()?;

        // pop sequence is non-decreasing; a new entity restarts the cursor
        debug_assert!(self.current.map_or(true, |c| entity >= c));
        if self.current != Some(entity) {
            self.current = Some(entity);
            self.cursor = 0;
        }

        let position = self.positions[&entity][self.cursor];
        self.cursor += 1;

        // advance this position's head and re-arm the heap from it
        let head = self
            .top
            .get_mut(&position)
            .expect("scanned position has a head pointer");
        *head += 1;
        let list = self.lists[&position];
        if *head < list.len() {
            self.heap.push(Reverse(list[*head]));
        }

        Some((entity, position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn scan_of(lists: &[(usize, &'static [usize])]) -> PositionScan<'static> {
        let mut map = IndexMap::new();
        for &(pos, list) in lists {
            map.insert(pos, list);
        }
        PositionScan::new(DocumentLists::from_parts(map))
    }

    #[test]
    fn test_pop_sequence_groups_entities() {
        // the running example: entity 1 at positions 3,8,13,18,19 and
        // entity 4 at positions 0,1,2,3,8,13,18
        let scan = scan_of(&[
            (0, &[4]),
            (1, &[4]),
            (2, &[4]),
            (3, &[1, 4]),
            (8, &[1, 4]),
            (13, &[1, 4]),
            (18, &[1, 4]),
            (19, &[1]),
        ]);

        let pairs: Vec<(usize, usize)> = scan.collect();
        assert_eq!(
            pairs,
            vec![
                (1, 3),
                (1, 8),
                (1, 13),
                (1, 18),
                (1, 19),
                (4, 0),
                (4, 1),
                (4, 2),
                (4, 3),
                (4, 8),
                (4, 13),
                (4, 18),
            ]
        );
    }

    #[test]
    fn test_emission_count_matches_postings() {
        let scan = scan_of(&[(0, &[0, 2]), (5, &[1]), (7, &[0, 1, 2])]);
        assert_eq!(scan.count(), 6);
    }

    #[test]
    fn test_pop_sequence_is_non_decreasing() {
        let scan = scan_of(&[(0, &[0, 1, 3]), (1, &[1, 2]), (2, &[0, 3]), (9, &[2, 3])]);
        let entities: Vec<usize> = scan.map(|(e, _)| e).collect();
        let mut sorted = entities.clone();
        sorted.sort_unstable();
        assert_eq!(entities, sorted);
    }

    #[test]
    fn test_positions_ascend_within_entity() {
        let scan = scan_of(&[(2, &[0]), (4, &[0, 1]), (9, &[0]), (11, &[1])]);
        assert_eq!(scan.entity_positions(0), Some(&[2, 4, 9][..]));

        let scan = scan_of(&[(2, &[0]), (4, &[0, 1]), (9, &[0]), (11, &[1])]);
        let pairs: Vec<(usize, usize)> = scan.collect();
        assert_eq!(pairs, vec![(0, 2), (0, 4), (0, 9), (1, 4), (1, 11)]);
    }

    #[test]
    fn test_empty_document_never_pops() {
        let mut scan = scan_of(&[]);
        assert_eq!(scan.next(), None);
    }

    #[test]
    fn test_duplicate_postings_repeat_positions() {
        // entity 0 holds the same token twice; position 5 posts it twice
        let scan = scan_of(&[(5, &[0, 0])]);
        let pairs: Vec<(usize, usize)> = scan.collect();
        assert_eq!(pairs, vec![(0, 5), (0, 5)]);
    }
}
