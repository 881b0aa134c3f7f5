//! Window pruning over entity position lists.
//!
//! Each pruner turns an entity's ascending position list `Pe` into a
//! stream of candidate windows. Convention at this boundary: windows are
//! **1-indexed, inclusive on both ends**, indexing into `Pe`. Every
//! emitted window holds at least the entity's minimum overlap count of
//! positions, so a single matched position forms a window exactly when
//! that minimum is 1.
//!
//! All four strategies emit the same windows up to windows that cannot
//! survive verification: bucket-count withholds windows straddling an
//! unbridgeable gap, batch-count withholds windows wider than the
//! similarity's tighter span cap. Counting and candidate enumeration
//! downstream therefore produce the same verified match set whichever
//! strategy is configured.

use crate::core::config::PrunerKind;

use super::bounds::{EntityBounds, Similarity};

/// Generate candidate windows for one entity's position list.
pub fn candidate_windows(
    kind: PrunerKind,
    positions: &[usize],
    bounds: &EntityBounds,
    similarity: &Similarity,
    entity_len: usize,
) -> Vec<(usize, usize)> {
    let min_window = bounds.min_overlap;
    let mut windows = Vec::new();
    match kind {
        PrunerKind::None => {
            all_windows(1, positions.len(), min_window, &mut windows);
        }
        PrunerKind::Lazy => {
            // lazy-count: an entity occurring fewer times than the overlap
            // bound cannot match at all
            if positions.len() >= min_window {
                all_windows(1, positions.len(), min_window, &mut windows);
            }
        }
        PrunerKind::Bucket => {
            if positions.len() >= min_window {
                bucket_windows(positions, bounds, similarity, entity_len, &mut windows);
            }
        }
        PrunerKind::Batch => {
            if positions.len() >= min_window {
                batch_windows(positions, bounds, similarity, entity_len, &mut windows);
            }
        }
    }
    windows
}

/// Emit every window of size >= `min_window` inside `[first, last]`.
fn all_windows(first: usize, last: usize, min_window: usize, out: &mut Vec<(usize, usize)>) {
    if min_window == 0 || last < first {
        return;
    }
    for i in first..=last {
        let j_min = i + min_window - 1;
        for j in j_min..=last {
            out.push((i, j));
        }
    }
}

/// Split the position list at unbridgeable gaps, then enumerate windows
/// inside each bucket that is large enough to matter.
fn bucket_windows(
    positions: &[usize],
    bounds: &EntityBounds,
    similarity: &Similarity,
    entity_len: usize,
    out: &mut Vec<(usize, usize)>,
) {
    // character measures carry a tighter neighbor bound; the token
    // measures fall back to Te - Tl
    let gap_bound = similarity
        .neighbor_gap_bound(entity_len)
        .unwrap_or(bounds.max_len as i64 - bounds.min_overlap as i64);

    for (first, last) in bucket_spans(positions, gap_bound) {
        if last - first + 1 >= bounds.min_overlap {
            all_windows(first, last, bounds.min_overlap, out);
        }
    }
}

/// Partition into maximal runs whose adjacent positions are no farther
/// apart than `gap_bound` tokens (exclusive gap, `Pe[k+1] - Pe[k] - 1`).
/// Returns 1-indexed inclusive bucket extents.
pub(crate) fn bucket_spans(positions: &[usize], gap_bound: i64) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    if positions.is_empty() {
        return spans;
    }
    let mut start = 1;
    for k in 1..positions.len() {
        let gap = positions[k] as i64 - positions[k - 1] as i64 - 1;
        if gap > gap_bound {
            spans.push((start, k));
            start = k + 1;
        }
    }
    spans.push((start, positions.len()));
    spans
}

/// Batch-count sweep: for each feasible start index, binary-search the
/// farthest end whose physical span still fits, emitting every window in
/// between; starts whose minimum window already overshoots are skipped
/// wholesale via a second binary search.
fn batch_windows(
    positions: &[usize],
    bounds: &EntityBounds,
    similarity: &Similarity,
    entity_len: usize,
    out: &mut Vec<(usize, usize)>,
) {
    let n = positions.len();
    let tl = bounds.min_overlap;
    let te = bounds.max_len;

    let mut i = 1;
    while i + tl - 1 <= n {
        let j = i + tl - 1;
        if positions[j - 1] - positions[i - 1] + 1 <= te {
            let mid = binary_span(positions, i, j, te);
            for end in j..=mid {
                let span = (positions[end - 1] - positions[i - 1] + 1) as i64;
                let cap = similarity
                    .window_span_cap(entity_len, end - i + 1)
                    .unwrap_or(te as i64);
                if span <= cap {
                    out.push((i, end));
                }
            }
            i += 1;
        } else {
            match binary_shift(positions, i, j, te, tl) {
                Some(next) => i = next,
                None => break,
            }
        }
    }
}

/// Largest end index `mid >= j` with `Pe[mid] - Pe[i] + 1 <= max_span`.
/// `i` and `j` are 1-indexed. The position list is non-decreasing but not
/// strictly increasing (duplicate entity tokens repeat positions), so the
/// search runs over the full tail rather than an index-arithmetic cap.
fn binary_span(positions: &[usize], i: usize, j: usize, max_span: usize) -> usize {
    let mut lower = j;
    let mut upper = positions.len();
    while lower <= upper {
        let mid = (lower + upper + 1) / 2;
        if positions[mid - 1] - positions[i - 1] + 1 <= max_span {
            lower = mid + 1;
        } else {
            upper = mid - 1;
        }
    }
    upper
}

/// Smallest start index at which a window of `min_window` positions could
/// fit inside `max_span` tokens again, or `None` when no later start can.
///
/// A window starting at `i'` ends at or after `Pe[j]`, so `Pe[i']` must
/// reach back no farther than `Pe[j] - max_span + 1`; the binary search
/// skips every start that provably cannot. Each round strictly advances
/// the start, so the loop terminates.
fn binary_shift(
    positions: &[usize],
    mut i: usize,
    mut j: usize,
    max_span: usize,
    min_window: usize,
) -> Option<usize> {
    loop {
        let reachable = positions[j - 1] as i64 - max_span as i64 + 1;
        let mut lower = i;
        let mut upper = j;
        while lower <= upper {
            let mid = (lower + upper + 1) / 2;
            if (positions[mid - 1] as i64) < reachable {
                lower = mid + 1;
            } else {
                upper = mid - 1;
            }
        }
        i = lower;
        if i + min_window - 1 > positions.len() {
            return None;
        }
        j = i + min_window - 1;
        if positions[j - 1] - positions[i - 1] + 1 <= max_span {
            return Some(i);
        }
    }
}
