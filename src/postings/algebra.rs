//! Set algebra over sorted doc-id lists.
//!
//! Intersection exploits skip pointers to leap over runs of non-matching
//! ids; union and difference are plain sorted merges. Skip pointers are a
//! performance optimization only and never change results.

use crate::postings::skiplist::DocIdList;

/// Intersect two sorted lists, using skip pointers to advance past runs of
/// ids smaller than the other list's current id.
pub fn intersect(a: &DocIdList, b: &DocIdList) -> DocIdList {
    let mut result = Vec::new();
    let (mut i, mut j) = (0usize, 0usize);

    while i < a.len() && j < b.len() {
        let (ai, bj) = (a.get(i), b.get(j));
        if ai < bj {
            i = advance(a, i, bj);
        } else if ai > bj {
            j = advance(b, j, ai);
        } else {
            result.push(ai);
            i += 1;
            j += 1;
        }
    }

    DocIdList::from_sorted(result)
}

/// Advance `index` in `list` towards `bound`: follow the skip chain while
/// the skip target's id does not exceed `bound`, otherwise single-step.
fn advance(list: &DocIdList, index: usize, bound: u64) -> usize {
    match list.skip_target(index) {
        Some(target) if list.get(target) <= bound => {
            let mut current = target;
            while let Some(next) = list.skip_target(current) {
                if list.get(next) <= bound {
                    current = next;
                } else {
                    break;
                }
            }
            current
        }
        _ => index + 1,
    }
}

/// Union two sorted lists, emitting each id once. Once either list is
/// exhausted the remainder of the other is appended wholesale.
pub fn union(a: &DocIdList, b: &DocIdList) -> DocIdList {
    let mut result = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0usize, 0usize);

    while i < a.len() && j < b.len() {
        let (ai, bj) = (a.get(i), b.get(j));
        if ai < bj {
            result.push(ai);
            i += 1;
        } else if ai > bj {
            result.push(bj);
            j += 1;
        } else {
            result.push(ai);
            i += 1;
            j += 1;
        }
    }

    result.extend_from_slice(&a.ids()[i..]);
    result.extend_from_slice(&b.ids()[j..]);

    DocIdList::from_sorted(result)
}

/// The ids of `a` that are not in `b` (materializes `a AND NOT b`).
pub fn difference(a: &DocIdList, b: &DocIdList) -> DocIdList {
    let mut result = Vec::new();
    let (mut i, mut j) = (0usize, 0usize);

    while i < a.len() {
        let ai = a.get(i);
        while j < b.len() && b.get(j) < ai {
            j += 1;
        }
        if j >= b.len() || b.get(j) != ai {
            result.push(ai);
        }
        i += 1;
    }

    DocIdList::from_sorted(result)
}

/// All ids of the universe not present in `a`.
pub fn complement(a: &DocIdList, universe: &DocIdList) -> DocIdList {
    if a.is_empty() {
        return universe.clone();
    }
    difference(universe, a)
}

/// Positions in `b` whose immediate predecessor position is in `a`: the
/// adjacency step of phrase matching. Position lists are short, so a plain
/// dual-pointer merge suffices.
pub fn intersect_consecutive(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut result = Vec::new();
    let mut i = 0usize;

    for &pos in b {
        let Some(wanted) = pos.checked_sub(1) else {
            continue;
        };
        while i < a.len() && a[i] < wanted {
            i += 1;
        }
        if i < a.len() && a[i] == wanted {
            result.push(pos);
        }
    }

    result
}
