//! Gap (delta) encoding for sorted integer sequences.
//!
//! Replacing absolute values with successive differences shrinks the
//! magnitude of each value before byte-level compression, so doc-id and
//! position lists compress well under variable-byte encoding.

/// Encode a non-decreasing sequence as gaps.
///
/// The first element is kept absolute; every subsequent element is replaced
/// by its difference from the previous one. Zero gaps are legal (duplicates
/// collapse to gap 0), though lists are expected deduplicated upstream.
pub fn gap_encode(values: &[u64]) -> Vec<u64> {
    let mut gaps = Vec::with_capacity(values.len());
    let mut prev = 0u64;
    for (i, &value) in values.iter().enumerate() {
        debug_assert!(i == 0 || value >= prev, "input must be non-decreasing");
        if i == 0 {
            gaps.push(value);
        } else {
            gaps.push(value - prev);
        }
        prev = value;
    }
    gaps
}

/// Decode a gap sequence back into absolute values via prefix sum.
pub fn gap_decode(gaps: &[u64]) -> Vec<u64> {
    let mut values = Vec::with_capacity(gaps.len());
    let mut acc = 0u64;
    for (i, &gap) in gaps.iter().enumerate() {
        if i == 0 {
            acc = gap;
        } else {
            acc += gap;
        }
        values.push(acc);
    }
    values
}
