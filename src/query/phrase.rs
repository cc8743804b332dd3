//! Phrase matching via positional intersection.
//!
//! A phrase matches a document when every term appears and each term's
//! occurrence immediately follows the previous term's. Adjacency is chained
//! pairwise across the phrase with
//! [`intersect_consecutive`](crate::postings::algebra::intersect_consecutive);
//! a surviving document is one whose final term still has at least one
//! qualifying position.

use ahash::AHashMap;

use crate::error::Result;
use crate::index::IndexReader;
use crate::postings::algebra::intersect_consecutive;
use crate::postings::DocIdList;

/// Evaluate a phrase to the sorted doc ids that contain it.
///
/// Any member term with zero document frequency collapses the whole phrase
/// to the empty result.
pub fn evaluate_phrase(reader: &IndexReader, terms: &[String]) -> Result<DocIdList> {
    let Some(first) = terms.first() else {
        return Ok(DocIdList::empty());
    };

    let Some(postings) = reader.read_postings(first)? else {
        return Ok(DocIdList::empty());
    };

    // doc → positions where the phrase-so-far ends.
    let mut alive: AHashMap<u64, Vec<u32>> = postings
        .iter()
        .filter(|p| !p.positions.is_empty())
        .map(|p| (p.doc_id, p.positions.clone()))
        .collect();

    for term in &terms[1..] {
        if alive.is_empty() {
            return Ok(DocIdList::empty());
        }
        let Some(postings) = reader.read_postings(term)? else {
            return Ok(DocIdList::empty());
        };

        let mut next: AHashMap<u64, Vec<u32>> = AHashMap::with_capacity(alive.len());
        for posting in postings.iter() {
            if let Some(prev_positions) = alive.get(&posting.doc_id) {
                let adjacent = intersect_consecutive(prev_positions, &posting.positions);
                if !adjacent.is_empty() {
                    next.insert(posting.doc_id, adjacent);
                }
            }
        }
        alive = next;
    }

    let mut doc_ids: Vec<u64> = alive.into_keys().collect();
    doc_ids.sort_unstable();
    Ok(DocIdList::from_sorted(doc_ids))
}
