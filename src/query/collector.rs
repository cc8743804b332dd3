//! Bounded top-K collection.
//!
//! A min-heap of size K keeps the best documents seen so far: push while
//! under capacity, thereafter replace the root when a better document
//! arrives. Ranking order is descending score with ties broken by ascending
//! doc id, so the ordering makes the lower doc id the "better" document
//! when scores coincide.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// A scored document.
#[derive(Debug, Clone, Copy)]
pub struct ScoredDoc {
    /// Document id.
    pub doc_id: u64,
    /// Fused relevance score.
    pub score: f32,
}

impl PartialEq for ScoredDoc {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScoredDoc {}

impl PartialOrd for ScoredDoc {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredDoc {
    fn cmp(&self, other: &Self) -> Ordering {
        // Higher score ranks higher; on equal scores the smaller doc id
        // ranks higher.
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.doc_id.cmp(&self.doc_id))
    }
}

/// Collects the top K documents by score.
#[derive(Debug)]
pub struct TopKCollector {
    heap: BinaryHeap<Reverse<ScoredDoc>>,
    capacity: usize,
}

impl TopKCollector {
    /// Create a collector keeping at most `capacity` documents.
    pub fn new(capacity: usize) -> Self {
        TopKCollector {
            heap: BinaryHeap::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Offer a document to the collector.
    pub fn collect(&mut self, doc_id: u64, score: f32) {
        if self.capacity == 0 {
            return;
        }
        let candidate = ScoredDoc { doc_id, score };
        if self.heap.len() < self.capacity {
            self.heap.push(Reverse(candidate));
        } else if self
            .heap
            .peek()
            .is_some_and(|Reverse(worst)| candidate > *worst)
        {
            self.heap.pop();
            self.heap.push(Reverse(candidate));
        }
    }

    /// Extract the collected documents, best first.
    pub fn into_ranked(self) -> Vec<ScoredDoc> {
        let mut docs: Vec<ScoredDoc> = self.heap.into_iter().map(|Reverse(doc)| doc).collect();
        docs.sort_by(|a, b| b.cmp(a));
        docs
    }
}
