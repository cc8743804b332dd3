//! Index construction and access.
//!
//! A build produces three files: a front-coded term dictionary, an
//! offset-addressed postings file, and a JSON metadata file (document count
//! and the citation side table). Construction is memory-bounded: postings
//! accumulate in memory until a configured budget is hit, spill to sorted
//! block files, and are k-way merged into the final index.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub mod accumulator;
pub mod dictionary;
pub mod merge;
pub mod reader;
pub mod writer;

pub use accumulator::DocumentAccumulator;
pub use dictionary::{TermDictionary, TermEntry};
pub use reader::IndexReader;
pub use writer::IndexWriter;

/// File name of the term dictionary.
pub const DICTIONARY_FILE: &str = "dictionary.bin";

/// File name of the postings file.
pub const POSTINGS_FILE: &str = "postings.bin";

/// File name of the index metadata.
pub const META_FILE: &str = "meta.json";

pub(crate) const DICTIONARY_MAGIC: u32 = u32::from_le_bytes(*b"CXDI");
pub(crate) const POSTINGS_MAGIC: u32 = u32::from_le_bytes(*b"CXPO");
pub(crate) const FORMAT_VERSION: u8 = 1;

/// Name of the n-th spill block. Zero-padded so directory listings sort in
/// creation order.
pub(crate) fn block_file_name(n: usize) -> String {
    format!("block-{n:06}.txt")
}

/// Configuration for index construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Estimated in-memory postings size (bytes) at which the builder
    /// spills a sorted block to disk.
    pub memory_limit: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig {
            // 64 MiB of accumulated postings per spill block.
            memory_limit: 64 * 1024 * 1024,
        }
    }
}

/// Index-wide metadata persisted alongside the dictionary and postings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexMeta {
    /// Total number of documents indexed.
    pub doc_count: u64,

    /// Citation string to document id side table.
    #[serde(default)]
    pub citations: BTreeMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_names_sort_in_creation_order() {
        let names: Vec<String> = (0..12).map(block_file_name).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_meta_json_round_trip() {
        let mut meta = IndexMeta {
            doc_count: 3,
            citations: BTreeMap::new(),
        };
        meta.citations.insert("[1998] SGCA 12".to_string(), 42);

        let json = serde_json::to_string(&meta).unwrap();
        let back: IndexMeta = serde_json::from_str(&json).unwrap();
        assert_eq!(back.doc_count, 3);
        assert_eq!(back.citations.get("[1998] SGCA 12"), Some(&42));
    }
}
