//! Read-only access to a built index.
//!
//! The reader loads the dictionary and metadata up front and keeps one
//! shared handle into the postings file, seeking on demand per term. The
//! handle is guarded by a mutex so concurrent queries never interleave
//! seek/read pairs; everything else is immutable after open.

use std::io::{Read, Seek, SeekFrom};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::error::{CaselexError, Result};
use crate::index::dictionary::{TermDictionary, TermEntry};
use crate::index::{FORMAT_VERSION, IndexMeta, META_FILE, POSTINGS_FILE, POSTINGS_MAGIC};
use crate::postings::{DocIdList, PostingList};
use crate::storage::{Storage, StorageInput};
use crate::util::varint::read_vb;

/// A read-only view of an index built by [`crate::index::IndexWriter`].
#[derive(Debug)]
pub struct IndexReader {
    dictionary: TermDictionary,
    postings_input: Mutex<Box<dyn StorageInput>>,
    meta: IndexMeta,
    universe: RwLock<Option<Arc<DocIdList>>>,
}

impl IndexReader {
    /// Open an index from storage, verifying file headers and the
    /// dictionary checksum.
    pub fn open(storage: &dyn Storage) -> Result<Self> {
        let dictionary = TermDictionary::load(storage)?;

        let mut postings_input = storage.open_input(POSTINGS_FILE)?;
        let mut header = [0u8; 5];
        postings_input.read_exact(&mut header)?;
        let magic = u32::from_le_bytes(header[..4].try_into().unwrap());
        if magic != POSTINGS_MAGIC {
            return Err(CaselexError::corrupt("bad postings magic"));
        }
        if header[4] != FORMAT_VERSION {
            return Err(CaselexError::corrupt(format!(
                "unsupported postings version {}",
                header[4]
            )));
        }

        let meta: IndexMeta = serde_json::from_reader(storage.open_input(META_FILE)?)?;

        Ok(IndexReader {
            dictionary,
            postings_input: Mutex::new(postings_input),
            meta,
            universe: RwLock::new(None),
        })
    }

    /// Total number of documents in the collection.
    pub fn doc_count(&self) -> u64 {
        self.meta.doc_count
    }

    /// Number of distinct terms.
    pub fn term_count(&self) -> usize {
        self.dictionary.len()
    }

    /// Dictionary entry for a term.
    pub fn term_entry(&self, term: &str) -> Option<&TermEntry> {
        self.dictionary.get(term)
    }

    /// Document frequency of a term, zero if absent.
    pub fn doc_frequency(&self, term: &str) -> u32 {
        self.dictionary.doc_frequency(term)
    }

    /// All terms in lexicographic order.
    pub fn terms(&self) -> &[String] {
        self.dictionary.terms()
    }

    /// Resolve a citation to its document id via the side table.
    pub fn citation_doc(&self, citation: &str) -> Option<u64> {
        self.meta.citations.get(citation).copied()
    }

    /// Read and decode a term's postings block.
    ///
    /// Returns `None` for terms absent from the dictionary; absence is not
    /// an error.
    pub fn read_postings(&self, term: &str) -> Result<Option<PostingList>> {
        let Some(entry) = self.dictionary.get(term) else {
            return Ok(None);
        };

        let block_bytes = {
            let mut input = self.postings_input.lock();
            input.seek(SeekFrom::Start(entry.offset))?;
            let length = read_vb(&mut *input)? as usize;
            let mut bytes = vec![0u8; length];
            input.read_exact(&mut bytes).map_err(|_| {
                CaselexError::corrupt(format!("truncated postings block for term {term:?}"))
            })?;
            bytes
        };

        let postings = PostingList::decode_block(&block_bytes)?;
        if postings.len() as u32 != entry.doc_frequency {
            return Err(CaselexError::corrupt(format!(
                "postings length {} does not match document frequency {} for term {term:?}",
                postings.len(),
                entry.doc_frequency
            )));
        }

        Ok(Some(postings))
    }

    /// The set of all document ids ever indexed.
    ///
    /// Computed lazily by unioning every term's doc ids — linear in index
    /// size, so the result is cached for the lifetime of this reader.
    pub fn universe(&self) -> Result<Arc<DocIdList>> {
        if let Some(universe) = self.universe.read().as_ref() {
            return Ok(Arc::clone(universe));
        }

        let mut ids: Vec<u64> = Vec::new();
        for term in self.dictionary.terms() {
            if let Some(postings) = self.read_postings(term)? {
                ids.extend(postings.iter().map(|p| p.doc_id));
            }
        }
        ids.sort_unstable();
        ids.dedup();

        let universe = Arc::new(DocIdList::from_sorted(ids));
        *self.universe.write() = Some(Arc::clone(&universe));
        Ok(universe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentTokens;
    use crate::index::{IndexConfig, IndexWriter};
    use crate::storage::MemoryStorage;

    fn build_sample() -> Arc<MemoryStorage> {
        let storage = Arc::new(MemoryStorage::new());
        let mut writer = IndexWriter::new(storage.clone(), IndexConfig::default());

        for (doc_id, content) in [
            (1u64, vec!["apple", "banana"]),
            (4, vec!["apple", "banana", "cherry"]),
        ] {
            writer
                .add_document(&DocumentTokens {
                    doc_id,
                    content: content.into_iter().map(String::from).collect(),
                    ..Default::default()
                })
                .unwrap();
        }
        writer.commit().unwrap();
        storage
    }

    #[test]
    fn test_unknown_term_is_none() {
        let storage = build_sample();
        let reader = IndexReader::open(storage.as_ref()).unwrap();

        assert!(reader.read_postings("durian").unwrap().is_none());
        assert_eq!(reader.doc_frequency("durian"), 0);
    }

    #[test]
    fn test_universe_is_cached() {
        let storage = build_sample();
        let reader = IndexReader::open(storage.as_ref()).unwrap();

        let first = reader.universe().unwrap();
        assert_eq!(first.ids(), &[1, 4]);

        let second = reader.universe().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_corrupt_postings_magic_rejected() {
        let storage = build_sample();

        let mut bytes = storage.get_raw(crate::index::POSTINGS_FILE).unwrap();
        bytes[0] ^= 0xFF;
        storage.put_raw(crate::index::POSTINGS_FILE, bytes);

        assert!(matches!(
            IndexReader::open(storage.as_ref()),
            Err(CaselexError::CorruptIndex(_))
        ));
    }

    #[test]
    fn test_truncated_postings_block_rejected() {
        let storage = build_sample();
        let reader = IndexReader::open(storage.as_ref()).unwrap();
        let offset = reader.term_entry("apple").unwrap().offset;
        drop(reader);

        let mut bytes = storage.get_raw(crate::index::POSTINGS_FILE).unwrap();
        // Chop the file off in the middle of apple's block.
        bytes.truncate(offset as usize + 2);
        storage.put_raw(crate::index::POSTINGS_FILE, bytes);

        let reader = IndexReader::open(storage.as_ref()).unwrap();
        assert!(reader.read_postings("apple").is_err());
    }
}
