//! K-way merge of spill blocks into the final postings file.
//!
//! Each block file holds terms in ascending order, one record per line. A
//! min-heap keyed by `(term, block)` holds one cursor per block; the
//! smallest term is popped, duplicate terms from other blocks are unioned
//! into it, and the merged postings are written gap+varint encoded at the
//! current postings-file offset. Only one record per block is in memory at
//! any time, so the merge is bounded regardless of collection size.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};
use std::io::{BufRead, BufReader};

use crate::error::{CaselexError, Result};
use crate::index::dictionary::TermEntry;
use crate::index::{FORMAT_VERSION, POSTINGS_FILE, POSTINGS_MAGIC};
use crate::postings::PostingList;
use crate::storage::{Storage, StorageInput, StructWriter};

/// Heap key: orders by term, then by block index for determinism.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct MergeKey {
    term: String,
    block: usize,
}

/// One block file's read cursor.
struct BlockCursor {
    reader: BufReader<Box<dyn StorageInput>>,
    name: String,
}

impl BlockCursor {
    /// Read the next `term \t postings` record, if any.
    fn next_record(&mut self) -> Result<Option<(String, PostingList)>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let trimmed = line.trim_end_matches('\n');
        let (term, payload) = trimmed.split_once('\t').ok_or_else(|| {
            CaselexError::corrupt(format!("malformed record in block {}", self.name))
        })?;
        let postings: Vec<crate::postings::Posting> = serde_json::from_str(payload)
            .map_err(|e| {
                CaselexError::corrupt(format!("bad postings in block {}: {e}", self.name))
            })?;

        Ok(Some((term.to_string(), PostingList::from_sorted(postings))))
    }
}

/// Merge the named block files into the postings file.
///
/// Returns the dictionary entries (term → document frequency and postings
/// offset) in ascending term order.
pub(crate) fn merge_blocks(
    storage: &dyn Storage,
    block_names: &[String],
) -> Result<BTreeMap<String, TermEntry>> {
    let mut writer = StructWriter::new(storage.create_output(POSTINGS_FILE)?);
    writer.write_u32(POSTINGS_MAGIC)?;
    writer.write_u8(FORMAT_VERSION)?;

    let mut cursors = Vec::with_capacity(block_names.len());
    let mut pending: Vec<Option<PostingList>> = Vec::with_capacity(block_names.len());
    let mut heap = BinaryHeap::new();

    for (block, name) in block_names.iter().enumerate() {
        let mut cursor = BlockCursor {
            reader: BufReader::new(storage.open_input(name)?),
            name: name.clone(),
        };
        if let Some((term, postings)) = cursor.next_record()? {
            heap.push(Reverse(MergeKey { term, block }));
            pending.push(Some(postings));
        } else {
            pending.push(None);
        }
        cursors.push(cursor);
    }

    let mut entries = BTreeMap::new();

    while let Some(Reverse(MergeKey { term, block })) = heap.pop() {
        let mut postings = pending[block]
            .take()
            .ok_or_else(|| CaselexError::index("merge cursor out of sync"))?;
        advance(&mut cursors[block], &mut pending[block], block, &mut heap)?;

        // Union every other block's postings for the same term.
        while heap
            .peek()
            .is_some_and(|Reverse(key)| key.term == term)
        {
            let Reverse(MergeKey { block: dup, .. }) = heap.pop().unwrap();
            let dup_postings = pending[dup]
                .take()
                .ok_or_else(|| CaselexError::index("merge cursor out of sync"))?;
            postings = postings.merge(dup_postings);
            advance(&mut cursors[dup], &mut pending[dup], dup, &mut heap)?;
        }

        let offset = writer.position();
        let block_bytes = postings.encode_block();
        writer.write_varint(block_bytes.len() as u64)?;
        writer.write_raw(&block_bytes)?;

        entries.insert(
            term,
            TermEntry {
                doc_frequency: postings.len() as u32,
                offset,
            },
        );
    }

    writer.close()?;
    Ok(entries)
}

fn advance(
    cursor: &mut BlockCursor,
    pending: &mut Option<PostingList>,
    block: usize,
    heap: &mut BinaryHeap<Reverse<MergeKey>>,
) -> Result<()> {
    if let Some((term, postings)) = cursor.next_record()? {
        *pending = Some(postings);
        heap.push(Reverse(MergeKey { term, block }));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::postings::Posting;
    use crate::storage::MemoryStorage;
    use std::io::Write;

    fn write_block(storage: &MemoryStorage, name: &str, records: &[(&str, Vec<u64>)]) {
        let mut output = storage.create_output(name).unwrap();
        for (term, doc_ids) in records {
            let postings: Vec<Posting> =
                doc_ids.iter().map(|&id| Posting::new(id)).collect();
            let json = serde_json::to_string(&postings).unwrap();
            writeln!(output, "{term}\t{json}").unwrap();
        }
    }

    #[test]
    fn test_duplicate_terms_across_blocks_merge_once() {
        let storage = MemoryStorage::new();
        write_block(&storage, "block-000000.txt", &[("case", vec![1, 3])]);
        write_block(&storage, "block-000001.txt", &[("case", vec![2, 3])]);

        let entries = merge_blocks(
            &storage,
            &["block-000000.txt".to_string(), "block-000001.txt".to_string()],
        )
        .unwrap();

        assert_eq!(entries.len(), 1);
        let entry = &entries["case"];
        assert_eq!(entry.doc_frequency, 3);
    }

    #[test]
    fn test_merge_preserves_global_term_order() {
        let storage = MemoryStorage::new();
        write_block(
            &storage,
            "block-000000.txt",
            &[("appeal", vec![1]), ("damages", vec![1])],
        );
        write_block(
            &storage,
            "block-000001.txt",
            &[("breach", vec![2]), ("damages", vec![2]), ("tort", vec![2])],
        );

        let entries = merge_blocks(
            &storage,
            &["block-000000.txt".to_string(), "block-000001.txt".to_string()],
        )
        .unwrap();

        let terms: Vec<&String> = entries.keys().collect();
        assert_eq!(terms, vec!["appeal", "breach", "damages", "tort"]);
        assert_eq!(entries["damages"].doc_frequency, 2);

        // Offsets ascend with term order: blocks were written in one pass.
        let mut last = 0;
        for entry in entries.values() {
            assert!(entry.offset >= last);
            last = entry.offset;
        }
    }

    #[test]
    fn test_merge_of_no_blocks_writes_empty_postings() {
        let storage = MemoryStorage::new();
        let entries = merge_blocks(&storage, &[]).unwrap();

        assert!(entries.is_empty());
        assert!(storage.file_exists(POSTINGS_FILE));
    }
}
