//! Memory-bounded index construction (single-pass in-memory indexing with
//! block spilling).
//!
//! Documents are folded one at a time through a [`DocumentAccumulator`];
//! finished postings collect in a sorted in-memory map. When the map's
//! estimated size crosses the configured budget it is flushed to a numbered
//! block file, and the k-way merge stitches all blocks into the final
//! dictionary and postings files on commit. Peak memory is therefore
//! independent of collection size.

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;

use log::{debug, warn};

use crate::document::DocumentTokens;
use crate::error::{CaselexError, Result};
use crate::index::accumulator::DocumentAccumulator;
use crate::index::dictionary::TermDictionary;
use crate::index::{block_file_name, merge, IndexConfig, IndexMeta, META_FILE};
use crate::postings::Posting;
use crate::schema::Zone;
use crate::storage::{Storage, StorageOutput};

/// Rough per-posting heap cost used for the spill estimate.
const POSTING_OVERHEAD: usize = 48;

/// Builds an index from pre-tokenized documents.
pub struct IndexWriter {
    storage: Arc<dyn Storage>,
    config: IndexConfig,
    accumulator: DocumentAccumulator,
    postings: BTreeMap<String, Vec<Posting>>,
    estimated_bytes: usize,
    block_names: Vec<String>,
    doc_count: u64,
    citations: BTreeMap<String, u64>,
}

impl IndexWriter {
    /// Create a writer that will build an index in the given storage.
    pub fn new(storage: Arc<dyn Storage>, config: IndexConfig) -> Self {
        IndexWriter {
            storage,
            config,
            accumulator: DocumentAccumulator::new(),
            postings: BTreeMap::new(),
            estimated_bytes: 0,
            block_names: Vec::new(),
            doc_count: 0,
            citations: BTreeMap::new(),
        }
    }

    /// Add one document's token streams to the index.
    ///
    /// A record with no indexable tokens is skipped with a warning; the
    /// build continues.
    pub fn add_document(&mut self, doc: &DocumentTokens) -> Result<()> {
        if doc.is_empty() {
            let err = CaselexError::malformed(format!(
                "document {} has no indexable tokens",
                doc.doc_id
            ));
            warn!("{err}, skipping");
            return Ok(());
        }

        for (position, term) in doc.content.iter().enumerate() {
            self.accumulator.add_content(term, position as u32);
        }
        for term in &doc.title {
            self.accumulator.add_title(term);
        }
        if let Some(year) = &doc.year {
            self.accumulator.add_zone_token(year, Zone::Year);
        }
        if let Some(date) = &doc.date {
            self.accumulator.add_zone_token(date, Zone::Date);
        }
        if let Some(court) = &doc.court {
            self.accumulator.add_zone_token(court, Zone::Court);
        }
        for citation in &doc.citations {
            self.accumulator.add_zone_token(citation, Zone::Citation);
            self.citations.insert(citation.clone(), doc.doc_id);
        }

        for (term, posting) in self.accumulator.finish(doc.doc_id, doc.court_id) {
            self.estimated_bytes +=
                term.len() + POSTING_OVERHEAD + posting.positions.len() * 4;
            self.postings.entry(term).or_default().push(posting);
        }

        self.doc_count += 1;

        if self.estimated_bytes >= self.config.memory_limit {
            self.spill_block()?;
        }

        Ok(())
    }

    /// Number of documents added so far.
    pub fn doc_count(&self) -> u64 {
        self.doc_count
    }

    /// Flush the in-memory postings map to the next numbered block file.
    fn spill_block(&mut self) -> Result<()> {
        let name = block_file_name(self.block_names.len());
        debug!(
            "spilling {} terms (~{} bytes) to {name}",
            self.postings.len(),
            self.estimated_bytes
        );

        let mut output = self.storage.create_output(&name)?;
        for (term, mut postings) in std::mem::take(&mut self.postings) {
            postings.sort_by_key(|p| p.doc_id);
            let json = serde_json::to_string(&postings)?;
            writeln!(output, "{term}\t{json}")?;
        }
        output.flush_and_sync()?;

        self.block_names.push(name);
        self.estimated_bytes = 0;
        Ok(())
    }

    /// Finish the build: spill the remainder, merge all blocks, and write
    /// the dictionary, postings, and metadata files.
    pub fn commit(mut self) -> Result<()> {
        if !self.postings.is_empty() {
            self.spill_block()?;
        }

        let entries = merge::merge_blocks(self.storage.as_ref(), &self.block_names)?;
        TermDictionary::write(self.storage.as_ref(), &entries)?;

        let meta = IndexMeta {
            doc_count: self.doc_count,
            citations: std::mem::take(&mut self.citations),
        };
        let mut output = self.storage.create_output(META_FILE)?;
        serde_json::to_writer(&mut output, &meta)?;
        output.flush_and_sync()?;

        for name in &self.block_names {
            self.storage.delete_file(name)?;
        }

        debug!(
            "committed index: {} documents, {} terms",
            meta.doc_count,
            entries.len()
        );
        Ok(())
    }
}
