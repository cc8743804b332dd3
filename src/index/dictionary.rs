//! The on-disk term dictionary.
//!
//! Terms are stored as a front-coded stream in lexicographic order,
//! followed by a parallel fixed-width `(doc_frequency, offset)` array. The
//! term stream must be decoded sequentially; the numeric array is
//! positionally aligned with it. The whole file is covered by a CRC32
//! footer — a dictionary that fails the check is rejected outright.

use std::collections::BTreeMap;

use ahash::AHashMap;

use crate::error::{CaselexError, Result};
use crate::index::{DICTIONARY_FILE, DICTIONARY_MAGIC, FORMAT_VERSION};
use crate::storage::{Storage, StructReader, StructWriter};
use crate::util::front_coding::front_code;

/// Dictionary entry for one term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermEntry {
    /// Number of documents containing the term.
    pub doc_frequency: u32,
    /// Byte offset of the term's block in the postings file.
    pub offset: u64,
}

/// The loaded term dictionary.
#[derive(Debug)]
pub struct TermDictionary {
    terms: Vec<String>,
    entries: AHashMap<String, TermEntry>,
}

impl TermDictionary {
    /// Write the dictionary file for a sorted term → entry map.
    pub fn write(storage: &dyn Storage, entries: &BTreeMap<String, TermEntry>) -> Result<()> {
        let mut writer = StructWriter::new(storage.create_output(DICTIONARY_FILE)?);
        writer.write_u32(DICTIONARY_MAGIC)?;
        writer.write_u8(FORMAT_VERSION)?;
        writer.write_varint(entries.len() as u64)?;

        let terms: Vec<String> = entries.keys().cloned().collect();
        for coded in front_code(&terms) {
            writer.write_varint(coded.prefix_len as u64)?;
            writer.write_string(&coded.suffix)?;
        }

        for entry in entries.values() {
            writer.write_u32(entry.doc_frequency)?;
            writer.write_u64(entry.offset)?;
        }

        writer.close()
    }

    /// Load the dictionary, verifying magic, version, and checksum.
    pub fn load(storage: &dyn Storage) -> Result<TermDictionary> {
        let mut reader = StructReader::new(storage.open_input(DICTIONARY_FILE)?)?;

        if reader.read_u32()? != DICTIONARY_MAGIC {
            return Err(CaselexError::corrupt("bad dictionary magic"));
        }
        let version = reader.read_u8()?;
        if version != FORMAT_VERSION {
            return Err(CaselexError::corrupt(format!(
                "unsupported dictionary version {version}"
            )));
        }

        let count = reader.read_varint()? as usize;

        // Front-coding forbids random access: terms decode strictly in
        // order, each from the previous term's prefix.
        let mut terms = Vec::with_capacity(count);
        let mut prev = String::new();
        for _ in 0..count {
            let prefix_len = reader.read_varint()? as usize;
            if prefix_len > prev.len() || !prev.is_char_boundary(prefix_len) {
                return Err(CaselexError::corrupt("invalid front-coding prefix"));
            }
            let suffix = reader.read_string()?;
            let mut term = prev[..prefix_len].to_string();
            term.push_str(&suffix);
            prev = term.clone();
            terms.push(term);
        }

        let mut entries = AHashMap::with_capacity(count);
        for term in &terms {
            let doc_frequency = reader.read_u32()?;
            let offset = reader.read_u64()?;
            entries.insert(
                term.clone(),
                TermEntry {
                    doc_frequency,
                    offset,
                },
            );
        }

        reader.verify_checksum()?;

        Ok(TermDictionary { terms, entries })
    }

    /// Look up a term's entry.
    pub fn get(&self, term: &str) -> Option<&TermEntry> {
        self.entries.get(term)
    }

    /// Document frequency of a term, zero if absent.
    pub fn doc_frequency(&self, term: &str) -> u32 {
        self.get(term).map_or(0, |e| e.doc_frequency)
    }

    /// All terms in lexicographic order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the dictionary is empty.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
