//! Posting records and per-term posting lists.
//!
//! A posting carries everything the evaluator needs about one (term,
//! document) pair: zone membership, per-zone vector weights, the document's
//! court, and content positions for phrase matching. On disk a term's
//! postings are a single block: doc ids and positions are gap-encoded and
//! variable-byte compressed, weights stored as little-endian f32.

use serde::{Deserialize, Serialize};

use crate::error::{CaselexError, Result};
use crate::schema::ZoneMask;
use crate::util::varint::vb_encode_into;

/// A single posting in a term's posting list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    /// Document ID.
    pub doc_id: u64,
    /// Zones of the document this term appears in.
    pub zones: ZoneMask,
    /// L2-normalized log-tf weight over the content zone.
    pub weight_content: f32,
    /// L2-normalized log-tf weight over the title zone.
    pub weight_title: f32,
    /// Court of the document, when known.
    pub court_id: Option<u16>,
    /// Content-zone positions, ascending (empty outside the content zone).
    pub positions: Vec<u32>,
}

impl Posting {
    /// Create a posting with no weights or positions.
    pub fn new(doc_id: u64) -> Self {
        Posting {
            doc_id,
            zones: ZoneMask::empty(),
            weight_content: 0.0,
            weight_title: 0.0,
            court_id: None,
            positions: Vec::new(),
        }
    }

    /// Merge another posting for the same document into this one.
    ///
    /// Used by the k-way block merge when a document's data for one term is
    /// split across spill blocks.
    fn absorb(&mut self, other: Posting) {
        debug_assert_eq!(self.doc_id, other.doc_id);
        self.zones = self.zones.union(other.zones);
        if self.weight_content == 0.0 {
            self.weight_content = other.weight_content;
        }
        if self.weight_title == 0.0 {
            self.weight_title = other.weight_title;
        }
        if self.court_id.is_none() {
            self.court_id = other.court_id;
        }
        if !other.positions.is_empty() {
            self.positions.extend(other.positions);
            self.positions.sort_unstable();
            self.positions.dedup();
        }
    }
}

/// A term's postings, sorted ascending by document id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostingList {
    postings: Vec<Posting>,
}

impl PostingList {
    /// Create an empty posting list.
    pub fn new() -> Self {
        PostingList::default()
    }

    /// Build a list from postings already sorted ascending by doc id.
    pub fn from_sorted(postings: Vec<Posting>) -> Self {
        debug_assert!(postings.windows(2).all(|w| w[0].doc_id < w[1].doc_id));
        PostingList { postings }
    }

    /// Append a posting; the doc id must exceed the current maximum.
    pub fn push(&mut self, posting: Posting) {
        debug_assert!(
            self.postings
                .last()
                .is_none_or(|last| last.doc_id < posting.doc_id)
        );
        self.postings.push(posting);
    }

    /// Number of documents in the list.
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Iterate over the postings.
    pub fn iter(&self) -> std::slice::Iter<'_, Posting> {
        self.postings.iter()
    }

    /// The postings as a slice.
    pub fn postings(&self) -> &[Posting] {
        &self.postings
    }

    /// The sorted document ids of this list.
    pub fn doc_ids(&self) -> Vec<u64> {
        self.postings.iter().map(|p| p.doc_id).collect()
    }

    /// Union this list with another, merging postings that share a doc id.
    pub fn merge(self, other: PostingList) -> PostingList {
        let mut merged = Vec::with_capacity(self.postings.len() + other.postings.len());
        let mut a = self.postings.into_iter().peekable();
        let mut b = other.postings.into_iter().peekable();

        loop {
            match (a.peek(), b.peek()) {
                (Some(pa), Some(pb)) => {
                    if pa.doc_id < pb.doc_id {
                        merged.push(a.next().unwrap());
                    } else if pa.doc_id > pb.doc_id {
                        merged.push(b.next().unwrap());
                    } else {
                        let mut posting = a.next().unwrap();
                        posting.absorb(b.next().unwrap());
                        merged.push(posting);
                    }
                }
                (Some(_), None) => merged.push(a.next().unwrap()),
                (None, Some(_)) => merged.push(b.next().unwrap()),
                (None, None) => break,
            }
        }

        PostingList { postings: merged }
    }

    /// Serialize the list into one compressed postings block.
    pub fn encode_block(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        vb_encode_into(self.postings.len() as u64, &mut buf);

        let mut prev_doc_id = 0u64;
        for (i, posting) in self.postings.iter().enumerate() {
            let gap = if i == 0 {
                posting.doc_id
            } else {
                posting.doc_id - prev_doc_id
            };
            vb_encode_into(gap, &mut buf);
            prev_doc_id = posting.doc_id;

            buf.push(posting.zones.bits());
            vb_encode_into(posting.court_id.map_or(0, |id| id as u64 + 1), &mut buf);
            buf.extend_from_slice(&posting.weight_content.to_le_bytes());
            buf.extend_from_slice(&posting.weight_title.to_le_bytes());

            vb_encode_into(posting.positions.len() as u64, &mut buf);
            let mut prev_pos = 0u32;
            for (j, &pos) in posting.positions.iter().enumerate() {
                let pos_gap = if j == 0 { pos } else { pos - prev_pos };
                vb_encode_into(pos_gap as u64, &mut buf);
                prev_pos = pos;
            }
        }

        buf
    }

    /// Decode a postings block produced by [`PostingList::encode_block`].
    pub fn decode_block(bytes: &[u8]) -> Result<PostingList> {
        let mut cursor = BlockCursor { bytes, offset: 0 };

        let count = cursor.read_varint()? as usize;
        let mut postings = Vec::with_capacity(count);
        let mut doc_id = 0u64;

        for _ in 0..count {
            doc_id += cursor.read_varint()?;

            let zones = ZoneMask::from_bits(cursor.read_u8()?);
            let court_raw = cursor.read_varint()?;
            let court_id = if court_raw == 0 {
                None
            } else {
                Some((court_raw - 1) as u16)
            };
            let weight_content = cursor.read_f32()?;
            let weight_title = cursor.read_f32()?;

            let position_count = cursor.read_varint()? as usize;
            let mut positions = Vec::with_capacity(position_count);
            let mut pos = 0u32;
            for _ in 0..position_count {
                pos += cursor.read_varint()? as u32;
                positions.push(pos);
            }

            postings.push(Posting {
                doc_id,
                zones,
                weight_content,
                weight_title,
                court_id,
                positions,
            });
        }

        if cursor.offset != bytes.len() {
            return Err(CaselexError::corrupt("trailing bytes in postings block"));
        }

        Ok(PostingList { postings })
    }
}

/// Byte-slice cursor for decoding a postings block.
struct BlockCursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl BlockCursor<'_> {
    fn read_u8(&mut self) -> Result<u8> {
        let byte = *self
            .bytes
            .get(self.offset)
            .ok_or_else(|| CaselexError::corrupt("truncated postings block"))?;
        self.offset += 1;
        Ok(byte)
    }

    fn read_varint(&mut self) -> Result<u64> {
        let mut acc = 0u64;
        for _ in 0..10 {
            let byte = self.read_u8()?;
            acc = (acc << 7) | (byte & 0x7F) as u64;
            if byte & 0x80 != 0 {
                return Ok(acc);
            }
        }
        Err(CaselexError::corrupt("varint overflow in postings block"))
    }

    fn read_f32(&mut self) -> Result<f32> {
        let end = self.offset + 4;
        let bytes = self
            .bytes
            .get(self.offset..end)
            .ok_or_else(|| CaselexError::corrupt("truncated postings block"))?;
        self.offset = end;
        Ok(f32::from_le_bytes(bytes.try_into().unwrap()))
    }
}
