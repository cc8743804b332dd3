//! Pre-tokenized document records, the input to index construction.
//!
//! Tokenization, stemming, citation extraction, and court-name lookup all
//! happen upstream; the engine consumes their output as plain token streams
//! per zone. Content positions are implied by token order.

use serde::{Deserialize, Serialize};

/// One document's token streams, as produced by the external tokenizer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentTokens {
    /// Collection-unique document identifier.
    pub doc_id: u64,

    /// Judgment body tokens in order; the token's index is its position.
    #[serde(default)]
    pub content: Vec<String>,

    /// Case title tokens.
    #[serde(default)]
    pub title: Vec<String>,

    /// Decision year token (e.g. `"2005"`).
    #[serde(default)]
    pub year: Option<String>,

    /// Full decision date token (e.g. `"2005-03-14"`).
    #[serde(default)]
    pub date: Option<String>,

    /// Normalized court abbreviation (e.g. `"SGCA"`), from the external
    /// court-name lookup.
    #[serde(default)]
    pub court: Option<String>,

    /// Numeric court identifier paired with `court`.
    #[serde(default)]
    pub court_id: Option<u16>,

    /// Neutral citations extracted from the title.
    #[serde(default)]
    pub citations: Vec<String>,
}

impl DocumentTokens {
    /// Whether the record carries any indexable token at all.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
            && self.title.is_empty()
            && self.year.is_none()
            && self.date.is_none()
            && self.court.is_none()
            && self.citations.is_empty()
    }
}
