//! The top-level query evaluator.
//!
//! Dispatches a parsed query to boolean or ranked evaluation and enforces
//! the validity rules at the boundary between the two modes. Invalid
//! queries yield an empty result, never an error: batch query processing
//! must keep going.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::index::IndexReader;
use crate::query::boolean::evaluate_boolean;
use crate::query::parsed::{ParsedQuery, QueryTerm};
use crate::query::vector::{evaluate_ranked, ComponentWeights};

/// Search-time configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of results to return for ranked queries.
    pub top_k: usize,

    /// Query terms with a normalized tf-idf weight below this threshold are
    /// skipped entirely.
    pub tfidf_threshold: f32,

    /// Documents scoring at or below this value are excluded from ranked
    /// results.
    pub min_score: f32,

    /// Zone fusion weights.
    pub weights: ComponentWeights,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            top_k: 10,
            tfidf_threshold: 0.1,
            min_score: 0.0,
            weights: ComponentWeights::default(),
        }
    }
}

/// Evaluates parsed queries against a loaded index.
pub struct QueryEvaluator<'a> {
    reader: &'a IndexReader,
    config: SearchConfig,
}

impl<'a> QueryEvaluator<'a> {
    /// Create an evaluator with default configuration.
    pub fn new(reader: &'a IndexReader) -> Self {
        QueryEvaluator {
            reader,
            config: SearchConfig::default(),
        }
    }

    /// Create an evaluator with explicit configuration.
    pub fn with_config(reader: &'a IndexReader, config: SearchConfig) -> Self {
        QueryEvaluator { reader, config }
    }

    /// The active configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Evaluate one query to an ordered doc-id list.
    ///
    /// Boolean queries return ascending doc ids; ranked queries return
    /// descending score order with ascending doc id on ties. Invalid
    /// queries return an empty list.
    pub fn evaluate(&self, query: &ParsedQuery) -> Result<Vec<u64>> {
        if query.is_boolean {
            evaluate_boolean(self.reader, query)
        } else {
            // A free-text query must be plain terms: operators or phrases
            // in a non-boolean query mean the parser saw a mix of boolean
            // and free-text syntax without a connective.
            if !query.operators.is_empty() {
                debug!("rejecting free-text query with boolean operators");
                return Ok(Vec::new());
            }
            if query
                .terms
                .iter()
                .any(|t| matches!(t, QueryTerm::Phrase(_)))
            {
                debug!("rejecting free-text query with phrase operand");
                return Ok(Vec::new());
            }
            evaluate_ranked(self.reader, query, &self.config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentTokens;
    use crate::index::{IndexConfig, IndexWriter};
    use crate::query::parsed::BoolOp;
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    fn build() -> Arc<MemoryStorage> {
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
    fn test_boolean_dispatch() {
        let storage = build();
        let reader = IndexReader::open(storage.as_ref()).unwrap();
        let evaluator = QueryEvaluator::new(&reader);

        let query = ParsedQuery::boolean(
            vec![
                QueryTerm::Term("apple".to_string()),
                QueryTerm::Term("cherry".to_string()),
            ],
            vec![BoolOp::And],
        );
        assert_eq!(evaluator.evaluate(&query).unwrap(), vec![4]);
    }

    #[test]
    fn test_ranked_dispatch() {
        let storage = build();
        let reader = IndexReader::open(storage.as_ref()).unwrap();
        let evaluator = QueryEvaluator::with_config(
            &reader,
            SearchConfig {
                tfidf_threshold: 0.0,
                ..Default::default()
            },
        );

        let ranked = evaluator
            .evaluate(&ParsedQuery::free_text(["cherry"]))
            .unwrap();
        assert_eq!(ranked, vec![4]);
    }

    #[test]
    fn test_mixed_mode_is_invalid() {
        let storage = build();
        let reader = IndexReader::open(storage.as_ref()).unwrap();
        let evaluator = QueryEvaluator::new(&reader);

        // Operators on a query the parser did not classify as boolean.
        let query = ParsedQuery {
            terms: vec![
                QueryTerm::Term("apple".to_string()),
                QueryTerm::Term("banana".to_string()),
            ],
            operators: vec![BoolOp::And],
            is_boolean: false,
            ..Default::default()
        };
        assert!(evaluator.evaluate(&query).unwrap().is_empty());

        // A phrase inside free text.
        let query = ParsedQuery {
            terms: vec![QueryTerm::Phrase(vec![
                "apple".to_string(),
                "banana".to_string(),
            ])],
            ..Default::default()
        };
        assert!(evaluator.evaluate(&query).unwrap().is_empty());
    }

    #[test]
    fn test_empty_query_is_empty_result() {
        let storage = build();
        let reader = IndexReader::open(storage.as_ref()).unwrap();
        let evaluator = QueryEvaluator::new(&reader);

        assert!(evaluator.evaluate(&ParsedQuery::default()).unwrap().is_empty());
    }
}
