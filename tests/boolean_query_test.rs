//! Integration tests for boolean retrieval over a built index.

use std::sync::Arc;

use caselex::document::DocumentTokens;
use caselex::index::{IndexConfig, IndexReader, IndexWriter};
use caselex::query::{BoolOp, ParsedQuery, QueryEvaluator, QueryTerm};
use caselex::storage::MemoryStorage;

fn doc(doc_id: u64, content: &[&str]) -> DocumentTokens {
    DocumentTokens {
        doc_id,
        content: content.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    }
}

fn term(t: &str) -> QueryTerm {
    QueryTerm::Term(t.to_string())
}

fn phrase(terms: &[&str]) -> QueryTerm {
    QueryTerm::Phrase(terms.iter().map(|s| s.to_string()).collect())
}

/// apple → {1, 4}, banana → {1, 4}, cherry → {4}.
fn build_fruit_index() -> Arc<MemoryStorage> {
    let storage = Arc::new(MemoryStorage::new());
    let mut writer = IndexWriter::new(storage.clone(), IndexConfig::default());

    writer.add_document(&doc(1, &["apple", "banana"])).unwrap();
    writer
        .add_document(&doc(4, &["apple", "banana", "cherry"]))
        .unwrap();
    writer.commit().unwrap();
    storage
}

#[test]
fn test_conjunction_scenarios() {
    let storage = build_fruit_index();
    let reader = IndexReader::open(storage.as_ref()).unwrap();
    let evaluator = QueryEvaluator::new(&reader);

    let query = ParsedQuery::boolean(vec![term("apple"), term("banana")], vec![BoolOp::And]);
    assert_eq!(evaluator.evaluate(&query).unwrap(), vec![1, 4]);

    let query = ParsedQuery::boolean(
        vec![term("apple"), term("banana"), term("cherry")],
        vec![BoolOp::And, BoolOp::And],
    );
    assert_eq!(evaluator.evaluate(&query).unwrap(), vec![4]);
}

#[test]
fn test_negation_against_universe() {
    let storage = build_fruit_index();
    let reader = IndexReader::open(storage.as_ref()).unwrap();
    let evaluator = QueryEvaluator::new(&reader);

    let query = ParsedQuery::boolean(
        vec![term("apple"), term("cherry")],
        vec![BoolOp::And, BoolOp::Not],
    );
    assert_eq!(evaluator.evaluate(&query).unwrap(), vec![1]);
}

#[test]
fn test_disjunction() {
    let storage = build_fruit_index();
    let reader = IndexReader::open(storage.as_ref()).unwrap();
    let evaluator = QueryEvaluator::new(&reader);

    let query = ParsedQuery::boolean(vec![term("cherry"), term("banana")], vec![BoolOp::Or]);
    assert_eq!(evaluator.evaluate(&query).unwrap(), vec![1, 4]);
}

#[test]
fn test_phrase_query_needs_adjacency() {
    // doc1: apple {2, 6}, banana {4, 7}; doc4: apple {7}, banana {8, 15}.
    let storage = Arc::new(MemoryStorage::new());
    let mut writer = IndexWriter::new(storage.clone(), IndexConfig::default());

    let mut content1 = vec!["x"; 8];
    content1[2] = "apple";
    content1[6] = "apple";
    content1[4] = "banana";
    content1[7] = "banana";
    writer.add_document(&doc(1, &content1)).unwrap();

    let mut content4 = vec!["x"; 16];
    content4[7] = "apple";
    content4[8] = "banana";
    content4[15] = "banana";
    writer.add_document(&doc(4, &content4)).unwrap();
    writer.commit().unwrap();

    let reader = IndexReader::open(storage.as_ref()).unwrap();
    let evaluator = QueryEvaluator::new(&reader);

    let query = ParsedQuery::boolean(vec![phrase(&["apple", "banana"])], vec![]);
    assert_eq!(evaluator.evaluate(&query).unwrap(), vec![4]);
}

#[test]
fn test_phrase_with_unknown_term_is_empty() {
    let storage = build_fruit_index();
    let reader = IndexReader::open(storage.as_ref()).unwrap();
    let evaluator = QueryEvaluator::new(&reader);

    let query = ParsedQuery::boolean(
        vec![phrase(&["apple", "durian"]), term("banana")],
        vec![BoolOp::And],
    );
    assert!(evaluator.evaluate(&query).unwrap().is_empty());
}

#[test]
fn test_conjunction_order_does_not_change_results() {
    let storage = Arc::new(MemoryStorage::new());
    let mut writer = IndexWriter::new(storage.clone(), IndexConfig::default());

    // "common" in every doc, "rare" in one, "medium" in half.
    for id in 0..50u64 {
        let mut content = vec!["common"];
        if id % 2 == 0 {
            content.push("medium");
        }
        if id == 24 {
            content.push("rare");
        }
        writer.add_document(&doc(id, &content)).unwrap();
    }
    writer.commit().unwrap();

    let reader = IndexReader::open(storage.as_ref()).unwrap();
    let evaluator = QueryEvaluator::new(&reader);

    for terms in [
        vec![term("common"), term("medium"), term("rare")],
        vec![term("rare"), term("common"), term("medium")],
        vec![term("medium"), term("rare"), term("common")],
    ] {
        let query = ParsedQuery::boolean(terms, vec![BoolOp::And, BoolOp::And]);
        assert_eq!(evaluator.evaluate(&query).unwrap(), vec![24]);
    }
}
