//! End-to-end tests: build an index on disk, reopen it, and query it.

use std::sync::Arc;

use caselex::document::DocumentTokens;
use caselex::index::{IndexConfig, IndexReader, IndexWriter, DICTIONARY_FILE, POSTINGS_FILE};
use caselex::query::{ParsedQuery, QueryEvaluator, SearchConfig};
use caselex::storage::{FileStorage, Storage, StorageConfig};
use tempfile::TempDir;

fn sample_documents() -> Vec<DocumentTokens> {
    let to_terms = |s: &str| s.split_whitespace().map(String::from).collect::<Vec<_>>();

    vec![
        DocumentTokens {
            doc_id: 101,
            content: to_terms(
                "negligence duty care manufacturer liability negligence consumer",
            ),
            title: to_terms("donoghue stevenson"),
            year: Some("1932".to_string()),
            date: Some("1932-05-26".to_string()),
            court: Some("ukhl".to_string()),
            court_id: Some(28),
            citations: vec!["[1932] UKHL 100".to_string()],
        },
        DocumentTokens {
            doc_id: 102,
            content: to_terms("contract breach damages remedy contract"),
            title: to_terms("hadley baxendale"),
            year: Some("1854".to_string()),
            court: Some("ewhc".to_string()),
            court_id: Some(11),
            citations: vec!["[1854] EWHC 70".to_string()],
            ..Default::default()
        },
        DocumentTokens {
            doc_id: 103,
            content: to_terms("negligence damages apportionment contributory"),
            title: to_terms("froom butcher"),
            year: Some("1975".to_string()),
            ..Default::default()
        },
    ]
}

fn build_in(dir: &std::path::Path, memory_limit: usize) {
    let storage = Arc::new(FileStorage::new(dir, StorageConfig::default()).unwrap());
    let mut writer = IndexWriter::new(storage, IndexConfig { memory_limit });
    for doc in sample_documents() {
        writer.add_document(&doc).unwrap();
    }
    writer.commit().unwrap();
}

#[test]
fn test_build_reopen_and_rank() {
    let dir = TempDir::new().unwrap();
    build_in(dir.path(), IndexConfig::default().memory_limit);

    let storage = FileStorage::new(dir.path(), StorageConfig::default()).unwrap();
    let reader = IndexReader::open(&storage).unwrap();
    assert_eq!(reader.doc_count(), 3);
    assert_eq!(reader.doc_frequency("negligence"), 2);

    let evaluator = QueryEvaluator::with_config(
        &reader,
        SearchConfig {
            tfidf_threshold: 0.0,
            ..Default::default()
        },
    );

    // Title + content + court signals all point at doc 101.
    let query = ParsedQuery {
        court: Some("ukhl".to_string()),
        year: Some("1932".to_string()),
        ..ParsedQuery::free_text(["negligence", "duty"])
    };
    let ranked = evaluator.evaluate(&query).unwrap();
    assert_eq!(ranked.first(), Some(&101));
    assert!(ranked.contains(&103));
    assert!(!ranked.contains(&102));
}

#[test]
fn test_citation_side_table() {
    let dir = TempDir::new().unwrap();
    build_in(dir.path(), IndexConfig::default().memory_limit);

    let storage = FileStorage::new(dir.path(), StorageConfig::default()).unwrap();
    let reader = IndexReader::open(&storage).unwrap();

    assert_eq!(reader.citation_doc("[1854] EWHC 70"), Some(102));

    let evaluator = QueryEvaluator::new(&reader);
    let query = ParsedQuery {
        citation: Some("[1854] EWHC 70".to_string()),
        ..Default::default()
    };
    assert_eq!(evaluator.evaluate(&query).unwrap(), vec![102]);
}

#[test]
fn test_identical_scores_order_by_doc_id() {
    let dir = TempDir::new().unwrap();
    let storage = Arc::new(FileStorage::new(dir.path(), StorageConfig::default()).unwrap());
    let mut writer = IndexWriter::new(storage.clone(), IndexConfig::default());

    // Three identical documents plus one that makes idf non-zero.
    for doc_id in [30u64, 10, 20] {
        writer
            .add_document(&DocumentTokens {
                doc_id,
                content: vec!["estoppel".to_string()],
                ..Default::default()
            })
            .unwrap();
    }
    writer
        .add_document(&DocumentTokens {
            doc_id: 40,
            content: vec!["laches".to_string()],
            ..Default::default()
        })
        .unwrap();
    writer.commit().unwrap();

    let reader = IndexReader::open(storage.as_ref()).unwrap();
    let evaluator = QueryEvaluator::with_config(
        &reader,
        SearchConfig {
            tfidf_threshold: 0.0,
            ..Default::default()
        },
    );

    let ranked = evaluator
        .evaluate(&ParsedQuery::free_text(["estoppel"]))
        .unwrap();
    assert_eq!(ranked, vec![10, 20, 30]);
}

#[test]
fn test_top_k_bounds_results() {
    let dir = TempDir::new().unwrap();
    let storage = Arc::new(FileStorage::new(dir.path(), StorageConfig::default()).unwrap());
    let mut writer = IndexWriter::new(storage.clone(), IndexConfig::default());

    for doc_id in 0..25u64 {
        writer
            .add_document(&DocumentTokens {
                doc_id,
                content: vec!["injunction".to_string()],
                ..Default::default()
            })
            .unwrap();
    }
    writer
        .add_document(&DocumentTokens {
            doc_id: 99,
            content: vec!["mandamus".to_string()],
            ..Default::default()
        })
        .unwrap();
    writer.commit().unwrap();

    let reader = IndexReader::open(storage.as_ref()).unwrap();
    let evaluator = QueryEvaluator::with_config(
        &reader,
        SearchConfig {
            top_k: 5,
            tfidf_threshold: 0.0,
            ..Default::default()
        },
    );

    let ranked = evaluator
        .evaluate(&ParsedQuery::free_text(["injunction"]))
        .unwrap();
    assert_eq!(ranked, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_rebuild_is_byte_identical_on_disk() {
    let dir_a = TempDir::new().unwrap();
    let dir_b = TempDir::new().unwrap();

    // A small memory limit forces several spill blocks per build.
    build_in(dir_a.path(), 256);
    build_in(dir_b.path(), 256);

    for name in [DICTIONARY_FILE, POSTINGS_FILE, "meta.json"] {
        let a = std::fs::read(dir_a.path().join(name)).unwrap();
        let b = std::fs::read(dir_b.path().join(name)).unwrap();
        assert_eq!(a, b, "file {name} differs between identical builds");
    }
}

#[test]
fn test_tampered_dictionary_fails_to_open() {
    let dir = TempDir::new().unwrap();
    build_in(dir.path(), IndexConfig::default().memory_limit);

    let path = dir.path().join(DICTIONARY_FILE);
    let mut bytes = std::fs::read(&path).unwrap();
    let mid = bytes.len() / 2;
    bytes[mid] ^= 0x01;
    std::fs::write(&path, bytes).unwrap();

    let storage = FileStorage::new(dir.path(), StorageConfig::default()).unwrap();
    assert!(IndexReader::open(&storage).is_err());
}

#[test]
fn test_blocks_are_cleaned_up() {
    let dir = TempDir::new().unwrap();
    build_in(dir.path(), 256);

    let storage = FileStorage::new(dir.path(), StorageConfig::default()).unwrap();
    for name in storage.list_files().unwrap() {
        assert!(
            !name.starts_with("block-"),
            "spill block {name} survived the merge"
        );
    }
}
