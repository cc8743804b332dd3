//! Ranked retrieval with the vector space model.
//!
//! Query terms are weighted ltc (log-tf, idf, cosine-normalized) and scored
//! against the lnc document weights stored in the postings, separately per
//! zone. On top of the cosine scores, exact citation, date/year, and court
//! matches contribute bonus components, and a fixed linear combination
//! fuses everything into one score per document.

use ahash::AHashMap;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::index::IndexReader;
use crate::query::collector::TopKCollector;
use crate::query::evaluator::SearchConfig;
use crate::query::parsed::{ParsedQuery, QueryTerm};
use crate::schema::Zone;

/// Court weight applied when a court matches but has no table entry.
pub const DEFAULT_COURT_WEIGHT: f32 = 0.5;

lazy_static! {
    /// Static importance weights per court id, following the external court
    /// registry's id assignment. Apex courts (SGCA, UKSC, UKHL, HCA, SCR)
    /// outweigh the trial-level benches.
    static ref COURT_WEIGHTS: AHashMap<u16, f32> = {
        let mut weights = AHashMap::new();
        for id in [0u16, 18, 25, 28, 30] {
            weights.insert(id, 1.0);
        }
        for id in [4u16, 21, 23, 27] {
            weights.insert(id, 0.85);
        }
        weights
    };
}

/// Static importance weight for a court.
pub fn court_weight(court_id: Option<u16>) -> f32 {
    court_id
        .and_then(|id| COURT_WEIGHTS.get(&id).copied())
        .unwrap_or(DEFAULT_COURT_WEIGHT)
}

/// Fusion weights for the per-zone score components.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentWeights {
    /// Content-zone cosine score weight.
    pub content: f32,
    /// Title-zone cosine score weight.
    pub title: f32,
    /// Exact-citation bonus weight.
    pub citation: f32,
    /// Date/year bonus weight.
    pub date: f32,
    /// Court-match bonus weight.
    pub court: f32,
}

impl Default for ComponentWeights {
    fn default() -> Self {
        ComponentWeights {
            content: 0.5,
            title: 0.3,
            citation: 0.1,
            date: 0.05,
            court: 0.05,
        }
    }
}

/// Per-document zone score accumulator.
#[derive(Debug, Default, Clone, Copy)]
struct ZoneScores {
    content: f32,
    title: f32,
    citation: f32,
    date: f32,
    court: f32,
}

impl ZoneScores {
    fn fuse(&self, weights: &ComponentWeights) -> f32 {
        weights.content * self.content
            + weights.title * self.title
            + weights.citation * self.citation
            + weights.date * self.date
            + weights.court * self.court
    }
}

/// Build the ltc query vector: `(1 + log10 tf) · log10(N/df)`, normalized
/// to unit length. Terms absent from the dictionary contribute nothing.
pub fn query_vector(reader: &IndexReader, terms: &[String]) -> AHashMap<String, f32> {
    let n = reader.doc_count();

    let mut tf: AHashMap<&str, u32> = AHashMap::new();
    for term in terms {
        *tf.entry(term.as_str()).or_insert(0) += 1;
    }

    let mut weights: AHashMap<String, f32> = AHashMap::with_capacity(tf.len());
    for (term, count) in tf {
        let df = reader.doc_frequency(term);
        if df == 0 || n == 0 {
            continue;
        }
        let idf = (n as f32 / df as f32).log10();
        let log_tf = 1.0 + (count as f32).log10();
        weights.insert(term.to_string(), log_tf * idf);
    }

    let norm = weights.values().map(|w| w * w).sum::<f32>().sqrt();
    if norm > 0.0 {
        for weight in weights.values_mut() {
            *weight /= norm;
        }
    }
    weights
}

/// Evaluate a free-text query, returning doc ids in descending score order
/// (ascending doc id on ties).
pub fn evaluate_ranked(
    reader: &IndexReader,
    query: &ParsedQuery,
    config: &SearchConfig,
) -> Result<Vec<u64>> {
    let mut terms: Vec<String> = Vec::with_capacity(query.terms.len());
    for term in &query.terms {
        match term {
            QueryTerm::Term(t) => terms.push(t.clone()),
            // Phrases are only supported in boolean retrieval.
            QueryTerm::Phrase(_) => return Ok(Vec::new()),
        }
    }

    let mut scores: AHashMap<u64, ZoneScores> = AHashMap::new();

    for (term, wq) in query_vector(reader, &terms) {
        // Prune negligible query terms before touching the postings file.
        if wq < config.tfidf_threshold {
            continue;
        }
        if let Some(postings) = reader.read_postings(&term)? {
            for posting in postings.iter() {
                let entry = scores.entry(posting.doc_id).or_default();
                entry.content += wq * posting.weight_content;
                entry.title += wq * posting.weight_title;
            }
        }
    }

    if let Some(citation) = &query.citation
        && let Some(doc_id) = reader.citation_doc(citation)
    {
        scores.entry(doc_id).or_default().citation = 1.0;
    }

    // A full-date match outranks a year-only match; both land in the same
    // fusion component.
    if let Some(year) = &query.year
        && let Some(postings) = reader.read_postings(year)?
    {
        for posting in postings.iter() {
            if posting.zones.contains(Zone::Year) {
                let entry = scores.entry(posting.doc_id).or_default();
                entry.date = entry.date.max(0.5);
            }
        }
    }
    if let Some(date) = &query.date
        && let Some(postings) = reader.read_postings(date)?
    {
        for posting in postings.iter() {
            if posting.zones.contains(Zone::Date) {
                scores.entry(posting.doc_id).or_default().date = 1.0;
            }
        }
    }

    if let Some(court) = &query.court
        && let Some(postings) = reader.read_postings(court)?
    {
        for posting in postings.iter() {
            if posting.zones.contains(Zone::Court) {
                scores.entry(posting.doc_id).or_default().court =
                    court_weight(posting.court_id);
            }
        }
    }

    let mut collector = TopKCollector::new(config.top_k);
    for (doc_id, zone_scores) in scores {
        let score = zone_scores.fuse(&config.weights);
        if score > config.min_score {
            collector.collect(doc_id, score);
        }
    }

    Ok(collector
        .into_ranked()
        .into_iter()
        .map(|doc| doc.doc_id)
        .collect())
}
