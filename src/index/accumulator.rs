//! Per-document term accumulation and weight normalization.
//!
//! The accumulator holds exactly one document's state: term frequencies per
//! zone, content positions, and zone masks. [`DocumentAccumulator::finish`]
//! turns that state into postings with lnc weights (log-tf, L2-normalized
//! cosine) and clears the accumulator, so peak memory stays bounded by the
//! largest single document.

use ahash::AHashMap;

use crate::postings::Posting;
use crate::schema::{Zone, ZoneMask};

/// Build-time accumulator for a single document.
#[derive(Debug, Default)]
pub struct DocumentAccumulator {
    content_tf: AHashMap<String, u32>,
    title_tf: AHashMap<String, u32>,
    positions: AHashMap<String, Vec<u32>>,
    zones: AHashMap<String, ZoneMask>,
}

impl DocumentAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        DocumentAccumulator::default()
    }

    /// Record a content-zone occurrence at the given position.
    pub fn add_content(&mut self, term: &str, position: u32) {
        *self.content_tf.entry(term.to_string()).or_insert(0) += 1;
        self.positions
            .entry(term.to_string())
            .or_default()
            .push(position);
        self.mark_zone(term, Zone::Content);
    }

    /// Record a title-zone occurrence.
    pub fn add_title(&mut self, term: &str) {
        *self.title_tf.entry(term.to_string()).or_insert(0) += 1;
        self.mark_zone(term, Zone::Title);
    }

    /// Record a singleton zone token (year, date, court, citation).
    ///
    /// Zone tokens carry no vector weight; they are reachable as boolean
    /// filters and feed the rank-fusion bonus components.
    pub fn add_zone_token(&mut self, term: &str, zone: Zone) {
        self.mark_zone(term, zone);
    }

    fn mark_zone(&mut self, term: &str, zone: Zone) {
        self.zones
            .entry(term.to_string())
            .or_insert_with(ZoneMask::empty)
            .insert(zone);
    }

    /// Whether nothing has been accumulated.
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Compute lnc weights for every accumulated term and drain the
    /// accumulator into postings for `doc_id`.
    pub fn finish(&mut self, doc_id: u64, court_id: Option<u16>) -> Vec<(String, Posting)> {
        let out = {
            let content_log: AHashMap<&str, f32> = self
                .content_tf
                .iter()
                .map(|(term, &tf)| (term.as_str(), 1.0 + (tf as f32).log10()))
                .collect();
            let title_log: AHashMap<&str, f32> = self
                .title_tf
                .iter()
                .map(|(term, &tf)| (term.as_str(), 1.0 + (tf as f32).log10()))
                .collect();

            let content_norm = l2_norm(content_log.values());
            let title_norm = l2_norm(title_log.values());

            let mut out = Vec::with_capacity(self.zones.len());
            for (term, &zones) in &self.zones {
                let weight_content = match content_log.get(term.as_str()) {
                    Some(&w) if content_norm > 0.0 => w / content_norm,
                    _ => 0.0,
                };
                let weight_title = match title_log.get(term.as_str()) {
                    Some(&w) if title_norm > 0.0 => w / title_norm,
                    _ => 0.0,
                };
                let mut positions = self.positions.remove(term.as_str()).unwrap_or_default();
                positions.sort_unstable();

                out.push((
                    term.clone(),
                    Posting {
                        doc_id,
                        zones,
                        weight_content,
                        weight_title,
                        court_id,
                        positions,
                    },
                ));
            }
            out
        };

        self.content_tf.clear();
        self.title_tf.clear();
        self.positions.clear();
        self.zones.clear();

        out
    }
}

fn l2_norm<'a, I: Iterator<Item = &'a f32>>(values: I) -> f32 {
    values.map(|w| w * w).sum::<f32>().sqrt()
}
