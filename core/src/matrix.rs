use crate::index::{DocId, SearchIndex, TermId};
use std::time::Instant;

/// Dense document × term matrix of raw counts, derived from a built index.
///
/// Costs `num_docs * vocabulary_size` cells, so it is only materialized when
/// relevance feedback is first requested.
#[derive(Debug)]
pub struct TermMatrix {
    num_docs: usize,
    num_terms: usize,
    counts: Vec<f32>, // row-major, one row per document
}

impl TermMatrix {
    pub fn from_index(index: &SearchIndex) -> Self {
        let start = Instant::now();
        let num_docs = index.num_docs() as usize;
        let num_terms = index.vocabulary_size();
        let mut counts = vec![0.0f32; num_docs * num_terms];
        for tid in 0..num_terms {
            for p in index.postings(tid as TermId) {
                counts[p.doc_id as usize * num_terms + tid] = p.tf as f32;
            }
        }
        tracing::info!(num_docs, num_terms, elapsed_ms = start.elapsed().as_millis() as u64, "term matrix built");
        Self { num_docs, num_terms, counts }
    }

    pub fn num_docs(&self) -> usize {
        self.num_docs
    }

    pub fn num_terms(&self) -> usize {
        self.num_terms
    }

    /// Counts for one document, indexed by term id. Empty for unknown ids.
    pub fn row(&self, doc_id: DocId) -> &[f32] {
        let d = doc_id as usize;
        if d >= self.num_docs {
            return &[];
        }
        &self.counts[d * self.num_terms..(d + 1) * self.num_terms]
    }
}
