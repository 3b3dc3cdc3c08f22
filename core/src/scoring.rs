use crate::index::{DocId, SearchIndex, TermId};
use crate::tokenizer::term_counts;
use serde::Serialize;
use std::collections::HashMap;

/// Sparse query weights keyed by term id. Terms outside the index vocabulary
/// are dropped on construction since they cannot match anything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryVector {
    weights: HashMap<TermId, f64>,
}

impl QueryVector {
    /// Raw term counts of `text`.
    pub fn from_text(index: &SearchIndex, text: &str) -> Self {
        let weights = term_counts(text)
            .into_iter()
            .filter_map(|(term, count)| index.term_id(&term).map(|tid| (tid, count as f64)))
            .collect();
        Self { weights }
    }

    /// Nonzero components of a dense vector indexed by term id.
    pub fn from_dense(dense: &[f64]) -> Self {
        let weights = dense
            .iter()
            .enumerate()
            .filter(|(_, w)| **w != 0.0)
            .map(|(tid, w)| (tid as TermId, *w))
            .collect();
        Self { weights }
    }

    pub fn from_weights<I: IntoIterator<Item = (TermId, f64)>>(iter: I) -> Self {
        Self { weights: iter.into_iter().filter(|(_, w)| *w != 0.0).collect() }
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn weight(&self, tid: TermId) -> f64 {
        self.weights.get(&tid).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TermId, f64)> + '_ {
        self.weights.iter().map(|(t, w)| (*t, *w))
    }

    /// L2 norm over IDF-qualified terms.
    pub fn norm(&self, index: &SearchIndex) -> f64 {
        self.iter()
            .filter_map(|(tid, w)| index.idf(tid).map(|idf| (w * idf).powi(2)))
            .sum::<f64>()
            .sqrt()
    }
}

/// Accumulates unnormalized query/document dot products.
pub trait DotScorer: Send + Sync {
    fn dot_products(&self, query: &QueryVector, index: &SearchIndex) -> HashMap<DocId, f64>;
}

/// TF-IDF dot product: `sum(weight * idf * tf * idf)` over shared terms.
/// Terms without an IDF weight contribute zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct TfIdfDot;

impl DotScorer for TfIdfDot {
    fn dot_products(&self, query: &QueryVector, index: &SearchIndex) -> HashMap<DocId, f64> {
        let mut scores: HashMap<DocId, f64> = HashMap::new();
        for (tid, weight) in query.iter() {
            let idf = index.idf_or_zero(tid);
            let q_i = weight * idf;
            for p in index.postings(tid) {
                *scores.entry(p.doc_id).or_insert(0.0) += q_i * (p.tf as f64 * idf);
            }
        }
        scores
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredDoc {
    pub score: f64,
    pub doc_id: DocId,
}

/// Cosine similarity of `query` against every document with the default scorer.
pub fn rank(query: &QueryVector, index: &SearchIndex) -> Vec<ScoredDoc> {
    rank_with(&TfIdfDot, query, index)
}

/// Cosine similarity of `query` against every document, best first, ties by
/// ascending ordinal. Empty when the query has no terms in the index.
///
/// A zero query norm is replaced by 1, leaving the (all zero) dot products
/// as scores.
pub fn rank_with<S: DotScorer + ?Sized>(scorer: &S, query: &QueryVector, index: &SearchIndex) -> Vec<ScoredDoc> {
    if query.is_empty() {
        return Vec::new();
    }
    let dots = scorer.dot_products(query, index);
    let mut q_norm = query.norm(index);
    if q_norm == 0.0 {
        q_norm = 1.0;
    }

    let mut scored: Vec<ScoredDoc> = (0..index.num_docs()).map(|doc_id| ScoredDoc { score: 0.0, doc_id }).collect();
    for (doc_id, dot) in dots {
        if dot == 0.0 {
            continue;
        }
        let denom = q_norm * index.doc_norm(doc_id);
        if denom > 0.0 {
            // rounding can push a self-match a hair above 1
            scored[doc_id as usize].score = (dot / denom).min(1.0);
        }
    }
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}
