use crate::catalog::Document;
use crate::error::SearchError;
use crate::tokenizer::tokenize;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::time::Instant;

pub type TermId = u32;
pub type DocId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    /// raw count of the term in the document
    pub tf: u32,
}

/// Inverted index over the review collection together with its IDF table and
/// document norms. Immutable once built.
#[derive(Debug, Default)]
pub struct SearchIndex {
    dictionary: HashMap<String, TermId>,
    terms: Vec<String>,
    df: Vec<u32>,
    postings: Vec<Vec<Posting>>, // by term id, sorted by doc_id
    idf: Vec<Option<f64>>,       // None when the term fails the df cutoffs
    doc_norms: Vec<f64>,
    names: Vec<String>,
    ordinals: HashMap<String, DocId>,
}

impl SearchIndex {
    /// Build the index from an ordered document collection.
    ///
    /// Ordinals follow input order. A repeated wine name keeps its first
    /// occurrence. A term receives an IDF of `log2(n / (1 + df))` only when
    /// `min_df <= df` and `df / n <= max_df_ratio`.
    pub fn build(documents: &[Document], min_df: u32, max_df_ratio: f64) -> Result<Self, SearchError> {
        let start = Instant::now();
        let mut index = SearchIndex::default();

        for doc in documents {
            let doc_id = index.names.len() as DocId;
            match index.ordinals.entry(doc.wine.clone()) {
                Entry::Occupied(_) => {
                    tracing::warn!(wine = %doc.wine, "duplicate wine name skipped");
                    continue;
                }
                Entry::Vacant(slot) => {
                    slot.insert(doc_id);
                }
            }
            index.names.push(doc.wine.clone());
            index.ingest(doc_id, &doc.review);
        }

        if index.names.is_empty() {
            return Err(SearchError::EmptyCorpus);
        }

        index.compute_idf(min_df, max_df_ratio);
        index.compute_doc_norms();

        tracing::info!(
            num_docs = index.num_docs(),
            num_terms = index.vocabulary_size(),
            qualified_terms = index.qualified_terms(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "index built"
        );
        Ok(index)
    }

    fn ingest(&mut self, doc_id: DocId, review: &str) {
        // Count per term id, preserving first-seen order so term ids are
        // assigned deterministically.
        let mut tf_counts: Vec<(TermId, u32)> = Vec::new();
        let mut slot_of: HashMap<TermId, usize> = HashMap::new();
        for term in tokenize(review) {
            let tid = match self.dictionary.get(&term) {
                Some(&tid) => tid,
                None => {
                    let tid = self.terms.len() as TermId;
                    self.dictionary.insert(term.clone(), tid);
                    self.terms.push(term);
                    self.df.push(0);
                    self.postings.push(Vec::new());
                    tid
                }
            };
            match slot_of.get(&tid) {
                Some(&slot) => tf_counts[slot].1 += 1,
                None => {
                    slot_of.insert(tid, tf_counts.len());
                    tf_counts.push((tid, 1));
                }
            }
        }

        for (tid, tf) in tf_counts {
            self.df[tid as usize] += 1;
            self.postings[tid as usize].push(Posting { doc_id, tf });
        }
    }

    fn compute_idf(&mut self, min_df: u32, max_df_ratio: f64) {
        let n = self.num_docs() as f64;
        self.idf = self
            .df
            .iter()
            .map(|&df| {
                if df < min_df || (df as f64) / n > max_df_ratio {
                    None
                } else {
                    Some((n / (1.0 + df as f64)).log2())
                }
            })
            .collect();
    }

    fn compute_doc_norms(&mut self) {
        let mut norms = vec![0.0f64; self.names.len()];
        for (tid, plist) in self.postings.iter().enumerate() {
            let Some(idf) = self.idf[tid] else { continue };
            for p in plist {
                let w = p.tf as f64 * idf;
                norms[p.doc_id as usize] += w * w;
            }
        }
        for n in norms.iter_mut() {
            *n = n.sqrt();
        }
        self.doc_norms = norms;
    }

    pub fn num_docs(&self) -> u32 {
        self.names.len() as u32
    }

    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }

    /// Number of terms that carry an IDF weight.
    pub fn qualified_terms(&self) -> usize {
        self.idf.iter().filter(|w| w.is_some()).count()
    }

    pub fn term_id(&self, term: &str) -> Option<TermId> {
        self.dictionary.get(term).copied()
    }

    pub fn term(&self, tid: TermId) -> Option<&str> {
        self.terms.get(tid as usize).map(String::as_str)
    }

    pub fn df(&self, tid: TermId) -> u32 {
        self.df.get(tid as usize).copied().unwrap_or(0)
    }

    pub fn postings(&self, tid: TermId) -> &[Posting] {
        self.postings.get(tid as usize).map(Vec::as_slice).unwrap_or(&[])
    }

    /// IDF weight, or `None` when the term is unknown or failed the cutoffs.
    pub fn idf(&self, tid: TermId) -> Option<f64> {
        self.idf.get(tid as usize).copied().flatten()
    }

    pub fn idf_or_zero(&self, tid: TermId) -> f64 {
        self.idf(tid).unwrap_or(0.0)
    }

    /// The IDF table keyed by term, qualified terms only.
    pub fn idf_table(&self) -> HashMap<&str, f64> {
        self.terms
            .iter()
            .zip(self.idf.iter())
            .filter_map(|(t, w)| w.map(|w| (t.as_str(), w)))
            .collect()
    }

    pub fn doc_norm(&self, doc_id: DocId) -> f64 {
        self.doc_norms.get(doc_id as usize).copied().unwrap_or(0.0)
    }

    pub fn doc_norms(&self) -> &[f64] {
        &self.doc_norms
    }

    pub fn name(&self, doc_id: DocId) -> Option<&str> {
        self.names.get(doc_id as usize).map(String::as_str)
    }

    pub fn ordinal(&self, wine: &str) -> Option<DocId> {
        self.ordinals.get(wine).copied()
    }
}
