use crate::cache::IndexCache;
use crate::catalog::CorpusSource;
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::feedback::rocchio;
use crate::index::{DocId, SearchIndex};
use crate::scoring::{rank_with, DotScorer, QueryVector, TfIdfDot};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarRequest {
    /// Anchor wine whose review is the query.
    pub wine: Option<String>,
    pub liked: Vec<String>,
    pub disliked: Vec<String>,
    pub limit: usize,
}

impl Default for SimilarRequest {
    fn default() -> Self {
        Self { wine: None, liked: Vec::new(), disliked: Vec::new(), limit: 10 }
    }
}

impl SimilarRequest {
    pub fn anchor(wine: impl Into<String>, limit: usize) -> Self {
        Self { wine: Some(wine.into()), limit, ..Self::default() }
    }

    pub fn has_feedback(&self) -> bool {
        !self.liked.is_empty() || !self.disliked.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarHit {
    pub score: f64,
    pub wine: String,
}

/// How a request's query vector is formed. Feedback always wins over a plain
/// anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPlan {
    Empty,
    Anchor(DocId),
    Feedback { anchor: Option<DocId>, liked: Vec<DocId>, disliked: Vec<DocId> },
}

/// Resolves requests against the cached index.
pub struct SimilarityEngine {
    cache: IndexCache,
    config: SearchConfig,
    scorer: Box<dyn DotScorer>,
}

impl SimilarityEngine {
    pub fn new(source: Arc<dyn CorpusSource>, config: SearchConfig) -> Self {
        Self { cache: IndexCache::new(source, &config), config, scorer: Box::new(TfIdfDot) }
    }

    /// Replace the dot-product strategy.
    pub fn with_scorer(mut self, scorer: Box<dyn DotScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn cache(&self) -> &IndexCache {
        &self.cache
    }

    /// Whether `req` resolves to a non-empty query against the built index.
    /// Unknown anchor and feedback names count as absent.
    pub fn has_query(&self, req: &SimilarRequest) -> Result<bool, SearchError> {
        let index = self.cache.index()?;
        Ok(self.plan(&index, req) != QueryPlan::Empty)
    }

    /// Build the index now instead of on the first request.
    pub fn warm(&self) -> Result<Arc<SearchIndex>, SearchError> {
        self.cache.index()
    }

    pub fn plan(&self, index: &SearchIndex, req: &SimilarRequest) -> QueryPlan {
        let anchor = req.wine.as_deref().and_then(|w| {
            let found = index.ordinal(w);
            if found.is_none() {
                tracing::debug!(wine = w, "anchor wine not in index");
            }
            found
        });
        if req.has_feedback() {
            let liked = resolve(index, &req.liked);
            let disliked = resolve(index, &req.disliked);
            // nothing resolved at all is the same as no query
            if anchor.is_none() && liked.is_empty() && disliked.is_empty() {
                return QueryPlan::Empty;
            }
            return QueryPlan::Feedback { anchor, liked, disliked };
        }
        match anchor {
            Some(doc_id) => QueryPlan::Anchor(doc_id),
            None => QueryPlan::Empty,
        }
    }

    pub fn query_vector(&self, index: &SearchIndex, plan: &QueryPlan) -> Result<QueryVector, SearchError> {
        Ok(match plan {
            QueryPlan::Empty => QueryVector::default(),
            QueryPlan::Anchor(doc_id) => {
                let review = index.name(*doc_id).and_then(|w| self.cache.source().review(w));
                match review {
                    Some(text) => QueryVector::from_text(index, &text),
                    None => QueryVector::default(),
                }
            }
            QueryPlan::Feedback { anchor, liked, disliked } => {
                let matrix = self.cache.term_matrix()?;
                QueryVector::from_dense(&rocchio(*anchor, liked, disliked, &matrix, &self.config.rocchio))
            }
        })
    }

    /// Wines most similar to the request's anchor and feedback, best first,
    /// never including the anchor itself.
    pub fn similar(&self, req: &SimilarRequest) -> Result<Vec<SimilarHit>, SearchError> {
        let index = self.cache.index()?;
        let plan = self.plan(&index, req);
        let query = self.query_vector(&index, &plan)?;
        let exclude = match plan {
            QueryPlan::Anchor(doc_id) | QueryPlan::Feedback { anchor: Some(doc_id), .. } => Some(doc_id),
            _ => None,
        };

        let hits: Vec<SimilarHit> = rank_with(self.scorer.as_ref(), &query, &index)
            .into_iter()
            .filter(|s| Some(s.doc_id) != exclude)
            .take(req.limit)
            .filter_map(|s| index.name(s.doc_id).map(|w| SimilarHit { score: s.score, wine: w.to_string() }))
            .collect();
        tracing::debug!(terms = query.len(), hits = hits.len(), "similarity search");
        Ok(hits)
    }
}

fn resolve(index: &SearchIndex, names: &[String]) -> Vec<DocId> {
    names
        .iter()
        .filter_map(|n| {
            let found = index.ordinal(n);
            if found.is_none() {
                tracing::debug!(wine = %n, "feedback wine not in index");
            }
            found
        })
        .collect()
}
