use crate::catalog::{Catalog, WineFilter};
use crate::engine::{SimilarRequest, SimilarityEngine};
use crate::error::SearchError;
use crate::keyword::keyword_match;
use crate::mood::{mood_filter, Mood};
use crate::record::{sort_records, ScoredWine, SortKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendRequest {
    pub wine: Option<String>,
    pub liked: Vec<String>,
    pub disliked: Vec<String>,
    pub flavors: Vec<String>,
    pub moods: Vec<Mood>,
    pub filter: WineFilter,
    /// Defaults to the configured result limit.
    pub limit: Option<usize>,
}

/// Similarity, then keywords, then structured filters, then moods.
pub fn recommend(engine: &SimilarityEngine, catalog: &Catalog, req: &RecommendRequest) -> Result<Vec<ScoredWine>, SearchError> {
    let config = engine.config();
    let flavors: Vec<&str> = req.flavors.iter().map(|f| f.trim()).filter(|f| !f.is_empty()).collect();
    let similar_req = SimilarRequest {
        wine: req.wine.clone(),
        liked: req.liked.clone(),
        disliked: req.disliked.clone(),
        limit: config.candidate_limit,
    };
    // an anchor or feedback list that names no known wine is no signal
    let use_similarity = engine.has_query(&similar_req)?;
    let use_keywords = !flavors.is_empty();

    let mut results: Vec<ScoredWine> = if use_similarity {
        let hits = engine.similar(&similar_req)?;
        let mut candidates: Vec<ScoredWine> = hits
            .iter()
            .filter_map(|h| catalog.get(&h.wine).map(|rec| ScoredWine::with_score(rec.clone(), h.score)))
            .collect();
        if use_keywords {
            let scores: HashMap<String, f64> = hits.into_iter().map(|h| (h.wine, h.score)).collect();
            candidates = keyword_match(candidates, &flavors, Some(&scores), config.keyword)?;
        }
        candidates.retain(|c| req.filter.matches(&c.record));
        candidates
    } else {
        let filtered = catalog.filter(&req.filter).cloned().map(ScoredWine::new);
        if use_keywords {
            keyword_match(filtered, &flavors, None, config.keyword)?
        } else {
            filtered.collect()
        }
    };

    let key = SortKey::for_signals(use_similarity, use_keywords);
    if !req.moods.is_empty() {
        results = mood_filter(results, &req.moods, key);
    } else if use_similarity || use_keywords {
        sort_records(&mut results, key);
    }
    results.truncate(req.limit.unwrap_or(config.result_limit));
    Ok(results)
}
