use crate::catalog::WineRecord;
use crate::mood::Mood;
use serde::Serialize;

/// Which score orders a result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    TermScore,
    Similarity,
    Combined,
}

impl SortKey {
    /// Combined when both signals ran, similarity alone, otherwise term score.
    pub fn for_signals(similarity: bool, keywords: bool) -> Self {
        match (similarity, keywords) {
            (true, true) => SortKey::Combined,
            (true, false) => SortKey::Similarity,
            _ => SortKey::TermScore,
        }
    }
}

/// A catalog record annotated by each pipeline stage it passes through.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredWine {
    #[serde(flatten)]
    pub record: WineRecord,
    /// cosine similarity to the query
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact_matches: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substring_matches: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combined_score: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub moods: Vec<Mood>,
}

impl ScoredWine {
    pub fn new(record: WineRecord) -> Self {
        Self {
            record,
            score: None,
            exact_matches: None,
            substring_matches: None,
            term_score: None,
            combined_score: None,
            moods: Vec::new(),
        }
    }

    pub fn with_score(record: WineRecord, score: f64) -> Self {
        Self { score: Some(score), ..Self::new(record) }
    }

    pub fn wine(&self) -> &str {
        &self.record.wine
    }

    /// Value used when sorting by `key`; a missing field falls back to the
    /// term score, then the similarity score, then zero.
    pub fn sort_value(&self, key: SortKey) -> f64 {
        let primary = match key {
            SortKey::TermScore => self.term_score,
            SortKey::Similarity => self.score,
            SortKey::Combined => self.combined_score,
        };
        primary.or(self.term_score).or(self.score).unwrap_or(0.0)
    }

    /// Matched moods joined for display, e.g. `"Chill, Sad"`.
    pub fn mood_label(&self) -> String {
        self.moods.iter().map(|m| m.label()).collect::<Vec<_>>().join(", ")
    }
}

/// Stable descending sort by `key`.
pub fn sort_records(records: &mut [ScoredWine], key: SortKey) {
    records.sort_by(|a, b| b.sort_value(key).total_cmp(&a.sort_value(key)));
}
