use crate::config::KeywordWeights;
use crate::error::SearchError;
use crate::record::{sort_records, ScoredWine, SortKey};
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;

/// Case-insensitive keyword counter over review text.
///
/// Each keyword is counted twice: whole-word hits, and hits anywhere in the
/// text. The substring count reported excludes the whole-word hits so one
/// occurrence is never counted under both.
pub struct KeywordMatcher {
    patterns: Vec<(Regex, Regex)>, // (whole word, anywhere)
    weights: KeywordWeights,
}

impl KeywordMatcher {
    /// Blank keywords are ignored; keywords are matched literally.
    pub fn new<S: AsRef<str>>(keywords: &[S], weights: KeywordWeights) -> Result<Self, SearchError> {
        let mut patterns = Vec::new();
        for kw in keywords {
            let kw = kw.as_ref().trim();
            if kw.is_empty() {
                continue;
            }
            let escaped = regex::escape(kw);
            let exact = RegexBuilder::new(&format!(r"\b{escaped}\b")).case_insensitive(true).build()?;
            let anywhere = RegexBuilder::new(&escaped).case_insensitive(true).build()?;
            patterns.push((exact, anywhere));
        }
        Ok(Self { patterns, weights })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// `(exact_matches, substring_matches)` summed over all keywords.
    pub fn count(&self, text: &str) -> (usize, usize) {
        let mut exact = 0;
        let mut anywhere = 0;
        for (e, a) in &self.patterns {
            exact += e.find_iter(text).count();
            anywhere += a.find_iter(text).count();
        }
        (exact, anywhere.saturating_sub(exact))
    }

    pub fn term_score(&self, exact: usize, substring: usize) -> f64 {
        exact as f64 * self.weights.exact_weight + substring as f64 * self.weights.substring_weight
    }

    /// Annotate one record, or `None` when no keyword occurs in its review.
    pub fn annotate(&self, mut rec: ScoredWine, similarity: Option<&HashMap<String, f64>>) -> Option<ScoredWine> {
        let (exact, substring) = self.count(&rec.record.review);
        if exact == 0 && substring == 0 {
            return None;
        }
        let term_score = self.term_score(exact, substring);
        rec.exact_matches = Some(exact);
        rec.substring_matches = Some(substring);
        rec.term_score = Some(term_score);
        if let Some(&sim) = similarity.and_then(|s| s.get(rec.wine())) {
            rec.score = Some(sim);
            rec.combined_score = Some(term_score + sim);
        }
        Some(rec)
    }
}

/// Keep the records whose review mentions any keyword, annotated with match
/// counts and term score, plus a combined score for wines present in
/// `similarity`. Sorted by combined score when similarity scores are supplied,
/// by term score otherwise.
pub fn keyword_match<I, S>(records: I, keywords: &[S], similarity: Option<&HashMap<String, f64>>, weights: KeywordWeights) -> Result<Vec<ScoredWine>, SearchError>
where
    I: IntoIterator<Item = ScoredWine>,
    S: AsRef<str>,
{
    let matcher = KeywordMatcher::new(keywords, weights)?;
    let mut out: Vec<ScoredWine> = records.into_iter().filter_map(|r| matcher.annotate(r, similarity)).collect();
    tracing::debug!(keywords = keywords.len(), hits = out.len(), "keyword match");
    sort_records(&mut out, SortKey::for_signals(similarity.is_some(), true));
    Ok(out)
}
