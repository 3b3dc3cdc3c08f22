use serde::{Deserialize, Serialize};

/// Tunables for index construction and request scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Terms in fewer documents than this get no IDF weight.
    pub min_df: u32,
    /// Terms in more than this fraction of documents get no IDF weight.
    pub max_df_ratio: f64,
    pub rocchio: RocchioParams,
    pub keyword: KeywordWeights,
    /// How many similar wines feed the recommendation pipeline.
    pub candidate_limit: usize,
    /// How many records a recommendation returns.
    pub result_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_df: 200,
            max_df_ratio: 0.2,
            rocchio: RocchioParams::default(),
            keyword: KeywordWeights::default(),
            candidate_limit: 3000,
            result_limit: 6,
        }
    }
}

impl SearchConfig {
    /// Config with explicit document-frequency cutoffs and defaults elsewhere.
    pub fn with_df_cutoffs(min_df: u32, max_df_ratio: f64) -> Self {
        Self { min_df, max_df_ratio, ..Self::default() }
    }
}

/// Rocchio coefficients: `alpha * anchor + beta * mean(liked) - gamma * mean(disliked)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RocchioParams {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub clip_negative: bool,
}

impl Default for RocchioParams {
    fn default() -> Self {
        Self { alpha: 0.3, beta: 0.3, gamma: 0.8, clip_negative: true }
    }
}

/// Weights applied to whole-word and partial keyword hits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordWeights {
    pub exact_weight: f64,
    pub substring_weight: f64,
}

impl Default for KeywordWeights {
    fn default() -> Self {
        Self { exact_weight: 1.0, substring_weight: 1.0 }
    }
}
