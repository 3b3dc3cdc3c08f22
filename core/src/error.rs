use thiserror::Error;

/// Failures that stop the index from being built, the catalog from loading, or
/// a keyword list from compiling.
///
/// Query-time edge cases (unknown wines, zero norms, empty feedback sets) are
/// handled where they occur and never surface here.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The document collection was empty, so no IDF can be defined.
    #[error("cannot build an index from an empty corpus")]
    EmptyCorpus,

    #[error("catalog error: {0}")]
    Catalog(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid keyword pattern: {0}")]
    Keyword(#[from] regex::Error),
}
