use crate::catalog::CorpusSource;
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::index::SearchIndex;
use crate::matrix::TermMatrix;
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Holds the index and the term-count matrix, each built at most once.
///
/// Concurrent first callers block on the in-flight build and all observe the
/// same result. A failed build leaves the slot empty. After that, reads take
/// no lock.
pub struct IndexCache {
    source: Arc<dyn CorpusSource>,
    min_df: u32,
    max_df_ratio: f64,
    index: OnceCell<Arc<SearchIndex>>,
    matrix: OnceCell<Arc<TermMatrix>>,
}

impl IndexCache {
    pub fn new(source: Arc<dyn CorpusSource>, config: &SearchConfig) -> Self {
        Self {
            source,
            min_df: config.min_df,
            max_df_ratio: config.max_df_ratio,
            index: OnceCell::new(),
            matrix: OnceCell::new(),
        }
    }

    pub fn source(&self) -> &Arc<dyn CorpusSource> {
        &self.source
    }

    /// The shared index, building it on first use.
    pub fn index(&self) -> Result<Arc<SearchIndex>, SearchError> {
        self.index
            .get_or_try_init(|| {
                let documents = self.source.documents()?;
                tracing::info!(documents = documents.len(), "building search index");
                SearchIndex::build(&documents, self.min_df, self.max_df_ratio).map(Arc::new)
            })
            .cloned()
    }

    /// The shared term-count matrix, building the index and then the matrix
    /// on first use.
    pub fn term_matrix(&self) -> Result<Arc<TermMatrix>, SearchError> {
        let index = self.index()?;
        Ok(self.matrix.get_or_init(|| Arc::new(TermMatrix::from_index(&index))).clone())
    }

    pub fn is_built(&self) -> bool {
        self.index.get().is_some()
    }

    pub fn matrix_built(&self) -> bool {
        self.matrix.get().is_some()
    }
}
