use sommelier_core::{CorpusSource, Document, IndexCache, SearchConfig, SearchError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

struct CountingSource {
    loads: AtomicUsize,
    docs: Vec<Document>,
}

impl CountingSource {
    fn new(docs: Vec<Document>) -> Arc<Self> {
        Arc::new(Self { loads: AtomicUsize::new(0), docs })
    }
}

impl CorpusSource for CountingSource {
    fn documents(&self) -> Result<Vec<Document>, SearchError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        // widen the window for racing first callers
        thread::sleep(Duration::from_millis(20));
        Ok(self.docs.clone())
    }

    fn review(&self, wine: &str) -> Option<String> {
        self.docs.iter().find(|d| d.wine == wine).map(|d| d.review.clone())
    }
}

fn docs() -> Vec<Document> {
    vec![Document::new("a", "plum cedar"), Document::new("b", "cedar smoke")]
}

#[test]
fn concurrent_first_access_builds_once() {
    let source = CountingSource::new(docs());
    let cache = IndexCache::new(source.clone(), &SearchConfig::with_df_cutoffs(1, 1.0));
    let indexes: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..8).map(|_| s.spawn(|| cache.index().unwrap())).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(source.loads.load(Ordering::SeqCst), 1);
    assert!(indexes.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    assert!(cache.is_built());
}

#[test]
fn matrix_is_lazy_and_built_once() {
    let source = CountingSource::new(docs());
    let cache = IndexCache::new(source.clone(), &SearchConfig::with_df_cutoffs(1, 1.0));
    cache.index().unwrap();
    assert!(!cache.matrix_built());
    let matrices: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..4).map(|_| s.spawn(|| cache.term_matrix().unwrap())).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(matrices.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    assert_eq!(matrices[0].num_docs(), 2);
    assert_eq!(source.loads.load(Ordering::SeqCst), 1);
}

#[test]
fn empty_corpus_is_a_build_error() {
    let cache = IndexCache::new(CountingSource::new(vec![]), &SearchConfig::default());
    assert!(matches!(cache.index(), Err(SearchError::EmptyCorpus)));
    assert!(!cache.is_built());
}
