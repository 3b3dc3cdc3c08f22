//! Content-similarity search over a wine review catalog.
//!
//! The index is built once from the catalog, held by [`cache::IndexCache`] and
//! shared read-only by every request. Requests flow through the scorer
//! (optionally preceded by Rocchio feedback), then the keyword matcher and the
//! mood re-ranker.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod index;
pub mod keyword;
pub mod matrix;
pub mod mood;
pub mod pipeline;
pub mod record;
pub mod scoring;
pub mod tokenizer;

pub use cache::IndexCache;
pub use catalog::{Catalog, CorpusSource, Document, WineFilter, WineRecord};
pub use config::{KeywordWeights, RocchioParams, SearchConfig};
pub use engine::{SimilarRequest, SimilarityEngine};
pub use error::SearchError;
pub use index::{DocId, Posting, SearchIndex, TermId};
pub use mood::Mood;
pub use pipeline::{recommend, RecommendRequest};
pub use record::{ScoredWine, SortKey};
pub use scoring::{QueryVector, ScoredDoc};
