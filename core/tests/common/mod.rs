#![allow(dead_code)]

use sommelier_core::{Catalog, SearchConfig, SimilarityEngine, WineRecord};
use std::sync::Arc;

pub fn wine(name: &str, review: &str, varietal: &str, price: &str, country: &str) -> WineRecord {
    WineRecord {
        varietal: varietal.into(),
        price: price.into(),
        country: country.into(),
        ..WineRecord::new(name, review)
    }
}

pub fn cellar() -> Vec<WineRecord> {
    vec![
        wine("Alpha Pinot", "Bright cherry and raspberry with earthy mushroom notes", "Pinot Noir", "$30", "France"),
        wine("Beta Pinot", "Cherry raspberry and forest floor, earthy and silky", "Pinot Noir", "$45", "United States"),
        wine("Gamma Malbec", "Dark plum, blackberry and sweet oak, sweetness on the finish", "Malbec", "$20", "Argentina"),
        wine("Delta Zin", "Jammy blackberry plum and pepper, sweet spice", "Zinfandel", "$25", "United States"),
        wine("Epsilon Sauvignon", "Zesty citrus lemon and grass, crisp acidity", "Sauvignon Blanc", "$18", "New Zealand"),
        wine("Zeta Riesling", "Lemon lime and honey, sweet petrol notes", "Riesling", "$22", "Germany"),
    ]
}

/// Small-corpus cutoffs: every term qualifies unless it is in over half the reviews.
pub fn config() -> SearchConfig {
    SearchConfig::with_df_cutoffs(1, 0.5)
}

pub fn setup() -> (Arc<Catalog>, SimilarityEngine) {
    let catalog = Arc::new(Catalog::from_records(cellar()));
    let engine = SimilarityEngine::new(catalog.clone(), config());
    (catalog, engine)
}
