use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sommelier_core::engine::SimilarHit;
use sommelier_core::mood::parse_moods;
use sommelier_core::{recommend, Catalog, RecommendRequest, ScoredWine, SearchConfig, SimilarRequest, SimilarityEngine, WineFilter, WineRecord};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SimilarParams {
    pub wine: Option<String>,
    /// comma-separated wine names
    #[serde(default)]
    pub liked: String,
    #[serde(default)]
    pub disliked: String,
    #[serde(default = "default_k")]
    pub limit: usize,
}
fn default_k() -> usize { 10 }

#[derive(Serialize)]
pub struct SimilarResponse {
    pub wine: Option<String>,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SimilarHit>,
}

#[derive(Deserialize)]
pub struct RecommendParams {
    pub wine: Option<String>,
    #[serde(default)]
    pub liked: String,
    #[serde(default)]
    pub disliked: String,
    #[serde(default)]
    pub flavors: String,
    #[serde(default)]
    pub mood: String,
    pub category: Option<String>,
    pub country: Option<String>,
    pub varietal: Option<String>,
    pub appellation: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// comma-separated allow list of wine names
    pub wines: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct RecommendResponse {
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<ScoredWine>,
}

#[derive(Deserialize)]
pub struct SuggestParams {
    #[serde(default)]
    pub input: String,
    pub country: Option<String>,
}

type ApiError = (StatusCode, Json<serde_json::Value>);

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SimilarityEngine>,
    pub catalog: Arc<Catalog>,
}

/// Load the catalog, build the index eagerly and wire up the routes.
pub fn build_app(catalog_path: &str, config: SearchConfig) -> Result<Router> {
    let catalog = Arc::new(Catalog::load(catalog_path)?);
    let engine = Arc::new(SimilarityEngine::new(catalog.clone(), config));
    let index = engine.warm()?;
    tracing::info!(num_docs = index.num_docs(), qualified_terms = index.qualified_terms(), "index ready");
    let app_state = AppState { engine, catalog };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/similar", get(similar_handler))
        .route("/recommend", get(recommend_handler))
        .route("/wine/:name", get(wine_handler))
        .route("/suggest_wines", get(suggest_wines_handler))
        .route("/suggest_varietals", get(suggest_varietals_handler))
        .route("/suggest_regions", get(suggest_regions_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

pub async fn similar_handler(State(state): State<AppState>, Query(params): Query<SimilarParams>) -> Result<Json<SimilarResponse>, ApiError> {
    let start = Instant::now();
    let req = SimilarRequest {
        wine: present(params.wine),
        liked: split_list(&params.liked),
        disliked: split_list(&params.disliked),
        limit: params.limit.clamp(1, 3000),
    };
    let wine = req.wine.clone();
    let engine = state.engine.clone();
    // feedback may build the term matrix on first use
    let results = tokio::task::spawn_blocking(move || engine.similar(&req))
        .await
        .map_err(internal)?
        .map_err(internal)?;

    let elapsed = start.elapsed();
    Ok(Json(SimilarResponse { wine, took_s: elapsed.as_secs_f64(), total_hits: results.len(), results }))
}

pub async fn recommend_handler(State(state): State<AppState>, Query(params): Query<RecommendParams>) -> Result<Json<RecommendResponse>, ApiError> {
    let start = Instant::now();
    let moods = parse_moods(&split_list(&params.mood));
    let req = RecommendRequest {
        wine: present(params.wine),
        liked: split_list(&params.liked),
        disliked: split_list(&params.disliked),
        flavors: split_list(&params.flavors),
        moods,
        filter: WineFilter {
            category: present(params.category),
            country: present(params.country),
            varietal: present(params.varietal),
            appellation: present(params.appellation),
            min_price: params.min_price,
            max_price: params.max_price,
            wines: params.wines.as_deref().map(split_list).filter(|w| !w.is_empty()),
        },
        limit: params.limit,
    };
    tracing::debug!(?req, "recommend");

    let AppState { engine, catalog } = state;
    let results = tokio::task::spawn_blocking(move || recommend(&engine, &catalog, &req))
        .await
        .map_err(internal)?
        .map_err(internal)?;

    let elapsed = start.elapsed();
    Ok(Json(RecommendResponse { took_s: elapsed.as_secs_f64(), total_hits: results.len(), results }))
}

pub async fn wine_handler(State(state): State<AppState>, Path(name): Path<String>) -> Result<Json<WineRecord>, ApiError> {
    match state.catalog.get(&name) {
        Some(rec) => Ok(Json(rec.clone())),
        None => Err((StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": "not found" })))),
    }
}

pub async fn suggest_wines_handler(State(state): State<AppState>, Query(params): Query<SuggestParams>) -> Json<Vec<String>> {
    Json(state.catalog.suggest_wines(&params.input, 6))
}

pub async fn suggest_varietals_handler(State(state): State<AppState>, Query(params): Query<SuggestParams>) -> Json<Vec<String>> {
    Json(state.catalog.suggest_varietals(&params.input, 6))
}

pub async fn suggest_regions_handler(State(state): State<AppState>, Query(params): Query<SuggestParams>) -> Json<Vec<String>> {
    Json(state.catalog.suggest_regions(params.country.as_deref(), &params.input, 10))
}

fn internal<E: std::fmt::Display>(err: E) -> ApiError {
    tracing::error!(%err, "request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, Json(serde_json::json!({ "error": err.to_string() })))
}

// The front end sends "null" for an unset wine.
fn present(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty() && v != "null")
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}
