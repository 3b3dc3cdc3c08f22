use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sommelier_core::SearchConfig;
use std::fs;
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

const CATALOG: &str = r#"{"wine":"Alpha Pinot","review":"Bright cherry and raspberry with earthy mushroom notes","varietal":"Pinot Noir","price":"$30","country":"France","appellation":"Gevrey-Chambertin, Burgundy"}
{"wine":"Beta Pinot","review":"Cherry raspberry and forest floor, earthy and silky","varietal":"Pinot Noir","price":"$45","country":"United States","appellation":"Willamette Valley, Oregon"}
{"wine":"Gamma Malbec","review":"Dark plum, blackberry and sweet oak, sweetness on the finish","varietal":"Malbec","price":"$20","country":"Argentina"}
{"wine":"Delta Zin","review":"Jammy blackberry plum and pepper, sweet spice","varietal":"Zinfandel","price":"$25","country":"United States","appellation":"Dry Creek Valley, Sonoma"}
{"wine":"Epsilon Sauvignon","review":"Zesty citrus lemon and grass, crisp acidity","varietal":"Sauvignon Blanc","price":"$18","country":"New Zealand"}
{"wine":"Zeta Riesling","review":"Lemon lime and honey, sweet petrol notes","varietal":"Riesling","price":"$22","country":"Germany"}
"#;

fn app() -> (TempDir, Router) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wines.jsonl");
    fs::write(&path, CATALOG).unwrap();
    let app = server::build_app(&path.to_string_lossy(), SearchConfig::with_df_cutoffs(1, 0.5)).unwrap();
    (dir, app)
}

async fn call(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::get(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn similar_returns_ranked_neighbors() {
    let (_dir, app) = app();
    let (status, json) = call(app, "/similar?wine=Alpha%20Pinot&limit=2").await;
    assert_eq!(status, StatusCode::OK);
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["wine"], "Beta Pinot");
    assert_eq!(arr[1]["wine"], "Zeta Riesling");
    assert_eq!(json["total_hits"], 2);
}

#[tokio::test]
async fn similar_with_feedback() {
    let (_dir, app) = app();
    let (status, json) = call(app, "/similar?wine=Alpha%20Pinot&disliked=Beta%20Pinot&limit=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["results"][0]["wine"], "Zeta Riesling");
}

#[tokio::test]
async fn unknown_wine_is_empty_not_error() {
    let (_dir, app) = app();
    let (status, json) = call(app, "/similar?wine=null").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_hits"], 0);
}

#[tokio::test]
async fn recommend_with_flavors_and_mood() {
    let (_dir, app) = app();
    let (status, json) = call(app, "/recommend?flavors=sweet&mood=Go%20Wild").await;
    assert_eq!(status, StatusCode::OK);
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["wine"], "Delta Zin");
    assert_eq!(arr[0]["moods"][0], "Wild");
    assert_eq!(arr[0]["term_score"], 1.0);
}

#[tokio::test]
async fn recommend_with_filters() {
    let (_dir, app) = app();
    let (status, json) = call(app, "/recommend?wine=Alpha%20Pinot&country=united%20states&max_price=40").await;
    assert_eq!(status, StatusCode::OK);
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["wine"], "Delta Zin");
}

#[tokio::test]
async fn wine_lookup() {
    let (_dir, app) = app();
    let (status, json) = call(app.clone(), "/wine/Gamma%20Malbec").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["varietal"], "Malbec");
    let (status, _) = call(app, "/wine/Nothing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn suggest_wines_matches_any_case() {
    let (_dir, app) = app();
    let (status, json) = call(app.clone(), "/suggest_wines?input=PINOT").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!(["Alpha Pinot", "Beta Pinot"]));
    let (_, json) = call(app, "/suggest_wines?input=a").await;
    assert_eq!(json.as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn suggest_varietals_are_distinct() {
    let (_dir, app) = app();
    let (status, json) = call(app, "/suggest_varietals?input=pinot").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!(["Pinot Noir"]));
}

#[tokio::test]
async fn suggest_regions_scoped_by_country() {
    let (_dir, app) = app();
    let (_, json) = call(app.clone(), "/suggest_regions?country=all&input=valley").await;
    assert_eq!(json, serde_json::json!(["Willamette Valley", "Dry Creek Valley"]));
    let (_, json) = call(app.clone(), "/suggest_regions?country=France&input=").await;
    assert_eq!(json, serde_json::json!(["Gevrey-Chambertin"]));
    let (_, json) = call(app, "/suggest_regions?country=Germany&input=valley").await;
    assert_eq!(json, serde_json::json!([]));
}

#[test]
fn empty_catalog_refuses_to_start() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wines.jsonl");
    fs::write(&path, "\n").unwrap();
    assert!(server::build_app(&path.to_string_lossy(), SearchConfig::default()).is_err());
}
