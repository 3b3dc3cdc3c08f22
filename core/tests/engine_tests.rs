mod common;

use sommelier_core::engine::SimilarRequest;

#[test]
fn anchor_is_excluded_and_neighbors_ranked() {
    let (_, engine) = common::setup();
    let hits = engine.similar(&SimilarRequest::anchor("Alpha Pinot", 10)).unwrap();
    assert_eq!(hits.len(), 5);
    assert_eq!(hits[0].wine, "Beta Pinot");
    assert_eq!(hits[1].wine, "Zeta Riesling");
    assert!(hits[0].score > hits[1].score && hits[1].score > 0.0);
    assert!(hits.iter().all(|h| h.wine != "Alpha Pinot"));
}

#[test]
fn limit_truncates() {
    let (_, engine) = common::setup();
    let hits = engine.similar(&SimilarRequest::anchor("Alpha Pinot", 2)).unwrap();
    assert_eq!(hits.len(), 2);
}

#[test]
fn unknown_or_missing_anchor_is_empty() {
    let (_, engine) = common::setup();
    assert!(engine.similar(&SimilarRequest::anchor("Not A Wine", 10)).unwrap().is_empty());
    assert!(engine.similar(&SimilarRequest { limit: 10, ..Default::default() }).unwrap().is_empty());
}

#[test]
fn unresolved_feedback_is_an_empty_plan() {
    use sommelier_core::engine::QueryPlan;
    let (_, engine) = common::setup();
    let index = engine.warm().unwrap();
    let req = SimilarRequest { wine: Some("Nope".into()), liked: vec!["Missing".into()], ..Default::default() };
    assert_eq!(engine.plan(&index, &req), QueryPlan::Empty);
    assert!(!engine.has_query(&req).unwrap());
    assert!(engine.has_query(&SimilarRequest::anchor("Alpha Pinot", 1)).unwrap());
}

#[test]
fn request_without_limit_still_returns_hits() {
    let (_, engine) = common::setup();
    let req: SimilarRequest = serde_json::from_str(r#"{"wine": "Alpha Pinot"}"#).unwrap();
    assert_eq!(req.limit, 10);
    assert_eq!(engine.similar(&req).unwrap().len(), 5);
}
