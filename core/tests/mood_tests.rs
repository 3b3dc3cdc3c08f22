use sommelier_core::mood::mood_filter;
use sommelier_core::{Mood, ScoredWine, SortKey, WineRecord};

fn rec(name: &str, varietal: &str, score: f64) -> ScoredWine {
    let mut r = ScoredWine::with_score(WineRecord { varietal: varietal.into(), ..WineRecord::new(name, "") }, score);
    r.term_score = Some(10.0 - score);
    r
}

#[test]
fn chill_keeps_pinot_and_drops_malbec() {
    let out = mood_filter(vec![rec("p", "Pinot Noir", 0.5), rec("m", "Malbec", 0.9)], &[Mood::Chill], SortKey::Similarity);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].wine(), "p");
    assert_eq!(out[0].moods, vec![Mood::Chill]);
    assert_eq!(out[0].mood_label(), "Chill");
}

#[test]
fn all_matching_moods_are_tagged() {
    let out = mood_filter(vec![rec("p", "Pinot Noir", 0.5)], &[Mood::Sad, Mood::Chill, Mood::Wild], SortKey::Similarity);
    assert_eq!(out[0].moods, vec![Mood::Chill, Mood::Sad]);
    assert_eq!(out[0].mood_label(), "Chill, Sad");
}

#[test]
fn varietal_substring_match() {
    let out = mood_filter(vec![rec("n", "Nero d'Avola, Italian Red", 0.1)], &[Mood::Wild], SortKey::Similarity);
    assert_eq!(out.len(), 1);
}

#[test]
fn caller_picks_sort_key() {
    let records = vec![rec("low", "Syrah", 0.2), rec("high", "Zinfandel", 0.8)];
    let by_sim = mood_filter(records.clone(), &[Mood::Wild], SortKey::Similarity);
    assert_eq!(by_sim[0].wine(), "high");
    let by_term = mood_filter(records, &[Mood::Wild], SortKey::TermScore);
    assert_eq!(by_term[0].wine(), "low");
}

#[test]
fn no_moods_keeps_nothing() {
    assert!(mood_filter(vec![rec("p", "Pinot Noir", 0.5)], &[], SortKey::Similarity).is_empty());
}
