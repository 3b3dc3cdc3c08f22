//! Rocchio relevance feedback over rows of the term-count matrix.

use crate::config::RocchioParams;
use crate::index::DocId;
use crate::matrix::TermMatrix;

/// `alpha * anchor + beta * mean(liked rows) - gamma * mean(disliked rows)`.
///
/// `anchor` must have one entry per term (`matrix.num_terms()`). An empty
/// liked or disliked set drops its term from the sum. With `clip_negative`
/// every component is floored at zero.
pub fn rocchio_vector(anchor: &[f64], liked: &[DocId], disliked: &[DocId], matrix: &TermMatrix, params: &RocchioParams) -> Vec<f64> {
    let mut out: Vec<f64> = anchor.iter().map(|v| params.alpha * v).collect();
    out.resize(matrix.num_terms(), 0.0);

    if !liked.is_empty() {
        let scale = params.beta / liked.len() as f64;
        add_rows(&mut out, liked, matrix, scale);
    }
    if !disliked.is_empty() {
        let scale = -params.gamma / disliked.len() as f64;
        add_rows(&mut out, disliked, matrix, scale);
    }
    if params.clip_negative {
        for v in out.iter_mut() {
            if *v < 0.0 {
                *v = 0.0;
            }
        }
    }
    out
}

/// Rocchio with the anchor taken from the matrix row of `anchor`, or the zero
/// vector when there is no anchor wine.
pub fn rocchio(anchor: Option<DocId>, liked: &[DocId], disliked: &[DocId], matrix: &TermMatrix, params: &RocchioParams) -> Vec<f64> {
    let anchor_vec: Vec<f64> = match anchor {
        Some(doc_id) => matrix.row(doc_id).iter().map(|&c| c as f64).collect(),
        None => vec![0.0; matrix.num_terms()],
    };
    rocchio_vector(&anchor_vec, liked, disliked, matrix, params)
}

fn add_rows(out: &mut [f64], docs: &[DocId], matrix: &TermMatrix, scale: f64) {
    for &doc_id in docs {
        for (acc, &c) in out.iter_mut().zip(matrix.row(doc_id)) {
            *acc += scale * c as f64;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Document;
    use crate::index::SearchIndex;

    fn matrix() -> (SearchIndex, TermMatrix) {
        let docs = vec![
            Document::new("a", "plum plum fig"),
            Document::new("b", "fig tar"),
            Document::new("c", "tar tar tar"),
        ];
        let idx = SearchIndex::build(&docs, 1, 1.0).unwrap();
        let m = TermMatrix::from_index(&idx);
        (idx, m)
    }

    #[test]
    fn liked_rows_are_averaged() {
        let (idx, m) = matrix();
        let params = RocchioParams { alpha: 0.0, beta: 1.0, gamma: 0.0, clip_negative: true };
        let v = rocchio(None, &[0, 1], &[], &m, &params);
        let fig = idx.term_id("fig").unwrap() as usize;
        let plum = idx.term_id("plum").unwrap() as usize;
        assert!((v[fig] - 1.0).abs() < 1e-12);
        assert!((v[plum] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn unclipped_can_go_negative() {
        let (idx, m) = matrix();
        let params = RocchioParams { clip_negative: false, ..RocchioParams::default() };
        let v = rocchio(Some(0), &[], &[2], &m, &params);
        let tar = idx.term_id("tar").unwrap() as usize;
        assert!((v[tar] + 0.8 * 3.0).abs() < 1e-12);
    }
}
