//! Candidate ranking: title similarity, popularity, year distance.

use strsim::normalized_levenshtein;
use tracing::debug;

use crate::SearchCandidate;
use crate::title::normalize;

pub const SIMILARITY_WEIGHT: f64 = 1.2;
pub const YEAR_PENALTY_PER_YEAR: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: SearchCandidate,
    pub score: f64,
}

/// Similarity of two already-normalized titles on a 0–100 scale.
/// Either side empty scores 0.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    normalized_levenshtein(a, b) * 100.0
}

/// `1.2 * similarity + popularity - 2 * |candidate_year - year_guess|`.
///
/// Similarity is the better of the display and original names. The year
/// term applies only when both years are known.
pub fn score(query_title: &str, candidate: &SearchCandidate, year_guess: Option<i32>) -> f64 {
    score_normalized(&normalize(query_title), candidate, year_guess)
}

fn score_normalized(query: &str, candidate: &SearchCandidate, year_guess: Option<i32>) -> f64 {
    let sim = similarity(query, &normalize(&candidate.name))
        .max(similarity(query, &normalize(&candidate.original_name)));

    let mut total = sim * SIMILARITY_WEIGHT + candidate.popularity;

    if let (Some(guess), Some(year)) = (year_guess, candidate.year()) {
        total -= f64::from((year - guess).abs()) * YEAR_PENALTY_PER_YEAR;
    }
    total
}

/// Highest-scoring candidate. Ties go to the earlier candidate.
pub fn pick_best(
    query_title: &str,
    candidates: &[SearchCandidate],
    year_guess: Option<i32>,
) -> Option<ScoredCandidate> {
    let query = normalize(query_title);
    let mut best: Option<ScoredCandidate> = None;

    for candidate in candidates {
        let s = score_normalized(&query, candidate, year_guess);
        debug!(id = candidate.id, name = %candidate.name, score = s, "scored candidate");
        if best.as_ref().is_none_or(|b| s > b.score) {
            best = Some(ScoredCandidate {
                candidate: candidate.clone(),
                score: s,
            });
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::candidate;

    #[test]
    fn exact_name_beats_dissimilar_name() {
        let exact = candidate(1, "Dark", 0.0, "");
        let other = candidate(2, "Zumbis na Fazenda", 5.0, "");
        assert!(score("Dark", &exact, None) > score("Dark", &other, None));
        assert_eq!(score("Dark", &exact, None), 120.0);
    }

    #[test]
    fn original_name_counts() {
        let mut c = candidate(1, "A Origem", 0.0, "");
        c.original_name = "Inception".into();
        assert_eq!(score("Inception", &c, None), 120.0);
    }

    #[test]
    fn year_penalty_is_two_per_year() {
        let near = candidate(1, "Dark", 10.0, "2017-12-01");
        let far = candidate(2, "Dark", 10.0, "2020-06-27");
        let a = score("Dark", &near, Some(2017));
        let b = score("Dark", &far, Some(2017));
        assert!((a - b - 6.0).abs() < 1e-9);
        assert!((a - 130.0).abs() < 1e-9);
    }

    #[test]
    fn no_penalty_without_candidate_date() {
        let c = candidate(1, "Dark", 10.0, "");
        assert_eq!(score("Dark", &c, Some(1990)), 130.0);
    }

    #[test]
    fn nameless_candidate_scores_on_popularity_and_year() {
        let mut c = candidate(1, "", 7.5, "2015-01-01");
        c.original_name.clear();
        assert_eq!(score("Dark", &c, Some(2017)), 3.5);
    }

    #[test]
    fn similarity_dominates_popularity() {
        let cands = vec![
            candidate(2, "Darkwood", 90.0, ""),
            candidate(1, "Dark", 50.0, ""),
        ];
        let best = pick_best("Dark", &cands, None).unwrap();
        assert_eq!(best.candidate.id, 1);
    }

    #[test]
    fn ties_keep_first_seen() {
        let cands = vec![
            candidate(10, "Dark", 5.0, ""),
            candidate(11, "Dark", 5.0, ""),
        ];
        assert_eq!(pick_best("Dark", &cands, None).unwrap().candidate.id, 10);
    }

    #[test]
    fn empty_list_has_no_best() {
        assert!(pick_best("Dark", &[], None).is_none());
    }
}
